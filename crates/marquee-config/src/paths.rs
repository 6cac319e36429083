use anyhow::Result;
use std::path::{Path, PathBuf};

/// Get the container base path from environment variable, defaulting to "/app"
pub fn container_base_path() -> PathBuf {
    std::env::var("MARQUEE_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("marquee");
        let data_dir = dirs::data_dir()
            .map(|d| d.join("marquee"))
            .unwrap_or_else(|| config_dir.join("data"));

        Ok(Self {
            log_dir: data_dir.join("logs"),
            config_dir,
            data_dir,
        })
    }

    pub fn from_docker_env() -> Self {
        Self::with_base(container_base_path())
    }

    /// Everything under one directory: config files at the top, data and logs in subdirs
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Key-value storage slots (one JSON file each)
    pub fn storage_dir(&self) -> PathBuf {
        self.data_dir.join("storage")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.toml")
    }

    pub fn default_log_file(&self) -> PathBuf {
        self.log_dir.join("marquee.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        std::fs::create_dir_all(self.storage_dir())?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // An explicit base path or an existing container directory wins
        if std::env::var_os("MARQUEE_BASE_PATH").is_some() || container_base_path().exists() {
            return Self::from_docker_env();
        }

        // Otherwise, use platform-specific paths (e.g., ~/.config/marquee on Linux)
        Self::new().unwrap_or_else(|_| Self::from_docker_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_base_layout() {
        let paths = PathManager::with_base("/srv/marquee");
        assert_eq!(paths.config_file(), PathBuf::from("/srv/marquee/config.toml"));
        assert_eq!(paths.credentials_file(), PathBuf::from("/srv/marquee/credentials.toml"));
        assert_eq!(paths.storage_dir(), PathBuf::from("/srv/marquee/data/storage"));
        assert_eq!(paths.default_log_file(), PathBuf::from("/srv/marquee/logs/marquee.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::with_base(dir.path());
        paths.ensure_directories().unwrap();
        assert!(paths.storage_dir().is_dir());
        assert!(paths.log_dir().is_dir());
    }
}
