use anyhow::Result;
use std::io;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

pub fn init_logging(verbose_level: u8, quiet: bool) -> Result<()> {
    init_logging_with_file(verbose_level, quiet, None)
}

/// Filter directives for the given verbosity.
/// 0 = warn (the CLI prints its own results), 1 = debug without hyper noise, 2+ = trace.
/// `RUST_LOG` wins unless `quiet` is set.
fn filter_directives(verbose_level: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose_level {
        0 => "warn",
        1 => "debug,hyper::proto::h1=warn,hyper::client::pool=warn,reqwest::connect=warn",
        _ => "trace",
    }
}

/// `marquee.log` rotates into `marquee.log.2026-01-17` style files; the prefix is the name without extension
fn rotation_parts(log_path: &Path) -> Result<(&Path, &str)> {
    let log_dir = log_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Log file path has no parent directory"))?;
    let log_filename = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid log filename"))?;
    let log_prefix = log_filename.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(log_filename);
    Ok((log_dir, log_prefix))
}

pub fn init_logging_with_file(verbose_level: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let directives = filter_directives(verbose_level, quiet);
    let filter = if quiet {
        EnvFilter::new(directives)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
    };

    let json = std::env::var("RUST_LOG_JSON")
        .map(|v| v == "true")
        .unwrap_or_else(|_| !io::stdout().is_terminal());

    let registry = Registry::default().with(filter);

    match log_file {
        Some(log_path) => {
            let (log_dir, log_prefix) = rotation_parts(&log_path)?;
            std::fs::create_dir_all(log_dir)?;
            let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, log_prefix);

            if json {
                let json_layer = fmt::layer()
                    .json()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(file_appender);
                registry.with(json_layer).try_init()?;
            } else {
                let fmt_layer = fmt::layer()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .with_writer(file_appender);
                registry.with(fmt_layer).try_init()?;
            }
        }
        None => {
            if json {
                let json_layer = fmt::layer()
                    .json()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(io::stderr);
                registry.with(json_layer).try_init()?;
            } else {
                let fmt_layer = fmt::layer()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(io::stderr);
                registry.with(fmt_layer).try_init()?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives() {
        assert_eq!(filter_directives(0, false), "warn");
        assert!(filter_directives(1, false).starts_with("debug"));
        assert_eq!(filter_directives(3, false), "trace");
        assert_eq!(filter_directives(2, true), "error");
    }

    #[test]
    fn test_rotation_parts() {
        let path = PathBuf::from("/var/log/marquee/marquee.log");
        let (dir, prefix) = rotation_parts(&path).unwrap();
        assert_eq!(dir, Path::new("/var/log/marquee"));
        assert_eq!(prefix, "marquee");

        let (_, prefix) = rotation_parts(Path::new("/tmp/plain")).unwrap();
        assert_eq!(prefix, "plain");
    }
}
