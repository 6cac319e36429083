/// Shown wherever an item has no artwork
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PosterSize {
    W154,
    W342,
    #[default]
    W500,
    W780,
    Original,
}

impl PosterSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosterSize::W154 => "w154",
            PosterSize::W342 => "w342",
            PosterSize::W500 => "w500",
            PosterSize::W780 => "w780",
            PosterSize::Original => "original",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackdropSize {
    W300,
    W780,
    #[default]
    W1280,
    Original,
}

impl BackdropSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackdropSize::W300 => "w300",
            BackdropSize::W780 => "w780",
            BackdropSize::W1280 => "w1280",
            BackdropSize::Original => "original",
        }
    }
}

/// Builds artwork URLs from the relative paths the catalog returns
#[derive(Debug, Clone)]
pub struct ImageUrls {
    base_url: String,
}

impl Default for ImageUrls {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE_URL)
    }
}

impl ImageUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build(&self, path: Option<&str>, size: &str) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(path) => format!("{}/{}{}", self.base_url, size, path),
            None => PLACEHOLDER_IMAGE.to_string(),
        }
    }

    pub fn poster_url(&self, path: Option<&str>, size: PosterSize) -> String {
        self.build(path, size.as_str())
    }

    pub fn backdrop_url(&self, path: Option<&str>, size: BackdropSize) -> String {
        self.build(path, size.as_str())
    }

    /// Cast headshots use the smallest poster size
    pub fn profile_url(&self, path: Option<&str>) -> String {
        self.build(path, PosterSize::W154.as_str())
    }
}
