use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Two-valued classification of a catalog item.
///
/// Serialized with the TMDB path literals (`movie` / `tv`), which is also the
/// form written to the watchlist slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MediaKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
}

impl MediaKind {
    /// Path segment used by the catalog API (`/movie/{id}`, `/tv/{id}`)
    pub fn as_path(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Movie => "Movie",
            MediaKind::Series => "TV Show",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMediaKindError(String);

impl fmt::Display for ParseMediaKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown media kind '{}', expected 'movie' or 'tv'", self.0)
    }
}

impl std::error::Error for ParseMediaKindError {}

impl FromStr for MediaKind {
    type Err = ParseMediaKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" | "movies" | "film" => Ok(MediaKind::Movie),
            "tv" | "series" | "show" | "shows" => Ok(MediaKind::Series),
            other => Err(ParseMediaKindError(other.to_string())),
        }
    }
}
