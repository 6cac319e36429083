use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

impl Credits {
    /// First `limit` cast members in billing order
    pub fn top_billed(&self, limit: usize) -> &[CastMember] {
        &self.cast[..self.cast.len().min(limit)]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: String,
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
    #[serde(default)]
    pub official: bool,
    #[serde(default)]
    pub published_at: Option<String>,
}

impl Video {
    pub fn is_youtube_trailer(&self) -> bool {
        self.video_type == "Trailer" && self.site == "YouTube"
    }

    pub fn youtube_url(&self) -> Option<String> {
        (self.site == "YouTube").then(|| format!("https://www.youtube.com/watch?v={}", self.key))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Videos {
    #[serde(default)]
    pub results: Vec<Video>,
}

impl Videos {
    /// First YouTube trailer, if the title has one
    pub fn trailer(&self) -> Option<&Video> {
        self.results.iter().find(|v| v.is_youtube_trailer())
    }
}
