use serde::{Deserialize, Serialize};

pub mod image;

pub use image::{ImageCdn, ImageSize};

/// Shown when neither name field is present
pub const UNTITLED: &str = "Untitled";

/// Shown when an item has no synopsis
pub const NO_OVERVIEW: &str = "No description available.";

/// Video hosting site whose trailers can be embedded
pub const TRAILER_SITE: &str = "YouTube";

/// Video type that counts as a trailer
pub const TRAILER_TYPE: &str = "Trailer";

const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed";

// ============================================================================
// Catalog Types
// ============================================================================

/// A movie or TV show as returned by the catalog API
///
/// Movies carry `title`, shows carry `name`; use [`CatalogItem::display_name`]
/// rather than reading either field directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl CatalogItem {
    /// Creates an item with only an identifier set
    pub fn new(id: u64) -> Self {
        Self {
            id,
            title: None,
            name: None,
            media_type: None,
            backdrop_path: None,
            poster_path: None,
            overview: None,
        }
    }

    /// The movie title, falling back to the show name
    pub fn display_name(&self) -> Option<&str> {
        non_empty(&self.title).or_else(|| non_empty(&self.name))
    }

    /// Display name, or a placeholder when the item has neither name field
    pub fn display_name_or_default(&self) -> &str {
        self.display_name().unwrap_or(UNTITLED)
    }

    pub fn overview_or_default(&self) -> &str {
        non_empty(&self.overview).unwrap_or(NO_OVERVIEW)
    }

    /// Wide artwork for the hero banner; posters stand in when there is no backdrop
    pub fn banner_image_path(&self) -> Option<&str> {
        non_empty(&self.backdrop_path).or_else(|| non_empty(&self.poster_path))
    }

    pub fn poster_image_path(&self) -> Option<&str> {
        non_empty(&self.poster_path)
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

// ============================================================================
// Video Types
// ============================================================================

/// One entry of `/movie/{id}/videos`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Video {
    pub fn is_embeddable_trailer(&self) -> bool {
        self.kind == TRAILER_TYPE && self.site == TRAILER_SITE
    }

    /// Autoplaying embed URL for the player overlay
    pub fn embed_url(&self) -> String {
        format!("{}/{}?autoplay=1", YOUTUBE_EMBED_BASE, self.key)
    }
}

/// Returns the first YouTube trailer in API order
pub fn find_trailer(videos: &[Video]) -> Option<&Video> {
    videos.iter().find(|v| v.is_embeddable_trailer())
}
