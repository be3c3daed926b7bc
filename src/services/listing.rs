use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::{CatalogItem, ImageCdn, ImageSize};

/// Alt text for thumbnails of items without a name
pub const POSTER_ALT_FALLBACK: &str = "Movie poster";

/// Rendered thumbnail box, in CSS pixels
pub const THUMBNAIL_WIDTH: u32 = 220;
pub const THUMBNAIL_HEIGHT: u32 = 330;

/// Detail dialog content for one item
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DetailOverlay {
    pub id: u64,
    pub title: String,
    pub overview: String,
}

impl From<&CatalogItem> for DetailOverlay {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id,
            title: item.display_name_or_default().to_string(),
            overview: item.overview_or_default().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Thumbnail {
    pub id: u64,
    pub alt: String,
    /// `None` when the item has no poster
    pub image_url: Option<String>,
    pub width: u32,
    pub height: u32,
}

/// What a non-empty row renders to
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RowRender {
    pub title: String,
    pub thumbnails: Vec<Thumbnail>,
    pub detail: Option<DetailOverlay>,
}

/// A titled, horizontally scrolling strip of posters with one optional
/// selected item
#[derive(Debug, Clone)]
pub struct ListingView {
    title: String,
    items: Vec<CatalogItem>,
    selected: Option<usize>,
}

impl ListingView {
    pub fn new(title: impl Into<String>, items: Vec<CatalogItem>) -> Self {
        Self {
            title: title.into(),
            items,
            selected: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Marks the item with `id` as selected, replacing any previous selection
    pub fn select(&mut self, id: u64) -> AppResult<DetailOverlay> {
        let position = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Item {} is not in row '{}'", id, self.title))
            })?;

        self.selected = Some(position);
        Ok(DetailOverlay::from(&self.items[position]))
    }

    /// Closes the detail overlay
    pub fn dismiss(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&CatalogItem> {
        self.selected.and_then(|i| self.items.get(i))
    }

    /// Present exactly when an item is selected
    pub fn detail(&self) -> Option<DetailOverlay> {
        self.selected().map(DetailOverlay::from)
    }

    /// Renders the row; an empty row renders nothing
    pub fn render(&self, images: &ImageCdn) -> Option<RowRender> {
        if self.items.is_empty() {
            return None;
        }

        let thumbnails = self
            .items
            .iter()
            .map(|item| Thumbnail {
                id: item.id,
                alt: item.display_name().unwrap_or(POSTER_ALT_FALLBACK).to_string(),
                image_url: item
                    .poster_image_path()
                    .map(|path| images.url(ImageSize::W500, path)),
                width: THUMBNAIL_WIDTH,
                height: THUMBNAIL_HEIGHT,
            })
            .collect();

        Some(RowRender {
            title: self.title.clone(),
            thumbnails,
            detail: self.detail(),
        })
    }
}
