use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::ImageCdn;
use crate::services::{Banner, CatalogClient, ListingView, RowKind};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogClient>,
    pub images: ImageCdn,
    pub banner: Arc<Banner>,
    /// Rows from the most recent landing page load, with their selections
    pub rows: Arc<RwLock<HashMap<RowKind, ListingView>>>,
}

impl AppState {
    /// Creates state around an already mounted banner; rows load on first page view
    pub fn new(catalog: Arc<dyn CatalogClient>, images: ImageCdn, banner: Arc<Banner>) -> Self {
        Self {
            catalog,
            images,
            banner,
            rows: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}
