/// Catalog API boundary
///
/// Every read the application makes against the remote catalog goes through
/// [`CatalogClient::fetch`]. Failures never cross this boundary: a bad status,
/// a transport error or an unreadable body all come back as an empty list,
/// which views treat as "nothing to render".
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{CatalogItem, Video};

pub mod tmdb;

pub use tmdb::TmdbClient;

/// Query parameters appended after the API key
pub type QueryParams = BTreeMap<String, String>;

pub const TRENDING_MOVIES_WEEK: &str = "/trending/movie/week";
pub const TRENDING_ALL_WEEK: &str = "/trending/all/week";
pub const TOP_RATED_MOVIES: &str = "/movie/top_rated";
pub const DISCOVER_MOVIES: &str = "/discover/movie";

/// Genre id for "Action" in the catalog's movie genre list
pub const ACTION_GENRE_ID: &str = "28";

pub fn movie_videos_path(movie_id: u64) -> String {
    format!("/movie/{}/videos", movie_id)
}

/// Read-only access to the catalog API
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Performs one uncached GET and returns the `results` array of the body
    ///
    /// Returns an empty list on any failure; never errors.
    async fn fetch(&self, path: &str, params: &QueryParams) -> Vec<Value>;

    /// Client name for logging
    fn name(&self) -> &'static str;
}

/// Fetches a listing and decodes it into catalog items
///
/// Records that do not decode (for example, without an `id`) are dropped.
pub async fn fetch_items(
    client: &dyn CatalogClient,
    path: &str,
    params: &QueryParams,
) -> Vec<CatalogItem> {
    let results = client.fetch(path, params).await;
    decode_results(path, results)
}

/// Fetches the video list attached to a movie
pub async fn fetch_videos(client: &dyn CatalogClient, movie_id: u64) -> Vec<Video> {
    let path = movie_videos_path(movie_id);
    let results = client.fetch(&path, &QueryParams::new()).await;
    decode_results(&path, results)
}

fn decode_results<T: DeserializeOwned>(path: &str, results: Vec<Value>) -> Vec<T> {
    let total = results.len();
    let decoded: Vec<T> = results
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();

    if decoded.len() < total {
        tracing::debug!(
            path = %path,
            skipped = total - decoded.len(),
            "Dropped catalog records that failed to decode"
        );
    }

    decoded
}
