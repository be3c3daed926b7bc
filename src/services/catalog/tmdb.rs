/// TMDB v3 catalog client
///
/// Authenticates with the `api_key` query parameter and asks every
/// intermediary not to cache (`Cache-Control: no-store`). There are no
/// retries and no timeouts: a failed call is logged and reported as an empty
/// result list.
use reqwest::header::CACHE_CONTROL;
use reqwest::Client as HttpClient;
use reqwest::StatusCode;
use serde_json::Value;

use super::{CatalogClient, QueryParams};

/// Why a catalog call produced no data
#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error("catalog returned status {0}")]
    Status(StatusCode),

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl TmdbClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    async fn try_fetch(&self, path: &str, params: &QueryParams) -> Result<Vec<Value>, FetchError> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)?;

        Ok(extract_results(value))
    }
}

/// Takes the `results` array out of a response body; anything else is empty
fn extract_results(body: Value) -> Vec<Value> {
    match body {
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(results)) => results,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[async_trait::async_trait]
impl CatalogClient for TmdbClient {
    async fn fetch(&self, path: &str, params: &QueryParams) -> Vec<Value> {
        match self.try_fetch(path, params).await {
            Ok(results) => {
                tracing::debug!(
                    path = %path,
                    results = results.len(),
                    provider = self.name(),
                    "Catalog fetch completed"
                );
                results
            }
            Err(e) => {
                tracing::error!(
                    path = %path,
                    error = %e,
                    provider = self.name(),
                    "Catalog fetch failed"
                );
                Vec::new()
            }
        }
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_results_array() {
        let body = json!({ "page": 1, "results": [{ "id": 1 }, { "id": 2 }] });
        assert_eq!(extract_results(body).len(), 2);
    }

    #[test]
    fn test_extract_results_missing_field() {
        assert!(extract_results(json!({ "page": 1 })).is_empty());
    }

    #[test]
    fn test_extract_results_wrong_shape() {
        assert!(extract_results(json!({ "results": "nope" })).is_empty());
        assert!(extract_results(json!([{ "id": 1 }])).is_empty());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = TmdbClient::new("secret".to_string(), "http://test.local/".to_string());
        let rendered = format!("{:?}", client);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("http://test.local"));
    }

    #[tokio::test]
    async fn test_unreachable_host_returns_empty() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let client = TmdbClient::new("key".to_string(), "http://127.0.0.1:9".to_string());
        let results = client.fetch("/movie/top_rated", &QueryParams::new()).await;
        assert!(results.is_empty());
    }
}
