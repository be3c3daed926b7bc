use serde::{Deserialize, Serialize};

use super::catalog::{
    self, CatalogClient, QueryParams, ACTION_GENRE_ID, DISCOVER_MOVIES, TOP_RATED_MOVIES,
    TRENDING_ALL_WEEK,
};
use super::listing::ListingView;

/// The fixed rows of the landing page, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowKind {
    Trending,
    TopRated,
    Action,
}

impl RowKind {
    pub const ALL: [RowKind; 3] = [RowKind::Trending, RowKind::TopRated, RowKind::Action];

    pub fn title(&self) -> &'static str {
        match self {
            RowKind::Trending => "Trending Now",
            RowKind::TopRated => "Top Rated",
            RowKind::Action => "Action Movies",
        }
    }

    /// URL segment used by the row endpoints
    pub fn slug(&self) -> &'static str {
        match self {
            RowKind::Trending => "trending",
            RowKind::TopRated => "top-rated",
            RowKind::Action => "action",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }

    fn path(&self) -> &'static str {
        match self {
            RowKind::Trending => TRENDING_ALL_WEEK,
            RowKind::TopRated => TOP_RATED_MOVIES,
            RowKind::Action => DISCOVER_MOVIES,
        }
    }

    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if let RowKind::Action = self {
            params.insert("with_genres".to_string(), ACTION_GENRE_ID.to_string());
        }
        params
    }
}

async fn load_row(client: &dyn CatalogClient, kind: RowKind) -> (RowKind, ListingView) {
    let items = catalog::fetch_items(client, kind.path(), &kind.params()).await;
    (kind, ListingView::new(kind.title(), items))
}

/// Fetches all rows concurrently and returns them once every fetch is done
///
/// Rows whose fetch failed come back empty rather than missing, so callers
/// can still address them; they simply render nothing.
pub async fn load_rows(client: &dyn CatalogClient) -> Vec<(RowKind, ListingView)> {
    let (trending, top_rated, action) = tokio::join!(
        load_row(client, RowKind::Trending),
        load_row(client, RowKind::TopRated),
        load_row(client, RowKind::Action),
    );

    tracing::info!(
        trending = trending.1.items().len(),
        top_rated = top_rated.1.items().len(),
        action = action.1.items().len(),
        "Landing page rows loaded"
    );

    vec![trending, top_rated, action]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::MockCatalogClient;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Barrier;

    /// Every fetch waits until all three row fetches are in flight
    struct BarrierCatalog {
        barrier: Arc<Barrier>,
    }

    #[async_trait::async_trait]
    impl CatalogClient for BarrierCatalog {
        async fn fetch(&self, _path: &str, _params: &QueryParams) -> Vec<Value> {
            self.barrier.wait().await;
            vec![json!({ "id": 1, "title": "Film" })]
        }

        fn name(&self) -> &'static str {
            "barrier"
        }
    }

    #[test]
    fn test_slugs_round_trip() {
        for kind in RowKind::ALL {
            assert_eq!(RowKind::from_slug(kind.slug()), Some(kind));
        }
        assert_eq!(RowKind::from_slug("comedy"), None);
    }

    #[test]
    fn test_action_row_filters_by_genre() {
        assert_eq!(
            RowKind::Action.params().get("with_genres").map(String::as_str),
            Some("28")
        );
        assert!(RowKind::TopRated.params().is_empty());
    }

    #[tokio::test]
    async fn test_load_rows_issues_three_queries() {
        let mut client = MockCatalogClient::new();
        client
            .expect_fetch()
            .withf(|path, _| path == TRENDING_ALL_WEEK)
            .times(1)
            .returning(|_, _| vec![json!({ "id": 1, "name": "Show", "media_type": "tv" })]);
        client
            .expect_fetch()
            .withf(|path, _| path == TOP_RATED_MOVIES)
            .times(1)
            .returning(|_, _| vec![json!({ "id": 2, "title": "Film" })]);
        client
            .expect_fetch()
            .withf(|path, params| path == DISCOVER_MOVIES && params.contains_key("with_genres"))
            .times(1)
            .returning(|_, _| vec![]);

        let rows = load_rows(&client).await;
        let kinds: Vec<RowKind> = rows.iter().map(|(kind, _)| *kind).collect();
        assert_eq!(kinds, RowKind::ALL.to_vec());

        assert_eq!(rows[0].1.title(), "Trending Now");
        assert_eq!(rows[0].1.items()[0].display_name(), Some("Show"));
        assert_eq!(rows[1].1.items().len(), 1);
        assert!(rows[2].1.is_empty());
    }

    #[tokio::test]
    async fn test_load_rows_fetches_concurrently() {
        let client = BarrierCatalog {
            barrier: Arc::new(Barrier::new(3)),
        };

        // sequential fetches would never get past the barrier
        let rows = tokio::time::timeout(Duration::from_secs(5), load_rows(&client))
            .await
            .expect("row fetches did not run concurrently");
        assert!(rows.iter().all(|(_, view)| view.items().len() == 1));
    }
}
