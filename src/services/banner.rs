/// Hero banner: the mounted carousel plus its trailer and info overlays
///
/// `mount` performs the one listing fetch, restores the persisted index and
/// starts the rotation task. `unmount` cancels the task; overlay updates that
/// arrive afterwards (a slow trailer lookup, say) are dropped.
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;

use super::carousel::{Carousel, BANNER_INDEX_KEY};
use super::catalog::{self, CatalogClient, QueryParams, TRENDING_MOVIES_WEEK};
use super::listing::DetailOverlay;
use super::rotation::{spawn_rotation, RotationHandle};
use crate::db::KeyValueStore;
use crate::models::{find_trailer, CatalogItem, ImageCdn, ImageSize};

/// Embedded player for a trailer
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrailerOverlay {
    pub movie_id: u64,
    pub video_key: String,
    pub embed_url: String,
}

/// The item currently on screen and the banner's interaction state
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BannerSlide {
    pub item: CatalogItem,
    pub title: String,
    pub overview: Option<String>,
    pub image_url: Option<String>,
    pub index: usize,
    pub count: usize,
    pub paused: bool,
    pub trailer: Option<TrailerOverlay>,
    pub info: Option<DetailOverlay>,
}

#[derive(Debug, Default)]
struct Overlays {
    mounted: bool,
    trailer: Option<TrailerOverlay>,
    info_open: bool,
}

pub struct Banner {
    client: Arc<dyn CatalogClient>,
    images: ImageCdn,
    carousel: Arc<Mutex<Carousel>>,
    overlays: Mutex<Overlays>,
    rotation: Mutex<Option<RotationHandle>>,
}

impl std::fmt::Debug for Banner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Banner")
            .field("client", &self.client.name())
            .field("images", &self.images)
            .finish_non_exhaustive()
    }
}

impl Banner {
    /// Loads the weekly trending movies and starts rotating through them
    ///
    /// A failed or empty fetch leaves the banner empty with no rotation task.
    pub async fn mount(
        client: Arc<dyn CatalogClient>,
        store: Arc<dyn KeyValueStore>,
        images: ImageCdn,
        period: Duration,
    ) -> Self {
        let items =
            catalog::fetch_items(client.as_ref(), TRENDING_MOVIES_WEEK, &QueryParams::new()).await;

        let persisted = match store.get(BANNER_INDEX_KEY).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read persisted banner index");
                None
            }
        };

        let mut carousel = Carousel::new(store);
        let active = carousel.load(items, persisted.as_deref());
        let carousel = Arc::new(Mutex::new(carousel));

        let rotation = if active {
            Some(spawn_rotation(carousel.clone(), period))
        } else {
            tracing::info!("No trending items; banner stays empty");
            None
        };

        Self {
            client,
            images,
            carousel,
            overlays: Mutex::new(Overlays {
                mounted: true,
                ..Overlays::default()
            }),
            rotation: Mutex::new(rotation),
        }
    }

    /// Cancels rotation and closes overlays. Idempotent.
    pub async fn unmount(&self) {
        {
            let mut overlays = self.overlays.lock().await;
            overlays.mounted = false;
            overlays.trailer = None;
            overlays.info_open = false;
        }

        if let Some(mut rotation) = self.rotation.lock().await.take() {
            rotation.cancel().await;
        }
        tracing::debug!("Banner unmounted");
    }

    pub async fn is_mounted(&self) -> bool {
        self.overlays.lock().await.mounted
    }

    pub async fn is_rotating(&self) -> bool {
        self.rotation
            .lock()
            .await
            .as_ref()
            .is_some_and(RotationHandle::is_running)
    }

    /// Current slide, `None` when the banner is empty
    pub async fn slide(&self) -> Option<BannerSlide> {
        let carousel = self.carousel.lock().await;
        let item = carousel.current()?.clone();
        let index = carousel.index()?;
        let count = carousel.len();
        let paused = carousel.is_paused();
        drop(carousel);

        let overlays = self.overlays.lock().await;
        let info = overlays.info_open.then(|| DetailOverlay::from(&item));
        let trailer = overlays.trailer.clone();
        drop(overlays);

        Some(BannerSlide {
            title: item.display_name_or_default().to_string(),
            overview: item.overview.clone(),
            image_url: item
                .banner_image_path()
                .map(|path| self.images.url(ImageSize::Original, path)),
            index,
            count,
            paused,
            trailer,
            info,
            item,
        })
    }

    pub async fn next(&self) -> Option<BannerSlide> {
        self.carousel.lock().await.next()?;
        self.slide().await
    }

    pub async fn prev(&self) -> Option<BannerSlide> {
        self.carousel.lock().await.prev()?;
        self.slide().await
    }

    /// Pointer entered the banner region
    pub async fn hover_start(&self) -> Option<BannerSlide> {
        self.carousel.lock().await.pause();
        self.slide().await
    }

    /// Pointer left the banner region
    pub async fn hover_end(&self) -> Option<BannerSlide> {
        self.carousel.lock().await.resume();
        self.slide().await
    }

    /// Looks up a YouTube trailer for the current item and opens the player
    ///
    /// Returns `None` when the banner is empty, when the item has no
    /// embeddable trailer, or when the banner was unmounted while the lookup
    /// was in flight.
    pub async fn play_trailer(&self) -> Option<TrailerOverlay> {
        let movie_id = self.carousel.lock().await.current()?.id;

        let videos = catalog::fetch_videos(self.client.as_ref(), movie_id).await;
        let Some(trailer) = find_trailer(&videos) else {
            tracing::debug!(movie_id, videos = videos.len(), "No trailer found");
            return None;
        };

        let overlay = TrailerOverlay {
            movie_id,
            video_key: trailer.key.clone(),
            embed_url: trailer.embed_url(),
        };

        let mut overlays = self.overlays.lock().await;
        if !overlays.mounted {
            tracing::debug!(movie_id, "Banner unmounted before trailer lookup finished");
            return None;
        }
        overlays.trailer = Some(overlay.clone());

        Some(overlay)
    }

    pub async fn close_trailer(&self) {
        self.overlays.lock().await.trailer = None;
    }

    /// Opens the "more info" overlay for the current item
    pub async fn open_info(&self) -> Option<DetailOverlay> {
        let detail = self.carousel.lock().await.current().map(DetailOverlay::from)?;
        let mut overlays = self.overlays.lock().await;
        if !overlays.mounted {
            return None;
        }
        overlays.info_open = true;
        Some(detail)
    }

    pub async fn info(&self) -> Option<DetailOverlay> {
        if !self.overlays.lock().await.info_open {
            return None;
        }
        self.carousel.lock().await.current().map(DetailOverlay::from)
    }

    pub async fn close_info(&self) {
        self.overlays.lock().await.info_open = false;
    }
}
