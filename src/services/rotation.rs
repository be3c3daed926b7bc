use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::carousel::Carousel;

/// Shortest period the task will tick at; `interval_at` panics on zero
const MIN_PERIOD: Duration = Duration::from_secs(1);

/// Cancellable handle for the periodic banner rotation task
///
/// The task ticks the carousel once per period, first firing one full period
/// after it starts. Manual navigation does not restart the period. Dropping
/// the handle stops the task as well.
pub struct RotationHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for RotationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotationHandle")
            .field("running", &self.is_running())
            .finish()
    }
}

/// Starts ticking `carousel` every `period`, never faster than once a second
pub fn spawn_rotation(carousel: Arc<Mutex<Carousel>>, period: Duration) -> RotationHandle {
    if period < MIN_PERIOD {
        tracing::warn!(
            requested_ms = period.as_millis() as u64,
            "Banner rotation period too short, using {:?}",
            MIN_PERIOD
        );
    }
    let period = period.max(MIN_PERIOD);
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::debug!(period_secs = period.as_secs_f64(), "Banner rotation started");

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Some(index) = carousel.lock().await.tick() {
                        tracing::trace!(index, "Banner rotated");
                    }
                }
                _ = shutdown_rx.recv() => break,
            }
        }

        tracing::debug!("Banner rotation stopped");
    });

    RotationHandle {
        shutdown_tx,
        task: Some(task),
    }
}

impl RotationHandle {
    /// Stops the task and waits for it to exit
    ///
    /// After this returns no further ticks are applied.
    pub async fn cancel(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = task.await {
            if !e.is_cancelled() {
                tracing::error!(error = %e, "Banner rotation task failed");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for RotationHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::CatalogItem;
    use crate::services::carousel::BANNER_INDEX_KEY;

    const PERIOD: Duration = Duration::from_secs(8);

    fn loaded_carousel(store: Arc<MemoryStore>, n: u64) -> Arc<Mutex<Carousel>> {
        let mut carousel = Carousel::new(store);
        carousel.load((1..=n).map(CatalogItem::new).collect(), None);
        Arc::new(Mutex::new(carousel))
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_tick_before_first_period() {
        let store = Arc::new(MemoryStore::new());
        let carousel = loaded_carousel(store, 3);
        let _handle = spawn_rotation(carousel.clone(), PERIOD);

        tokio::time::sleep(Duration::from_secs(7)).await;
        assert_eq!(carousel.lock().await.index(), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_period() {
        let store = Arc::new(MemoryStore::new());
        let carousel = loaded_carousel(store.clone(), 3);
        let _handle = spawn_rotation(carousel.clone(), PERIOD);

        tokio::time::sleep(Duration::from_secs(17)).await;
        assert_eq!(carousel.lock().await.index(), Some(2));
        assert_eq!(store.peek(BANNER_INDEX_KEY), Some("2".to_string()));

        tokio::time::sleep(Duration::from_secs(8)).await;
        assert_eq!(carousel.lock().await.index(), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_step_keeps_rotation_schedule() {
        let store = Arc::new(MemoryStore::new());
        let carousel = loaded_carousel(store, 5);
        let _handle = spawn_rotation(carousel.clone(), PERIOD);

        tokio::time::sleep(Duration::from_secs(4)).await;
        carousel.lock().await.next();
        assert_eq!(carousel.lock().await.index(), Some(1));

        // the tick at t=8s still fires on the original schedule
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(carousel.lock().await.index(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_is_clamped() {
        let store = Arc::new(MemoryStore::new());
        let carousel = loaded_carousel(store, 3);
        let handle = spawn_rotation(carousel.clone(), Duration::ZERO);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(handle.is_running());
        assert_eq!(carousel.lock().await.index(), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_paused_carousel_is_not_advanced() {
        let store = Arc::new(MemoryStore::new());
        let carousel = loaded_carousel(store, 3);
        carousel.lock().await.pause();
        let handle = spawn_rotation(carousel.clone(), PERIOD);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(carousel.lock().await.index(), Some(0));
        assert!(handle.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let store = Arc::new(MemoryStore::new());
        let carousel = loaded_carousel(store, 3);
        let mut handle = spawn_rotation(carousel.clone(), PERIOD);

        tokio::time::sleep(Duration::from_secs(9)).await;
        handle.cancel().await;
        assert!(!handle.is_running());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(carousel.lock().await.index(), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_ticks() {
        let store = Arc::new(MemoryStore::new());
        let carousel = loaded_carousel(store, 3);
        let handle = spawn_rotation(carousel.clone(), PERIOD);
        drop(handle);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(carousel.lock().await.index(), Some(0));
    }
}
