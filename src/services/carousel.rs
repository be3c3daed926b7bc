/// Hero banner rotation state
///
/// The carousel starts `Empty` and becomes `Active` once a non-empty listing
/// is loaded. While active it shows one item at a time; the index moves on
/// timer ticks (unless a pointer is hovering) and on manual next/prev, always
/// wrapping modulo the item count. Every index change is written to the
/// key-value store so the banner resumes where it left off.
use std::sync::Arc;

use crate::db::KeyValueStore;
use crate::models::CatalogItem;

/// Store key holding the last shown banner index
pub const BANNER_INDEX_KEY: &str = "tmdb-banner-index";

#[derive(Debug, Clone, PartialEq)]
pub enum CarouselState {
    Empty,
    Active {
        items: Vec<CatalogItem>,
        index: usize,
        paused: bool,
    },
}

pub struct Carousel {
    state: CarouselState,
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Carousel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Carousel").field("state", &self.state).finish()
    }
}

/// Parses a persisted index, falling back to 0 when it is missing, not a
/// number, negative, or past the end of the list
pub fn restore_index(persisted: Option<&str>, len: usize) -> usize {
    persisted
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .and_then(|idx| usize::try_from(idx).ok())
        .filter(|idx| *idx < len)
        .unwrap_or(0)
}

impl Carousel {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            state: CarouselState::Empty,
            store,
        }
    }

    pub fn state(&self) -> &CarouselState {
        &self.state
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.state, CarouselState::Empty)
    }

    /// Populates an empty carousel
    ///
    /// An empty listing keeps the carousel `Empty`. Returns whether the
    /// carousel became active.
    pub fn load(&mut self, items: Vec<CatalogItem>, persisted: Option<&str>) -> bool {
        if !self.is_empty() {
            tracing::warn!("Carousel already loaded; ignoring reload");
            return false;
        }
        if items.is_empty() {
            return false;
        }

        let index = restore_index(persisted, items.len());
        tracing::debug!(items = items.len(), index, "Carousel loaded");

        self.state = CarouselState::Active {
            items,
            index,
            paused: false,
        };
        true
    }

    /// Timer tick: advances by one unless paused
    pub fn tick(&mut self) -> Option<usize> {
        match self.state {
            CarouselState::Active { paused: true, .. } => None,
            _ => self.step(1),
        }
    }

    pub fn next(&mut self) -> Option<usize> {
        self.step(1)
    }

    /// Moves back one item; from the first item this wraps to the last
    pub fn prev(&mut self) -> Option<usize> {
        self.step(-1)
    }

    fn step(&mut self, delta: isize) -> Option<usize> {
        let CarouselState::Active { items, index, .. } = &mut self.state else {
            return None;
        };

        let len = items.len() as isize;
        let next = (*index as isize + delta).rem_euclid(len) as usize;
        *index = next;

        self.store.set(BANNER_INDEX_KEY, &next.to_string());
        Some(next)
    }

    /// Pointer entered the banner
    pub fn pause(&mut self) {
        self.set_paused(true);
    }

    /// Pointer left the banner
    pub fn resume(&mut self) {
        self.set_paused(false);
    }

    fn set_paused(&mut self, value: bool) {
        if let CarouselState::Active { paused, .. } = &mut self.state {
            *paused = value;
        }
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, CarouselState::Active { paused: true, .. })
    }

    pub fn index(&self) -> Option<usize> {
        match &self.state {
            CarouselState::Active { index, .. } => Some(*index),
            CarouselState::Empty => None,
        }
    }

    pub fn len(&self) -> usize {
        match &self.state {
            CarouselState::Active { items, .. } => items.len(),
            CarouselState::Empty => 0,
        }
    }

    pub fn current(&self) -> Option<&CatalogItem> {
        match &self.state {
            CarouselState::Active { items, index, .. } => items.get(*index),
            CarouselState::Empty => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn items(n: u64) -> Vec<CatalogItem> {
        (1..=n).map(CatalogItem::new).collect()
    }

    fn carousel_with(store: Arc<MemoryStore>, n: u64, persisted: Option<&str>) -> Carousel {
        let mut carousel = Carousel::new(store);
        assert!(carousel.load(items(n), persisted));
        carousel
    }

    #[test]
    fn test_restore_index_in_range() {
        assert_eq!(restore_index(Some("2"), 3), 2);
        assert_eq!(restore_index(Some(" 1 "), 3), 1);
    }

    #[test]
    fn test_restore_index_out_of_range() {
        assert_eq!(restore_index(Some("5"), 3), 0);
        assert_eq!(restore_index(Some("3"), 3), 0);
        assert_eq!(restore_index(Some("-1"), 3), 0);
    }

    #[test]
    fn test_restore_index_garbage() {
        assert_eq!(restore_index(None, 3), 0);
        assert_eq!(restore_index(Some(""), 3), 0);
        assert_eq!(restore_index(Some("two"), 3), 0);
    }

    #[test]
    fn test_load_restores_persisted_index() {
        let store = Arc::new(MemoryStore::new());
        let carousel = carousel_with(store, 3, Some("2"));
        assert_eq!(carousel.index(), Some(2));
        assert_eq!(carousel.current().map(|i| i.id), Some(3));
    }

    #[test]
    fn test_load_out_of_range_starts_at_zero() {
        let store = Arc::new(MemoryStore::new());
        let carousel = carousel_with(store, 3, Some("5"));
        assert_eq!(carousel.index(), Some(0));
    }

    #[test]
    fn test_load_empty_list_stays_empty() {
        let mut carousel = Carousel::new(Arc::new(MemoryStore::new()));
        assert!(!carousel.load(Vec::new(), Some("1")));
        assert_eq!(carousel.state(), &CarouselState::Empty);
    }

    #[test]
    fn test_second_load_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        let mut carousel = carousel_with(store, 3, None);
        assert!(!carousel.load(items(5), None));
        assert_eq!(carousel.len(), 3);
    }

    #[test]
    fn test_empty_carousel_ignores_transitions() {
        let store = Arc::new(MemoryStore::new());
        let mut carousel = Carousel::new(store.clone());
        assert_eq!(carousel.tick(), None);
        assert_eq!(carousel.next(), None);
        assert_eq!(carousel.prev(), None);
        carousel.pause();
        assert!(!carousel.is_paused());
        assert!(carousel.current().is_none());
        assert_eq!(store.peek(BANNER_INDEX_KEY), None);
    }

    #[test]
    fn test_ticks_cycle_through_every_index() {
        for n in 1..=5u64 {
            let store = Arc::new(MemoryStore::new());
            let mut carousel = carousel_with(store, n, None);
            let seen: Vec<usize> = (0..n * 2).filter_map(|_| carousel.tick()).collect();
            let expected: Vec<usize> = (0..n as usize * 2).map(|i| (i + 1) % n as usize).collect();
            assert_eq!(seen, expected);
        }
    }

    #[test]
    fn test_prev_from_first_wraps_to_last() {
        let store = Arc::new(MemoryStore::new());
        let mut carousel = carousel_with(store.clone(), 3, None);
        assert_eq!(carousel.prev(), Some(2));
        assert_eq!(store.peek(BANNER_INDEX_KEY), Some("2".to_string()));
    }

    #[test]
    fn test_next_from_last_wraps_to_first() {
        let store = Arc::new(MemoryStore::new());
        let mut carousel = carousel_with(store.clone(), 3, Some("2"));
        assert_eq!(carousel.next(), Some(0));
        assert_eq!(store.peek(BANNER_INDEX_KEY), Some("0".to_string()));
    }

    #[test]
    fn test_paused_tick_is_noop() {
        let store = Arc::new(MemoryStore::new());
        let mut carousel = carousel_with(store.clone(), 3, None);
        carousel.pause();
        assert_eq!(carousel.tick(), None);
        assert_eq!(carousel.index(), Some(0));
        assert_eq!(store.peek(BANNER_INDEX_KEY), None);

        carousel.resume();
        assert_eq!(carousel.tick(), Some(1));
    }

    #[test]
    fn test_manual_navigation_works_while_paused() {
        let store = Arc::new(MemoryStore::new());
        let mut carousel = carousel_with(store, 3, None);
        carousel.pause();
        assert_eq!(carousel.next(), Some(1));
        assert!(carousel.is_paused());
    }

    #[test]
    fn test_single_item_stays_at_zero() {
        let store = Arc::new(MemoryStore::new());
        let mut carousel = carousel_with(store, 1, None);
        assert_eq!(carousel.next(), Some(0));
        assert_eq!(carousel.prev(), Some(0));
        assert_eq!(carousel.tick(), Some(0));
    }
}
