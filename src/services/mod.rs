pub mod banner;
pub mod carousel;
pub mod catalog;
pub mod home;
pub mod listing;
pub mod rotation;

pub use banner::{Banner, BannerSlide, TrailerOverlay};
pub use carousel::{Carousel, CarouselState};
pub use catalog::{CatalogClient, TmdbClient};
pub use home::RowKind;
pub use listing::{DetailOverlay, ListingView, RowRender};
