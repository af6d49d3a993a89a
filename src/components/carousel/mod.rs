//! Looping image carousel: headless spring/autoplay model plus its Leptos view.

mod component;
pub mod state;
pub mod types;

pub use component::InfiniteCarousel;
pub use state::{Carousel, CarouselStyle};
pub use types::CarouselItem;
