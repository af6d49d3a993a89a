//! Headless particle engine shared by every canvas effect on the site.
//!
//! - [`builder`] scatters fresh particle sets over a viewport
//! - [`physics`] advances them one frame (drift, wave, repulsion, formation)
//! - [`render`] paints them onto any [`surface::Surface`]
//! - [`scheduler`] paces frames and coalesces resizes
//! - [`timeline`] drives the loading-screen phases
//!
//! Nothing in here touches the DOM except [`surface::CanvasSurface`],
//! [`glyphs::rasterize_text`] and [`builder::browser_rng`], so the whole
//! update/render split runs under `cargo test` with a recording surface.

pub mod builder;
pub mod glyphs;
pub mod physics;
pub mod render;
pub mod scheduler;
pub mod surface;
pub mod system;
pub mod theme;
pub mod timeline;
pub mod types;

pub use system::{LoadingScene, ParticleSystem};
pub use theme::{Color, FieldStyle, LoadingStyle};
pub use types::{Particle, Vec2, Viewport};
