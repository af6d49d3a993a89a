//! Ambient canvas backgrounds: the hero dot grid and the linked constellation.

mod component;

pub use component::{InteractiveDotGrid, ParticleField};
