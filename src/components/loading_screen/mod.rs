//! Full-screen intro: particles drift, assemble into "NG", morph into
//! "NextGen", collapse to the center and fade, then hand over to the page.

mod component;

pub use component::LoadingScreen;
