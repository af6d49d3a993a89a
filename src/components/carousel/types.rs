use serde::Deserialize;

/// One slide of the carousel.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CarouselItem {
	pub title: String,
	pub subtitle: String,
	/// Image URL.
	pub image: String,
	/// Revealed on hover.
	#[serde(default)]
	pub desc: Option<String>,
}
