//! Colors and per-effect style configuration.
//!
//! Every style has a `Default` tuned for the site and can be partially
//! overridden from JSON; missing fields keep their defaults.

use serde::{Deserialize, Deserializer};

use super::physics::Smoothing;
use super::timeline::TimelineConfig;
use super::types::{Interaction, Profile, Viewport};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// CSS `rgba()` with the alpha multiplied by `alpha`.
	pub fn to_css_alpha(self, alpha: f64) -> String {
		let a = (self.a * alpha).clamp(0.0, 1.0);
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, a)
	}

	/// Parses `#RRGGBB` or `rgb()`/`rgba()` functional notation.
	pub fn parse(color_str: &str) -> Option<Color> {
		let s = color_str.trim();
		if let Some(hex) = s.strip_prefix('#') {
			if hex.len() != 6 || !hex.is_ascii() {
				return None;
			}
			let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
			let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
			let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
			Some(Color::rgb(r, g, b))
		} else if s.starts_with("rgb") {
			let nums: Vec<&str> = s
				.trim_start_matches("rgba(")
				.trim_start_matches("rgb(")
				.trim_end_matches(')')
				.split(',')
				.map(str::trim)
				.collect();
			let r = nums.first()?.parse().ok()?;
			let g = nums.get(1)?.parse().ok()?;
			let b = nums.get(2)?.parse().ok()?;
			let a = match nums.get(3) {
				Some(a) => a.parse().ok()?,
				None => 1.0,
			};
			Some(Color::rgba(r, g, b, a))
		} else {
			None
		}
	}
}

impl TryFrom<String> for Color {
	type Error = String;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Color::parse(&value).ok_or_else(|| format!("unrecognized color `{value}`"))
	}
}

/// Brand green used by the dot grid and the loading screen.
pub const BRAND_GREEN: Color = Color::rgb(77, 188, 27);

/// Colors a field picks from by particle tint index.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Palette {
	pub colors: Vec<Color>,
}

impl Palette {
	pub fn single(color: Color) -> Self {
		Self { colors: vec![color] }
	}

	/// Bright accents for the linked constellation
	pub fn constellation() -> Self {
		Self {
			colors: vec![
				Color::rgb(74, 222, 128),  // Mint
				Color::rgb(96, 165, 250),  // Sky
				Color::rgb(34, 211, 238),  // Cyan
				Color::rgb(167, 139, 250), // Violet
				Color::rgb(244, 114, 182), // Pink
				Color::rgb(255, 255, 255), // White
			],
		}
	}

	pub fn get(&self, index: usize) -> Color {
		if self.colors.is_empty() {
			return BRAND_GREEN;
		}
		self.colors[index % self.colors.len()]
	}
}

/// How many particles a field gets for a viewport.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Density {
	/// `min(max, floor(area / divisor))`.
	Area { divisor: f64, max: usize },
	/// Fixed tiers for compact and wide viewports.
	Tiered { compact: usize, wide: usize },
	Fixed { count: usize },
}

impl Density {
	pub fn count(&self, viewport: Viewport) -> usize {
		if viewport.is_degenerate() {
			return 0;
		}
		match *self {
			Density::Area { divisor, max } => {
				if divisor <= 0.0 {
					return max;
				}
				((viewport.area() / divisor).floor() as usize).min(max)
			}
			Density::Tiered { compact, wide } => {
				if viewport.is_compact() {
					compact
				} else {
					wide
				}
			}
			Density::Fixed { count } => count,
		}
	}
}

/// Pointer push-back zone.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RepulsionStyle {
	pub radius: f64,
	pub strength: f64,
	/// Keep the zone on compact viewports too.
	pub on_compact: bool,
}

impl Default for RepulsionStyle {
	fn default() -> Self {
		Self {
			radius: 250.0,
			strength: 90.0,
			on_compact: false,
		}
	}
}

/// Style for an ambient particle field (dot grid or constellation).
///
/// In JSON every key is optional; missing keys come from the preset named by
/// `profile` (the dot grid when absent).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "FieldStylePatch")]
pub struct FieldStyle {
	pub profile: Profile,
	pub density: Density,
	pub palette: Palette,
	/// `None` disables pointer interaction entirely.
	pub repulsion: Option<RepulsionStyle>,
	pub smoothing: Smoothing,
	/// Update/render cap; `None` runs on every display refresh.
	pub max_fps: Option<f64>,
	/// Constellation link distance; zero disables links.
	pub link_distance: f64,
	/// Dot opacity when the field has no pointer interaction.
	pub resting_alpha: f64,
	/// Quiet period before a resize rebuilds the field, in milliseconds.
	pub resize_quiet_ms: f64,
}

impl FieldStyle {
	/// Hero background: green dots revealed around the cursor.
	pub fn dot_grid() -> Self {
		Self {
			profile: Profile::DotGrid,
			density: Density::Tiered {
				compact: 80,
				wide: 300,
			},
			palette: Palette::single(BRAND_GREEN),
			repulsion: Some(RepulsionStyle::default()),
			smoothing: Smoothing {
				factor: 0.1,
				reference_fps: 30.0,
			},
			max_fps: Some(30.0),
			link_distance: 0.0,
			resting_alpha: 0.12,
			resize_quiet_ms: 200.0,
		}
	}

	/// Multicolor floating points joined by faint lines.
	pub fn constellation() -> Self {
		Self {
			profile: Profile::Constellation,
			density: Density::Area {
				divisor: 8000.0,
				max: 180,
			},
			palette: Palette::constellation(),
			repulsion: Some(RepulsionStyle {
				radius: 120.0,
				strength: 40.0,
				on_compact: true,
			}),
			smoothing: Smoothing {
				factor: 0.2,
				reference_fps: 60.0,
			},
			max_fps: None,
			link_distance: 100.0,
			resting_alpha: 1.0,
			resize_quiet_ms: 200.0,
		}
	}

	/// Resolves the pointer behavior for a viewport once, at build time.
	pub fn interaction_for(&self, viewport: Viewport) -> Interaction {
		match self.repulsion {
			Some(r) if r.on_compact || !viewport.is_compact() => Interaction::Repulsion {
				radius: r.radius,
				strength: r.strength,
			},
			_ => Interaction::None,
		}
	}
}

impl Default for FieldStyle {
	fn default() -> Self {
		Self::dot_grid()
	}
}

/// Keeps an explicit `null` distinct from an absent key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial [`FieldStyle`]; `None` keeps the base style's value.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldStylePatch {
	pub profile: Option<Profile>,
	pub density: Option<Density>,
	pub palette: Option<Palette>,
	#[serde(deserialize_with = "present")]
	pub repulsion: Option<Option<RepulsionStyle>>,
	pub smoothing: Option<Smoothing>,
	#[serde(deserialize_with = "present")]
	pub max_fps: Option<Option<f64>>,
	pub link_distance: Option<f64>,
	pub resting_alpha: Option<f64>,
	pub resize_quiet_ms: Option<f64>,
}

impl FieldStylePatch {
	pub fn apply(self, base: FieldStyle) -> FieldStyle {
		FieldStyle {
			profile: self.profile.unwrap_or(base.profile),
			density: self.density.unwrap_or(base.density),
			palette: self.palette.unwrap_or(base.palette),
			repulsion: self.repulsion.unwrap_or(base.repulsion),
			smoothing: self.smoothing.unwrap_or(base.smoothing),
			max_fps: self.max_fps.unwrap_or(base.max_fps),
			link_distance: self.link_distance.unwrap_or(base.link_distance),
			resting_alpha: self.resting_alpha.unwrap_or(base.resting_alpha),
			resize_quiet_ms: self.resize_quiet_ms.unwrap_or(base.resize_quiet_ms),
		}
	}
}

impl From<FieldStylePatch> for FieldStyle {
	fn from(patch: FieldStylePatch) -> Self {
		let base = match patch.profile {
			Some(Profile::Constellation) => FieldStyle::constellation(),
			_ => FieldStyle::dot_grid(),
		};
		patch.apply(base)
	}
}

/// Style for the text-formation loading screen.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoadingStyle {
	pub color: Color,
	/// Text the particles first assemble into.
	pub first_text: String,
	/// Text the first word morphs into.
	pub second_text: String,
	/// CSS font stack used when rasterizing glyphs.
	pub font_family: String,
	pub formation_smoothing: Smoothing,
	pub backdrop_smoothing: Smoothing,
	pub timeline: TimelineConfig,
}

impl Default for LoadingStyle {
	fn default() -> Self {
		Self {
			color: BRAND_GREEN,
			first_text: "NG".into(),
			second_text: "NextGen".into(),
			font_family: r#""Arial Black", "Impact", sans-serif"#.into(),
			formation_smoothing: Smoothing {
				factor: 0.08,
				reference_fps: 60.0,
			},
			backdrop_smoothing: Smoothing {
				factor: 0.2,
				reference_fps: 60.0,
			},
			timeline: TimelineConfig::default(),
		}
	}
}
