//! Glyph target sets: text rendered to an offscreen raster and sampled into
//! a sparse cloud of points particles can assemble into.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::types::{Vec2, Viewport};

/// Pixels with alpha above this value count as inked.
pub const ALPHA_THRESHOLD: u8 = 128;
/// Smallest sampling stride, in pixels.
const MIN_STRIDE: usize = 6;

/// Alpha channel of a rendered raster, row-major.
#[derive(Clone, Debug)]
pub struct AlphaMask {
	width: usize,
	height: usize,
	alpha: Vec<u8>,
}

impl AlphaMask {
	/// Builds a mask from a raw alpha buffer; `None` if the sizes disagree.
	pub fn new(width: usize, height: usize, alpha: Vec<u8>) -> Option<Self> {
		(alpha.len() == width * height).then_some(Self {
			width,
			height,
			alpha,
		})
	}

	/// Keeps the alpha channel of an RGBA buffer such as `ImageData::data()`.
	pub fn from_rgba(width: usize, height: usize, rgba: &[u8]) -> Option<Self> {
		if rgba.len() != width * height * 4 {
			return None;
		}
		let alpha = rgba.chunks_exact(4).map(|px| px[3]).collect();
		Self::new(width, height, alpha)
	}

	pub fn width(&self) -> usize {
		self.width
	}

	pub fn height(&self) -> usize {
		self.height
	}

	fn inked(&self, x: usize, y: usize) -> bool {
		self.alpha[y * self.width + x] > ALPHA_THRESHOLD
	}

	fn count_at(&self, stride: usize) -> usize {
		let mut count = 0;
		for y in (0..self.height).step_by(stride) {
			for x in (0..self.width).step_by(stride) {
				if self.inked(x, y) {
					count += 1;
				}
			}
		}
		count
	}

	fn collect_at(&self, stride: usize) -> Vec<Vec2> {
		let mut points = Vec::new();
		for y in (0..self.height).step_by(stride) {
			for x in (0..self.width).step_by(stride) {
				if self.inked(x, y) {
					points.push(Vec2::new(x as f64, y as f64));
				}
			}
		}
		points
	}
}

/// Starting stride for a font size: `max(6, round(font_size / 20))`.
pub fn base_stride(font_size: f64) -> usize {
	let stride = (font_size / 20.0).round();
	if stride.is_finite() && stride > MIN_STRIDE as f64 {
		stride as usize
	} else {
		MIN_STRIDE
	}
}

/// Samples inked pixels on a grid, widening the stride until at most
/// `max_points` remain.
pub fn sample(mask: &AlphaMask, font_size: f64, max_points: usize) -> GlyphTargets {
	let mut stride = base_stride(font_size);
	let mut count = mask.count_at(stride);

	while count > max_points {
		if max_points == 0 {
			return GlyphTargets::default();
		}
		let ratio = (count as f64 / max_points as f64).sqrt();
		stride = ((stride as f64 * ratio).ceil() as usize).max(stride + 1);
		count = mask.count_at(stride);
	}

	GlyphTargets::new(mask.collect_at(stride))
}

/// Immutable sampled glyph coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphTargets {
	points: Vec<Vec2>,
}

impl GlyphTargets {
	pub fn new(points: Vec<Vec2>) -> Self {
		Self { points }
	}

	pub fn points(&self) -> &[Vec2] {
		&self.points
	}

	pub fn len(&self) -> usize {
		self.points.len()
	}

	pub fn is_empty(&self) -> bool {
		self.points.is_empty()
	}

	/// Point for a particle slot; slots beyond the set wrap around.
	pub fn wrapped(&self, slot: usize) -> Option<Vec2> {
		if self.points.is_empty() {
			None
		} else {
			Some(self.points[slot % self.points.len()])
		}
	}
}

/// The two texts of the loading sequence.
#[derive(Clone, Debug, Default)]
pub struct FormationTargets {
	pub first: GlyphTargets,
	pub second: GlyphTargets,
}

impl FormationTargets {
	pub fn new(first: GlyphTargets, second: GlyphTargets) -> Self {
		Self { first, second }
	}

	/// Enough formation particles to cover the larger set.
	pub fn particle_count(&self) -> usize {
		self.first.len().max(self.second.len())
	}

	/// Glyph point for `slot`, interpolated from the first text toward the
	/// second by `morph`. Falls back to whichever set is non-empty.
	pub fn target_for(&self, slot: usize, morph: f64) -> Option<Vec2> {
		match (self.first.wrapped(slot), self.second.wrapped(slot)) {
			(Some(a), Some(b)) => Some(if morph > 0.0 { a.lerp(b, morph) } else { a }),
			(Some(a), None) => Some(a),
			(None, Some(b)) => Some(b),
			(None, None) => None,
		}
	}
}

/// Font sizes and caps for the loading texts at a viewport size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormationLayout {
	pub first_font_size: f64,
	pub second_font_size: f64,
	pub max_points: usize,
	pub backdrop_count: usize,
}

impl FormationLayout {
	pub fn for_viewport(viewport: Viewport) -> Self {
		let (w, h) = (viewport.width, viewport.height);
		if viewport.is_compact() {
			// Larger type on phones so the sampled outline stays legible.
			Self {
				first_font_size: (w * 0.45).min(h * 0.3),
				second_font_size: (w * 0.18).min(h * 0.12),
				max_points: 300,
				backdrop_count: 40,
			}
		} else {
			Self {
				first_font_size: (h * 0.35).min(w * 0.18),
				second_font_size: (h * 0.2).min(w * 0.08),
				max_points: 600,
				backdrop_count: 80,
			}
		}
	}
}

/// Renders `text` centered on a detached canvas of the viewport's size and
/// returns its alpha channel.
pub fn rasterize_text(
	text: &str,
	viewport: Viewport,
	font_size: f64,
	font_family: &str,
) -> Option<AlphaMask> {
	if viewport.is_degenerate() {
		return None;
	}
	let (w, h) = (viewport.width as u32, viewport.height as u32);
	let document = web_sys::window()?.document()?;
	let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
	canvas.set_width(w);
	canvas.set_height(h);
	let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;

	ctx.set_fill_style_str("#fff");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_font(&format!("900 {font_size}px {font_family}"));
	ctx.fill_text(text, w as f64 / 2.0, h as f64 / 2.0).ok()?;

	let image = ctx.get_image_data(0.0, 0.0, w as f64, h as f64).ok()?;
	AlphaMask::from_rgba(w as usize, h as usize, &image.data())
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	/// A filled rectangle on an otherwise empty mask.
	fn block(width: usize, height: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> AlphaMask {
		let mut alpha = vec![0u8; width * height];
		for y in y0..y1 {
			for x in x0..x1 {
				alpha[y * width + x] = 255;
			}
		}
		AlphaMask::new(width, height, alpha).unwrap()
	}

	#[test]
	fn stride_grows_with_font_size() {
		assert_eq!(base_stride(40.0), 6);
		assert_eq!(base_stride(200.0), 10);
		assert_eq!(base_stride(f64::NAN), 6);
	}

	#[test]
	fn threshold_excludes_faint_pixels() {
		let mask = AlphaMask::new(12, 1, vec![128, 0, 0, 0, 0, 0, 129, 0, 0, 0, 0, 0]).unwrap();
		let points = sample(&mask, 20.0, 100);
		assert_eq!(points.points(), &[Vec2::new(6.0, 0.0)]);
	}

	#[test]
	fn rgba_buffers_keep_only_alpha() {
		let rgba = [255, 255, 255, 200, 0, 0, 0, 10];
		let mask = AlphaMask::from_rgba(2, 1, &rgba).unwrap();
		assert!(mask.inked(0, 0));
		assert!(!mask.inked(1, 0));
		assert!(AlphaMask::from_rgba(2, 2, &rgba).is_none());
	}

	#[test]
	fn large_glyphs_are_thinned_to_the_cap() {
		let mask = block(600, 300, 0, 0, 600, 300);
		let raw = mask.count_at(base_stride(100.0));
		assert!(raw > 500);
		let points = sample(&mask, 100.0, 500);
		assert!(points.len() <= 500);
		assert!(points.len() > 100, "thinning keeps a usable outline");
	}

	#[test]
	fn slots_wrap_around_the_smaller_set() {
		let targets = FormationTargets::new(
			GlyphTargets::new(vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)]),
			GlyphTargets::new(vec![
				Vec2::new(0.0, 10.0),
				Vec2::new(10.0, 10.0),
				Vec2::new(20.0, 10.0),
			]),
		);
		assert_eq!(targets.particle_count(), 3);
		assert_eq!(targets.target_for(2, 0.0), Some(Vec2::new(0.0, 0.0)));
		assert_eq!(targets.target_for(2, 1.0), Some(Vec2::new(20.0, 10.0)));
		assert_eq!(FormationTargets::default().target_for(0, 0.5), None);
	}

	#[test]
	fn compact_layout_uses_lighter_caps() {
		let phone = FormationLayout::for_viewport(Viewport::new(390.0, 844.0));
		assert_eq!(phone.max_points, 300);
		assert_eq!(phone.backdrop_count, 40);
		assert!((phone.first_font_size - 175.5).abs() < 1e-9);

		let desktop = FormationLayout::for_viewport(Viewport::new(1280.0, 800.0));
		assert_eq!(desktop.max_points, 600);
		assert!((desktop.first_font_size - 230.4).abs() < 1e-9);
		assert!((desktop.second_font_size - 102.4).abs() < 1e-9);
	}

	proptest! {
		#[test]
		fn sampling_respects_any_cap(
			w in 1usize..200,
			h in 1usize..120,
			font in 10.0f64..400.0,
			cap in 0usize..400,
		) {
			let mask = block(w, h, 0, 0, w, h);
			let points = sample(&mask, font, cap);
			prop_assert!(points.len() <= cap);
			for p in points.points() {
				prop_assert!(p.x < w as f64 && p.y < h as f64);
			}
		}
	}
}
