//! Drawing surface capability.
//!
//! The render step only needs a handful of immediate-mode primitives. The
//! browser implementation wraps a 2D canvas context; tests record the calls.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::theme::Color;
use super::types::{Vec2, Viewport};

/// Immediate-mode 2D drawing operations used by the effects.
pub trait Surface {
	/// Clears the whole surface to transparent.
	fn clear(&mut self);
	/// Filled circle; `alpha` multiplies the color's own alpha.
	fn fill_circle(&mut self, center: Vec2, radius: f64, color: Color, alpha: f64);
	fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, alpha: f64, width: f64);
	/// Full-surface radial wash fading from `alpha` at `center` to nothing at `radius`.
	fn fill_radial_glow(&mut self, center: Vec2, radius: f64, color: Color, alpha: f64);
}

/// A recorded drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
	Clear,
	Circle {
		center: Vec2,
		radius: f64,
		color: Color,
		alpha: f64,
	},
	Line {
		from: Vec2,
		to: Vec2,
		color: Color,
		alpha: f64,
		width: f64,
	},
	Glow {
		center: Vec2,
		radius: f64,
		color: Color,
		alpha: f64,
	},
}

/// Headless surface that remembers what was drawn.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
	pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
	pub fn circles(&self) -> impl Iterator<Item = &DrawCall> {
		self.calls
			.iter()
			.filter(|c| matches!(c, DrawCall::Circle { .. }))
	}

	pub fn lines(&self) -> impl Iterator<Item = &DrawCall> {
		self.calls
			.iter()
			.filter(|c| matches!(c, DrawCall::Line { .. }))
	}
}

impl Surface for RecordingSurface {
	fn clear(&mut self) {
		self.calls.push(DrawCall::Clear);
	}

	fn fill_circle(&mut self, center: Vec2, radius: f64, color: Color, alpha: f64) {
		self.calls.push(DrawCall::Circle {
			center,
			radius,
			color,
			alpha,
		});
	}

	fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, alpha: f64, width: f64) {
		self.calls.push(DrawCall::Line {
			from,
			to,
			color,
			alpha,
			width,
		});
	}

	fn fill_radial_glow(&mut self, center: Vec2, radius: f64, color: Color, alpha: f64) {
		self.calls.push(DrawCall::Glow {
			center,
			radius,
			color,
			alpha,
		});
	}
}

/// A 2D canvas context sized to a viewport at the device pixel ratio.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	viewport: Viewport,
}

impl CanvasSurface {
	/// Acquires the canvas' 2D context. `None` when the browser refuses one.
	pub fn new(canvas: &HtmlCanvasElement, viewport: Viewport) -> Option<Self> {
		let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
		let mut surface = Self {
			canvas: canvas.clone(),
			ctx,
			viewport,
		};
		surface.resize(viewport);
		Some(surface)
	}

	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// Sizes the backing store for the device pixel ratio and scales drawing
	/// back to CSS pixels.
	pub fn resize(&mut self, viewport: Viewport) {
		let dpr = web_sys::window()
			.map(|w| w.device_pixel_ratio())
			.filter(|d| *d > 0.0)
			.unwrap_or(1.0);
		self.canvas.set_width((viewport.width.max(0.0) * dpr) as u32);
		self.canvas.set_height((viewport.height.max(0.0) * dpr) as u32);
		let style = self.canvas.style();
		let _ = style.set_property("width", &format!("{}px", viewport.width));
		let _ = style.set_property("height", &format!("{}px", viewport.height));
		let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
		self.viewport = viewport;
	}
}

impl Surface for CanvasSurface {
	fn clear(&mut self) {
		self.ctx
			.clear_rect(0.0, 0.0, self.viewport.width, self.viewport.height);
	}

	fn fill_circle(&mut self, center: Vec2, radius: f64, color: Color, alpha: f64) {
		if radius <= 0.0 || alpha <= 0.0 {
			return;
		}
		self.ctx.begin_path();
		let _ = self.ctx.arc(center.x, center.y, radius, 0.0, TAU);
		self.ctx.set_fill_style_str(&color.to_css_alpha(alpha));
		self.ctx.fill();
	}

	fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, alpha: f64, width: f64) {
		if alpha <= 0.0 {
			return;
		}
		self.ctx.set_stroke_style_str(&color.to_css_alpha(alpha));
		self.ctx.set_line_width(width);
		self.ctx.begin_path();
		self.ctx.move_to(from.x, from.y);
		self.ctx.line_to(to.x, to.y);
		self.ctx.stroke();
	}

	fn fill_radial_glow(&mut self, center: Vec2, radius: f64, color: Color, alpha: f64) {
		let Ok(gradient) = self
			.ctx
			.create_radial_gradient(center.x, center.y, 0.0, center.x, center.y, radius)
		else {
			return;
		};
		let _ = gradient.add_color_stop(0.0, &color.to_css_alpha(alpha));
		let _ = gradient.add_color_stop(0.5, &color.to_css_alpha(alpha * 0.15));
		let _ = gradient.add_color_stop(1.0, &color.to_css_alpha(0.0));

		#[allow(deprecated)]
		self.ctx.set_fill_style(&gradient);
		self.ctx
			.fill_rect(0.0, 0.0, self.viewport.width, self.viewport.height);
	}
}
