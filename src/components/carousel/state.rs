//! Infinite carousel model.
//!
//! Items are rendered three times in a row and the view starts on the middle
//! copy. After a slide animation settles outside the middle copy, the index
//! jumps by one copy length and the track offset is snapped to match, which
//! is invisible because the copies are identical.

use serde::Deserialize;

use crate::components::particles::types::COMPACT_BREAKPOINT;

/// Number of rendered copies of the item list.
pub const COPIES: usize = 3;
/// Largest integration step for the spring, in seconds.
const MAX_SPRING_STEP: f64 = 1.0 / 240.0;
/// Distance and speed below which a spring counts as settled.
const REST_EPSILON: f64 = 0.5;

/// Carousel sizing and motion configuration.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CarouselStyle {
	pub gap: f64,
	pub autoplay_ms: f64,
	pub stiffness: f64,
	pub damping: f64,
	pub mass: f64,
	/// Item width below the compact breakpoint, as a share of the window.
	pub compact_width_ratio: f64,
	pub compact_max_width: f64,
	pub wide_width: f64,
}

impl Default for CarouselStyle {
	fn default() -> Self {
		Self {
			gap: 16.0,
			autoplay_ms: 1000.0,
			stiffness: 300.0,
			damping: 30.0,
			mass: 0.8,
			compact_width_ratio: 0.75,
			compact_max_width: 350.0,
			wide_width: 600.0,
		}
	}
}

impl CarouselStyle {
	pub fn item_width(&self, window_width: f64) -> f64 {
		if window_width < COMPACT_BREAKPOINT {
			(window_width * self.compact_width_ratio).min(self.compact_max_width)
		} else {
			self.wide_width
		}
	}
}

/// Damped spring integrated with semi-implicit Euler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
	pub position: f64,
	pub velocity: f64,
	pub target: f64,
	stiffness: f64,
	damping: f64,
	mass: f64,
}

impl Spring {
	pub fn new(position: f64, stiffness: f64, damping: f64, mass: f64) -> Self {
		Self {
			position,
			velocity: 0.0,
			target: position,
			stiffness,
			damping,
			mass: if mass > 0.0 { mass } else { 1.0 },
		}
	}

	pub fn step(&mut self, dt: f64) {
		if !dt.is_finite() || dt <= 0.0 {
			return;
		}
		let steps = (dt / MAX_SPRING_STEP).ceil().max(1.0) as usize;
		let h = dt / steps as f64;
		for _ in 0..steps {
			let force = -self.stiffness * (self.position - self.target) - self.damping * self.velocity;
			self.velocity += force / self.mass * h;
			self.position += self.velocity * h;
		}
	}

	pub fn is_settled(&self) -> bool {
		(self.position - self.target).abs() < REST_EPSILON && self.velocity.abs() < REST_EPSILON
	}

	/// Jumps to `position` with no motion.
	pub fn snap(&mut self, position: f64) {
		self.position = position;
		self.target = position;
		self.velocity = 0.0;
	}
}

/// Position, animation and autoplay state of one carousel.
#[derive(Clone, Debug)]
pub struct Carousel {
	len: usize,
	index: usize,
	pending: Option<usize>,
	spring: Spring,
	style: CarouselStyle,
	container_width: f64,
	item_width: f64,
	hovered: bool,
	last_advance_ms: Option<f64>,
}

impl Carousel {
	pub fn new(len: usize, container_width: f64, window_width: f64, style: CarouselStyle) -> Self {
		let mut carousel = Self {
			len,
			index: len,
			pending: None,
			spring: Spring::new(0.0, style.stiffness, style.damping, style.mass),
			style,
			container_width,
			item_width: style.item_width(window_width),
			hovered: false,
			last_advance_ms: None,
		};
		carousel.spring.snap(carousel.offset_for(carousel.index));
		carousel
	}

	/// Track translation that centers `index` in the container.
	pub fn offset_for(&self, index: usize) -> f64 {
		let center = self.container_width / 2.0 - self.item_width / 2.0;
		-(index as f64 * (self.item_width + self.style.gap)) + center
	}

	pub fn offset(&self) -> f64 {
		self.spring.position
	}

	pub fn index(&self) -> usize {
		self.index
	}

	pub fn item_width(&self) -> f64 {
		self.item_width
	}

	/// Number of rendered slides.
	pub fn display_len(&self) -> usize {
		self.len * COPIES
	}

	/// Progress dot for the current slide.
	pub fn active_dot(&self) -> usize {
		if self.len == 0 { 0 } else { self.index % self.len }
	}

	pub fn is_animating(&self) -> bool {
		self.pending.is_some()
	}

	/// Recomputes sizes and snaps to the current slide without animating.
	pub fn resize(&mut self, container_width: f64, window_width: f64) {
		self.container_width = container_width;
		self.item_width = self.style.item_width(window_width);
		if let Some(pending) = self.pending.take() {
			self.index = pending;
			self.recenter();
		}
		self.spring.snap(self.offset_for(self.index));
	}

	pub fn set_hovered(&mut self, hovered: bool) {
		self.hovered = hovered;
		if !hovered {
			self.last_advance_ms = None;
		}
	}

	fn go_to(&mut self, index: usize) {
		if self.len == 0 {
			return;
		}
		let index = index.min(self.display_len() - 1);
		self.pending = Some(index);
		self.spring.target = self.offset_for(index);
	}

	pub fn next(&mut self) {
		let from = self.pending.unwrap_or(self.index);
		self.go_to(from + 1);
	}

	pub fn prev(&mut self) {
		let from = self.pending.unwrap_or(self.index);
		if let Some(index) = from.checked_sub(1) {
			self.go_to(index);
		}
	}

	/// Shifts the index back into the middle copy.
	fn recenter(&mut self) {
		if self.len == 0 {
			return;
		}
		while self.index < self.len {
			self.index += self.len;
		}
		while self.index >= 2 * self.len {
			self.index -= self.len;
		}
	}

	/// Advances autoplay and the slide animation. Returns `true` when the
	/// visible state changed.
	pub fn tick(&mut self, now_ms: f64, dt: f64) -> bool {
		if self.len == 0 {
			return false;
		}
		if !self.hovered && self.pending.is_none() {
			match self.last_advance_ms {
				None => self.last_advance_ms = Some(now_ms),
				Some(last) if now_ms - last >= self.style.autoplay_ms => {
					self.last_advance_ms = Some(now_ms);
					self.next();
				}
				Some(_) => {}
			}
		}

		let Some(pending) = self.pending else {
			return false;
		};
		self.spring.step(dt);
		if self.spring.is_settled() {
			self.index = pending;
			self.pending = None;
			self.recenter();
			self.spring.snap(self.offset_for(self.index));
			self.last_advance_ms = Some(now_ms);
		}
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn carousel(len: usize) -> Carousel {
		Carousel::new(len, 1200.0, 1280.0, CarouselStyle::default())
	}

	/// Ticks at 60 Hz until the slide animation settles.
	fn settle(c: &mut Carousel, now: &mut f64) {
		for _ in 0..600 {
			*now += 1000.0 / 60.0;
			c.tick(*now, 1.0 / 60.0);
			if !c.is_animating() {
				return;
			}
		}
		panic!("carousel never settled");
	}

	#[test]
	fn starts_centered_on_the_middle_copy() {
		let c = carousel(4);
		assert_eq!(c.index(), 4);
		assert_eq!(c.display_len(), 12);
		assert_eq!(c.offset(), -(4.0 * 616.0) + 600.0 - 300.0);
		assert_eq!(c.active_dot(), 0);
	}

	#[test]
	fn compact_windows_use_narrow_items() {
		let style = CarouselStyle::default();
		assert_eq!(style.item_width(390.0), 292.5);
		assert_eq!(style.item_width(600.0), 350.0);
		assert_eq!(style.item_width(1024.0), 600.0);
	}

	#[test]
	fn spring_settles_on_target() {
		let mut spring = Spring::new(0.0, 300.0, 30.0, 0.8);
		spring.target = -616.0;
		for _ in 0..120 {
			spring.step(1.0 / 60.0);
		}
		assert!(spring.is_settled());
		assert!((spring.position + 616.0).abs() < REST_EPSILON);
	}

	#[test]
	fn wrapping_forward_returns_to_middle_copy() {
		let mut c = carousel(3);
		let mut now = 0.0;
		c.set_hovered(true);
		for _ in 0..5 {
			c.next();
			settle(&mut c, &mut now);
			assert!((3..6).contains(&c.index()));
			assert_eq!(c.offset(), c.offset_for(c.index()));
		}
		assert_eq!(c.active_dot(), 2);
	}

	#[test]
	fn wrapping_backward_returns_to_middle_copy() {
		let mut c = carousel(3);
		let mut now = 0.0;
		c.set_hovered(true);
		c.prev();
		settle(&mut c, &mut now);
		assert_eq!(c.index(), 5);
		assert_eq!(c.active_dot(), 2);
	}

	#[test]
	fn autoplay_advances_when_idle_and_pauses_on_hover() {
		let mut c = carousel(3);
		c.tick(0.0, 0.0);
		assert!(!c.is_animating());
		c.tick(999.0, 0.0);
		assert!(!c.is_animating());
		c.tick(1000.0, 0.0);
		assert!(c.is_animating());

		let mut now = 1000.0;
		settle(&mut c, &mut now);
		assert_eq!(c.index(), 4);

		c.set_hovered(true);
		c.tick(now + 5000.0, 0.0);
		assert!(!c.is_animating());
	}

	#[test]
	fn resize_snaps_without_animation() {
		let mut c = carousel(3);
		c.next();
		c.resize(380.0, 390.0);
		assert!(!c.is_animating());
		assert_eq!(c.index(), 4);
		assert_eq!(c.item_width(), 292.5);
		assert_eq!(c.offset(), c.offset_for(4));
	}

	#[test]
	fn one_dot_is_active_for_every_slide() {
		let mut c = carousel(4);
		let mut now = 0.0;
		c.set_hovered(true);
		let mut seen = Vec::new();
		for _ in 0..8 {
			seen.push(c.active_dot());
			c.next();
			settle(&mut c, &mut now);
		}
		assert_eq!(seen, [0, 1, 2, 3, 0, 1, 2, 3]);
	}

	#[test]
	fn empty_carousel_is_inert() {
		let mut c = carousel(0);
		c.next();
		c.prev();
		assert!(!c.tick(5000.0, 0.1));
		assert_eq!(c.active_dot(), 0);
	}
}
