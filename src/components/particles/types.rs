//! Particle records and the small amount of 2D geometry the effects need.

use std::ops::{Add, AddAssign, Mul, Sub};

use serde::Deserialize;

/// Below this width a viewport is treated as touch-primary.
pub const COMPACT_BREAKPOINT: f64 = 768.0;

/// A point or displacement in surface-local CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
	pub x: f64,
	pub y: f64,
}

impl Vec2 {
	pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn length_squared(self) -> f64 {
		self.x * self.x + self.y * self.y
	}

	pub fn length(self) -> f64 {
		self.length_squared().sqrt()
	}

	pub fn distance(self, other: Vec2) -> f64 {
		(self - other).length()
	}

	/// Linear interpolation, `t` clamped to [0, 1].
	pub fn lerp(self, other: Vec2, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		self + (other - self) * t
	}
}

impl Add for Vec2 {
	type Output = Vec2;
	fn add(self, rhs: Vec2) -> Vec2 {
		Vec2::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl AddAssign for Vec2 {
	fn add_assign(&mut self, rhs: Vec2) {
		self.x += rhs.x;
		self.y += rhs.y;
	}
}

impl Sub for Vec2 {
	type Output = Vec2;
	fn sub(self, rhs: Vec2) -> Vec2 {
		Vec2::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Mul<f64> for Vec2 {
	type Output = Vec2;
	fn mul(self, rhs: f64) -> Vec2 {
		Vec2::new(self.x * rhs, self.y * rhs)
	}
}

/// Size of the drawing surface in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Zero or negative extents produce no particles and no drawing.
	pub fn is_degenerate(&self) -> bool {
		!(self.width > 0.0 && self.height > 0.0)
	}

	pub fn area(&self) -> f64 {
		if self.is_degenerate() {
			0.0
		} else {
			self.width * self.height
		}
	}

	pub fn center(&self) -> Vec2 {
		Vec2::new(self.width / 2.0, self.height / 2.0)
	}

	/// Phones and narrow windows: no pointer interaction, lighter particle tiers.
	pub fn is_compact(&self) -> bool {
		self.width < COMPACT_BREAKPOINT
	}

	/// Half-open containment test, `[0, width) x [0, height)`.
	pub fn contains(&self, p: Vec2) -> bool {
		p.x >= 0.0 && p.x < self.width && p.y >= 0.0 && p.y < self.height
	}
}

/// Which motion model drives a particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
	/// Hero dot grid: drifts horizontally away from the center line on a wave.
	DotGrid,
	/// Linked constellation: slow constant velocity plus a circular wobble.
	Constellation,
	/// Faint loading-screen dust.
	Backdrop,
	/// Loading-screen particle that assembles into text.
	Formation,
}

/// Coarse classification used by the update and render steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleRole {
	Ambient,
	Formation,
}

/// A single animated point.
#[derive(Clone, Debug)]
pub struct Particle {
	/// Smoothed on-screen position.
	pub position: Vec2,
	/// Drifting anchor the wander motion is computed around.
	pub base: Vec2,
	/// Last composited target; transient, rewritten every update.
	pub target: Vec2,
	/// Constant drift per reference frame (constellation only).
	pub velocity: Vec2,
	pub size: f64,
	pub opacity: f64,
	/// Per-frame speed; meaning depends on the profile.
	pub speed: f64,
	/// Randomized so particles never move in lockstep.
	pub phase: f64,
	/// Wander amplitude scale.
	pub drift: f64,
	/// -1.0 or 1.0; dot-grid particles drift away from the center line.
	pub direction: f64,
	/// Palette index.
	pub tint: usize,
	/// Index into the glyph target sets for formation particles.
	pub slot: usize,
	pub profile: Profile,
}

impl Particle {
	/// A particle resting at `at` with neutral attributes.
	pub fn at(at: Vec2, profile: Profile) -> Self {
		Self {
			position: at,
			base: at,
			target: at,
			velocity: Vec2::ZERO,
			size: 1.0,
			opacity: 1.0,
			speed: 0.0,
			phase: 0.0,
			drift: 0.0,
			direction: 1.0,
			tint: 0,
			slot: 0,
			profile,
		}
	}

	pub fn role(&self) -> ParticleRole {
		match self.profile {
			Profile::Formation => ParticleRole::Formation,
			_ => ParticleRole::Ambient,
		}
	}
}

/// How a field reacts to the pointer, resolved once per build.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Interaction {
	None,
	Repulsion { radius: f64, strength: f64 },
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lerp_clamps_progress() {
		let a = Vec2::new(0.0, 0.0);
		let b = Vec2::new(10.0, -10.0);
		assert_eq!(a.lerp(b, 0.5), Vec2::new(5.0, -5.0));
		assert_eq!(a.lerp(b, 2.0), b);
		assert_eq!(a.lerp(b, -1.0), a);
	}

	#[test]
	fn degenerate_viewports_have_no_area() {
		assert_eq!(Viewport::new(0.0, 600.0).area(), 0.0);
		assert_eq!(Viewport::new(800.0, -1.0).area(), 0.0);
		assert_eq!(Viewport::new(f64::NAN, 10.0).area(), 0.0);
		assert_eq!(Viewport::new(10.0, 20.0).area(), 200.0);
	}

	#[test]
	fn containment_is_half_open() {
		let vp = Viewport::new(100.0, 50.0);
		assert!(vp.contains(Vec2::new(0.0, 0.0)));
		assert!(!vp.contains(Vec2::new(100.0, 10.0)));
		assert!(!vp.contains(Vec2::new(10.0, 50.0)));
	}

	#[test]
	fn formation_profile_is_the_only_formation_role() {
		assert_eq!(Particle::at(Vec2::ZERO, Profile::Formation).role(), ParticleRole::Formation);
		for profile in [Profile::DotGrid, Profile::Constellation, Profile::Backdrop] {
			assert_eq!(Particle::at(Vec2::ZERO, profile).role(), ParticleRole::Ambient);
		}
	}
}
