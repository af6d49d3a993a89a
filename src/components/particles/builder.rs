//! Builds fresh particle sets for a viewport.
//!
//! Sets are never patched: a resize or a new glyph target discards the old
//! set and draws a new one.

use std::f64::consts::TAU;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::types::{Particle, Profile, Vec2, Viewport};

/// Random source seeded from the browser's `Math.random()`.
pub fn browser_rng() -> SmallRng {
	let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
	let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
	SmallRng::seed_from_u64((hi << 32) | lo)
}

/// Draws a uniform value in `[lo, hi)`; degenerate ranges return `lo`.
fn uniform(rng: &mut impl Rng, lo: f64, hi: f64) -> f64 {
	if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

/// Builds `count` particles of `profile` scattered over the viewport.
///
/// Every attribute is an independent draw so the ensemble never moves in
/// sync. A zero-area viewport yields an empty set.
pub fn build(viewport: Viewport, count: usize, profile: Profile, rng: &mut impl Rng) -> Vec<Particle> {
	if viewport.is_degenerate() {
		return Vec::new();
	}
	let center_x = viewport.width / 2.0;
	let mut particles = Vec::with_capacity(count);

	for slot in 0..count {
		let at = Vec2::new(
			uniform(rng, 0.0, viewport.width),
			uniform(rng, 0.0, viewport.height),
		);
		let mut p = Particle::at(at, profile);
		p.slot = slot;
		p.phase = uniform(rng, 0.0, TAU);

		match profile {
			Profile::DotGrid => {
				p.size = uniform(rng, 0.5, 2.0);
				p.opacity = 0.0;
				p.speed = uniform(rng, 0.2, 0.7);
				p.direction = if at.x < center_x { -1.0 } else { 1.0 };
			}
			Profile::Constellation => {
				p.velocity = Vec2::new(uniform(rng, -0.25, 0.25), uniform(rng, -0.25, 0.25));
				p.size = uniform(rng, 1.0, 4.0);
				p.opacity = uniform(rng, 0.2, 0.8);
				p.speed = uniform(rng, 0.005, 0.025);
				p.tint = rng.gen_range(0..usize::MAX);
			}
			Profile::Backdrop => {
				p.size = uniform(rng, 0.5, 1.3);
				p.opacity = uniform(rng, 0.03, 0.09);
				p.drift = uniform(rng, 0.1, 0.4);
			}
			Profile::Formation => {
				p.size = uniform(rng, 1.5, 2.5);
				p.opacity = uniform(rng, 0.6, 1.0);
				p.speed = uniform(rng, 0.03, 0.06);
				p.drift = uniform(rng, 0.15, 0.55);
			}
		}
		particles.push(p);
	}
	particles
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	fn rng() -> SmallRng {
		SmallRng::seed_from_u64(7)
	}

	#[test]
	fn empty_viewport_builds_nothing() {
		assert!(build(Viewport::new(0.0, 0.0), 50, Profile::DotGrid, &mut rng()).is_empty());
		assert!(build(Viewport::new(300.0, 0.0), 50, Profile::Formation, &mut rng()).is_empty());
	}

	#[test]
	fn dot_grid_drifts_away_from_center_line() {
		let particles = build(Viewport::new(1000.0, 500.0), 200, Profile::DotGrid, &mut rng());
		for p in &particles {
			let expected = if p.position.x < 500.0 { -1.0 } else { 1.0 };
			assert_eq!(p.direction, expected);
			assert_eq!(p.position, p.base);
		}
	}

	#[test]
	fn attributes_are_not_synchronized() {
		let particles = build(Viewport::new(800.0, 600.0), 100, Profile::Formation, &mut rng());
		let first = &particles[0];
		assert!(particles.iter().any(|p| p.phase != first.phase));
		assert!(particles.iter().any(|p| p.speed != first.speed));
		assert!(particles.iter().enumerate().all(|(i, p)| p.slot == i));
	}

	#[test]
	fn rebuild_after_resize_fits_new_bounds() {
		let mut r = rng();
		let before = build(Viewport::new(1920.0, 1080.0), 300, Profile::DotGrid, &mut r);
		assert!(before.iter().any(|p| p.position.x > 400.0));

		let small = Viewport::new(390.0, 844.0);
		let after = build(small, 80, Profile::DotGrid, &mut r);
		assert_eq!(after.len(), 80);
		assert!(after.iter().all(|p| small.contains(p.position)));
	}

	proptest! {
		#[test]
		fn builds_exactly_n_within_bounds(
			w in 1.0f64..4000.0,
			h in 1.0f64..4000.0,
			n in 0usize..600,
			seed in any::<u64>(),
		) {
			let viewport = Viewport::new(w, h);
			let mut r = SmallRng::seed_from_u64(seed);
			for profile in [Profile::DotGrid, Profile::Constellation, Profile::Backdrop, Profile::Formation] {
				let particles = build(viewport, n, profile, &mut r);
				prop_assert_eq!(particles.len(), n);
				for p in &particles {
					prop_assert!(viewport.contains(p.position));
				}
			}
		}
	}
}
