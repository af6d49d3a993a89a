//! Per-frame particle update: drift, wander, pointer repulsion, formation
//! blending, collapse, smoothing and edge wrap.

use serde::Deserialize;

use super::glyphs::FormationTargets;
use super::timeline::PhaseProgress;
use super::types::{Interaction, Particle, ParticleRole, Profile, Vec2, Viewport};

/// Wave clock rate for the dot grid, in cycles of the wave phase per second.
const DOT_WAVE_RATE: f64 = 0.45;
/// How far past the edge a dot-grid base may drift before wrapping.
const DOT_WRAP_MARGIN: f64 = 50.0;
const WRAP_MARGIN: f64 = 10.0;
/// Scales the formation wander so floating particles cover a few dozen pixels.
const FORMATION_WANDER: f64 = 120.0;

/// Exponential smoothing factor tuned at a reference frame rate.
///
/// The factor is rescaled by the measured frame delta so a 120 Hz display
/// converges at the same wall-clock rate as a 60 Hz one.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Smoothing {
	/// Fraction of the remaining distance covered per reference frame.
	pub factor: f64,
	pub reference_fps: f64,
}

impl Default for Smoothing {
	fn default() -> Self {
		Self {
			factor: 0.1,
			reference_fps: 60.0,
		}
	}
}

impl Smoothing {
	/// Factor for a frame of `dt` seconds, always in [0, 1].
	pub fn factor_for(&self, dt: f64) -> f64 {
		let k = self.factor.clamp(0.0, 1.0);
		let frames = self.frames(dt);
		if frames <= 0.0 {
			return 0.0;
		}
		(1.0 - (1.0 - k).powf(frames)).clamp(0.0, 1.0)
	}

	/// Number of reference frames `dt` seconds stand for.
	pub fn frames(&self, dt: f64) -> f64 {
		if !dt.is_finite() || dt <= 0.0 {
			0.0
		} else {
			dt * self.reference_fps.max(0.0)
		}
	}
}

/// Inputs shared by every particle for one update.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext {
	/// Animated seconds since the field was built.
	pub elapsed: f64,
	/// Seconds since the previous executed update.
	pub dt: f64,
	/// Pointer in surface-local space, if it is over the page.
	pub pointer: Option<Vec2>,
	pub viewport: Viewport,
}

/// Glyph targets plus the timeline progress that blends toward them.
#[derive(Clone, Copy, Debug)]
pub struct FormationInput<'a> {
	pub targets: &'a FormationTargets,
	pub progress: PhaseProgress,
}

/// Per-group settings for one call to [`advance`].
#[derive(Clone, Copy, Debug)]
pub struct Motion<'a> {
	pub interaction: Interaction,
	pub smoothing: Smoothing,
	pub formation: Option<FormationInput<'a>>,
}

impl Motion<'_> {
	pub fn ambient(interaction: Interaction, smoothing: Smoothing) -> Self {
		Self {
			interaction,
			smoothing,
			formation: None,
		}
	}
}

/// Push-back vector for a target near the pointer.
///
/// Magnitude is `(1 - d/r)^2 * strength` inside the radius and zero at or
/// beyond it. A target exactly on the pointer is pushed along +x at full
/// strength.
pub fn repulsion(target: Vec2, pointer: Vec2, radius: f64, strength: f64) -> Vec2 {
	if radius <= 0.0 {
		return Vec2::ZERO;
	}
	let d = target - pointer;
	let dist_sq = d.length_squared();
	if dist_sq >= radius * radius {
		return Vec2::ZERO;
	}
	let t = 1.0 - dist_sq.sqrt() / radius;
	let force = t * t * strength;
	let angle = d.y.atan2(d.x);
	Vec2::new(angle.cos() * force, angle.sin() * force)
}

/// One step of `x += (target - x) * k`.
pub fn smooth_toward(position: Vec2, target: Vec2, k: f64) -> Vec2 {
	position + (target - position) * k.clamp(0.0, 1.0)
}

/// Moves the particle's base by its profile drift and returns the wandering
/// target around that base.
fn wander(p: &mut Particle, elapsed: f64, frames: f64) -> Vec2 {
	match p.profile {
		Profile::DotGrid => {
			p.base.x += p.speed * p.direction * frames;
			let cycle = elapsed * DOT_WAVE_RATE + p.phase;
			let wave_y = (p.base.x * 0.005 + cycle).sin() * 20.0
				+ (p.base.x * 0.01 + cycle * 0.5).sin() * 10.0;
			let wave_x = (p.base.y * 0.005 + cycle).cos() * 15.0;
			p.base + Vec2::new(wave_x, wave_y)
		}
		Profile::Constellation => {
			p.base += p.velocity * frames;
			// Closed form of a per-frame `sin(t * speed + phase) * 0.3` nudge.
			let tau = elapsed * 60.0 * p.speed + p.phase;
			let amplitude = if p.speed > 0.0 { 0.3 / p.speed } else { 0.0 };
			p.base + Vec2::new(tau.sin(), tau.cos()) * amplitude
		}
		Profile::Backdrop => {
			let step = Vec2::new(
				(p.phase + elapsed * 0.3).cos(),
				(p.phase + elapsed * 0.2).sin(),
			);
			p.base += step * (p.drift * frames);
			p.base
		}
		Profile::Formation => {
			let offset = Vec2::new(
				(elapsed * 0.5 + p.phase).sin(),
				(elapsed * 0.3 + p.phase * 1.4).cos(),
			);
			p.base + offset * (p.drift * FORMATION_WANDER)
		}
	}
}

/// Wraps a drifting base to the opposite edge, carrying the position along so
/// the particle does not streak across the surface.
fn wrap(p: &mut Particle, viewport: Viewport) {
	let margin = match p.profile {
		Profile::DotGrid => DOT_WRAP_MARGIN,
		_ => WRAP_MARGIN,
	};
	let span_x = viewport.width + 2.0 * margin;
	let span_y = viewport.height + 2.0 * margin;
	let mut shift = Vec2::ZERO;

	if p.base.x < -margin {
		shift.x = span_x;
	} else if p.base.x > viewport.width + margin {
		shift.x = -span_x;
	}
	if p.base.y < -margin {
		shift.y = span_y;
	} else if p.base.y > viewport.height + margin {
		shift.y = -span_y;
	}

	if shift != Vec2::ZERO {
		p.base += shift;
		p.position += shift;
		p.target += shift;
	}
}

/// Advances every particle one frame, in place.
pub fn advance(particles: &mut [Particle], frame: &FrameContext, motion: &Motion) {
	if frame.viewport.is_degenerate() {
		return;
	}
	let frames = motion.smoothing.frames(frame.dt);
	let k = motion.smoothing.factor_for(frame.dt);
	let center = frame.viewport.center();

	for p in particles.iter_mut() {
		let mut target = wander(p, frame.elapsed, frames);

		if let (Interaction::Repulsion { radius, strength }, Some(pointer)) =
			(motion.interaction, frame.pointer)
		{
			target += repulsion(target, pointer, radius, strength);
		}

		if p.role() == ParticleRole::Formation {
			if let Some(formation) = motion.formation {
				let progress = formation.progress.clamped();
				if let Some(glyph) = formation.targets.target_for(p.slot, progress.morph) {
					target = target.lerp(glyph, progress.converge);
				}
				if progress.collapse > 0.0 {
					target = target.lerp(center, progress.collapse);
				}
			}
		}

		p.target = target;
		p.position = smooth_toward(p.position, target, k);

		if p.role() == ParticleRole::Ambient {
			wrap(p, frame.viewport);
		}
	}
}
