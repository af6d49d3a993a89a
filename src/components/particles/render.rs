//! Per-frame painting of particle sets onto a [`Surface`].
//!
//! Every paint clears and redraws the whole surface; particles are drawn in
//! array order.

use super::surface::Surface;
use super::theme::{FieldStyle, Palette};
use super::timeline::TimelineFrame;
use super::types::{Interaction, Particle, ParticleRole, Profile, Vec2, Viewport};

/// Proximity above which dot-grid particles get a glow ring.
const GLOW_PROXIMITY: f64 = 0.6;
/// Convergence above which formation particles get a halo.
const HALO_CONVERGENCE: f64 = 0.8;

/// Paints an ambient field according to its profile.
pub fn paint_field(
	surface: &mut impl Surface,
	particles: &[Particle],
	style: &FieldStyle,
	interaction: Interaction,
	pointer: Option<Vec2>,
) {
	surface.clear();
	match style.profile {
		Profile::Constellation => {
			paint_constellation(surface, particles, &style.palette, style.link_distance)
		}
		_ => paint_dot_grid(surface, particles, style, interaction, pointer),
	}
}

/// Dots are invisible except around the pointer in repulsion mode; without
/// interaction every dot is drawn at the resting alpha.
fn paint_dot_grid(
	surface: &mut impl Surface,
	particles: &[Particle],
	style: &FieldStyle,
	interaction: Interaction,
	pointer: Option<Vec2>,
) {
	match (interaction, pointer) {
		(Interaction::Repulsion { radius, .. }, Some(pointer)) if radius > 0.0 => {
			let radius_sq = radius * radius;
			for p in particles {
				let dist_sq = (p.position - pointer).length_squared();
				if dist_sq >= radius_sq {
					continue;
				}
				let color = style.palette.get(p.tint);
				let prox = 1.0 - dist_sq.sqrt() / radius;
				let alpha = 0.3 + prox * 0.7;
				let scale = 1.0 + prox * 2.0;

				if prox > GLOW_PROXIMITY {
					surface.fill_circle(
						p.position,
						p.size * scale * 2.5,
						color,
						(prox - GLOW_PROXIMITY) * 0.15,
					);
				}
				surface.fill_circle(p.position, p.size * scale, color, alpha);
			}
		}
		(Interaction::Repulsion { .. }, _) => {}
		(Interaction::None, _) => {
			for p in particles {
				surface.fill_circle(p.position, p.size, style.palette.get(p.tint), style.resting_alpha);
			}
		}
	}
}

fn paint_constellation(surface: &mut impl Surface, particles: &[Particle], palette: &Palette, link: f64) {
	for (i, p) in particles.iter().enumerate() {
		let color = palette.get(p.tint);
		surface.fill_circle(p.position, p.size, color, p.opacity);

		if link <= 0.0 {
			continue;
		}
		for q in &particles[i + 1..] {
			let d = p.position.distance(q.position);
			if d < link {
				surface.stroke_line(p.position, q.position, color, (1.0 - d / link) * 0.15, 0.5);
			}
		}
	}
}

/// Paints the loading scene: central glow, backdrop dust, then the text.
pub fn paint_formation(
	surface: &mut impl Surface,
	particles: &[Particle],
	frame: &TimelineFrame,
	palette: &Palette,
	viewport: Viewport,
) {
	surface.clear();
	let progress = frame.progress.clamped();
	let (converge, collapse) = (progress.converge, progress.collapse);

	let glow = converge * 0.08 * (1.0 - collapse);
	if glow > 0.001 {
		surface.fill_radial_glow(viewport.center(), viewport.width * 0.35, palette.get(0), glow);
	}

	for p in particles {
		let color = palette.get(p.tint);
		match p.role() {
			ParticleRole::Ambient => {
				let pulse = (0.4 + (frame.elapsed * 1.5 + p.phase).sin() * 0.6).max(0.0);
				surface.fill_circle(p.position, p.size, color, p.opacity * pulse);
			}
			ParticleRole::Formation => {
				let fade = 1.0 - collapse;
				let (alpha, size) = if converge > 0.0 {
					(
						p.opacity * (0.2 + converge * 0.8) * fade,
						p.size * (0.6 + converge * 0.4) * (1.0 - collapse * 0.5),
					)
				} else {
					(p.opacity * 0.1, p.size * 0.4)
				};

				if converge > HALO_CONVERGENCE && collapse == 0.0 {
					surface.fill_circle(
						p.position,
						size * 2.5,
						color,
						(converge - HALO_CONVERGENCE) * 0.04,
					);
				}
				surface.fill_circle(p.position, size, color, alpha);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::super::surface::{DrawCall, RecordingSurface};
	use super::super::theme::BRAND_GREEN;
	use super::super::timeline::{Phase, PhaseProgress};
	use super::*;

	fn dot(x: f64, y: f64) -> Particle {
		let mut p = Particle::at(Vec2::new(x, y), Profile::DotGrid);
		p.size = 1.0;
		p
	}

	const REPEL: Interaction = Interaction::Repulsion {
		radius: 250.0,
		strength: 90.0,
	};

	#[test]
	fn every_paint_starts_with_clear() {
		let mut surface = RecordingSurface::default();
		paint_field(&mut surface, &[], &FieldStyle::dot_grid(), REPEL, None);
		assert_eq!(surface.calls, vec![DrawCall::Clear]);
	}

	#[test]
	fn repulsion_mode_draws_only_near_pointer() {
		let particles = [dot(100.0, 100.0), dot(1000.0, 700.0), dot(300.0, 100.0)];
		let mut surface = RecordingSurface::default();
		paint_field(
			&mut surface,
			&particles,
			&FieldStyle::dot_grid(),
			REPEL,
			Some(Vec2::new(100.0, 100.0)),
		);

		let centers: Vec<Vec2> = surface
			.circles()
			.filter_map(|c| match c {
				DrawCall::Circle { center, .. } => Some(*center),
				_ => None,
			})
			.collect();
		// Glow ring plus core for the dot under the pointer, core only for the
		// one 200px away, nothing for the far dot.
		assert_eq!(
			centers,
			vec![
				Vec2::new(100.0, 100.0),
				Vec2::new(100.0, 100.0),
				Vec2::new(300.0, 100.0)
			]
		);
		match &surface.calls[2] {
			DrawCall::Circle { radius, alpha, .. } => {
				assert!((radius - 3.0).abs() < 1e-9);
				assert!((alpha - 1.0).abs() < 1e-9);
			}
			other => panic!("unexpected {other:?}"),
		}
	}

	#[test]
	fn repulsion_mode_without_pointer_draws_nothing() {
		let mut surface = RecordingSurface::default();
		paint_field(&mut surface, &[dot(1.0, 1.0)], &FieldStyle::dot_grid(), REPEL, None);
		assert_eq!(surface.circles().count(), 0);
	}

	#[test]
	fn compact_mode_draws_every_dot_at_resting_alpha() {
		let particles = [dot(1.0, 1.0), dot(50.0, 50.0)];
		let mut surface = RecordingSurface::default();
		paint_field(&mut surface, &particles, &FieldStyle::dot_grid(), Interaction::None, None);
		assert_eq!(surface.circles().count(), 2);
		assert!(surface.circles().all(|c| matches!(
			c,
			DrawCall::Circle { alpha, color, .. } if *alpha == 0.12 && *color == BRAND_GREEN
		)));
	}

	#[test]
	fn constellation_links_close_pairs_once() {
		let style = FieldStyle::constellation();
		let mut particles: Vec<Particle> = [(0.0, 0.0), (50.0, 0.0), (400.0, 400.0)]
			.into_iter()
			.map(|(x, y)| Particle::at(Vec2::new(x, y), Profile::Constellation))
			.collect();
		particles[0].opacity = 0.5;
		let mut surface = RecordingSurface::default();
		paint_field(&mut surface, &particles, &style, Interaction::None, None);

		assert_eq!(surface.circles().count(), 3);
		let lines: Vec<&DrawCall> = surface.lines().collect();
		assert_eq!(lines.len(), 1);
		match lines[0] {
			DrawCall::Line { alpha, width, .. } => {
				assert!((alpha - 0.075).abs() < 1e-9);
				assert_eq!(*width, 0.5);
			}
			_ => unreachable!(),
		}
	}

	fn frame(progress: PhaseProgress) -> TimelineFrame {
		TimelineFrame {
			elapsed: 6.0,
			phase: Phase::HoldFirst,
			progress,
		}
	}

	#[test]
	fn formed_text_gets_glow_and_halo() {
		let viewport = Viewport::new(1000.0, 600.0);
		let p = Particle::at(Vec2::new(10.0, 10.0), Profile::Formation);
		let mut surface = RecordingSurface::default();
		let formed = PhaseProgress {
			converge: 1.0,
			..PhaseProgress::default()
		};
		paint_formation(&mut surface, &[p], &frame(formed), &Palette::single(BRAND_GREEN), viewport);

		assert!(matches!(surface.calls[0], DrawCall::Clear));
		assert!(matches!(
			surface.calls[1],
			DrawCall::Glow { radius, .. } if (radius - 350.0).abs() < 1e-9
		));
		assert_eq!(surface.circles().count(), 2, "halo then core");
	}

	#[test]
	fn collapse_removes_halo_and_glow() {
		let viewport = Viewport::new(1000.0, 600.0);
		let p = Particle::at(Vec2::new(10.0, 10.0), Profile::Formation);
		let mut surface = RecordingSurface::default();
		let collapsed = PhaseProgress {
			converge: 1.0,
			morph: 1.0,
			collapse: 1.0,
			fade: 0.0,
		};
		paint_formation(&mut surface, &[p], &frame(collapsed), &Palette::single(BRAND_GREEN), viewport);

		assert!(!surface.calls.iter().any(|c| matches!(c, DrawCall::Glow { .. })));
		let alphas: Vec<f64> = surface
			.circles()
			.filter_map(|c| match c {
				DrawCall::Circle { alpha, .. } => Some(*alpha),
				_ => None,
			})
			.collect();
		assert_eq!(alphas, vec![0.0]);
	}
}
