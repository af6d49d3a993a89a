//! Ambient particle fields (hero dot grid, constellation) and the loading
//! scene. Each owns its particle store exclusively.

use rand::rngs::SmallRng;

use super::builder::build;
use super::glyphs::{FormationLayout, FormationTargets};
use super::physics::{FormationInput, FrameContext, Motion, advance};
use super::render::{paint_field, paint_formation};
use super::surface::Surface;
use super::theme::{FieldStyle, LoadingStyle, Palette};
use super::timeline::{Timeline, TimelineFrame};
use super::types::{Interaction, Particle, Profile, Vec2, Viewport};

/// A pointer-reactive ambient field.
pub struct ParticleSystem {
	pub particles: Vec<Particle>,
	style: FieldStyle,
	viewport: Viewport,
	interaction: Interaction,
	rng: SmallRng,
	elapsed: f64,
	/// Checked at the top of every update.
	pub paused: bool,
}

impl ParticleSystem {
	pub fn new(style: FieldStyle, viewport: Viewport, rng: SmallRng) -> Self {
		let mut system = Self {
			particles: Vec::new(),
			interaction: style.interaction_for(viewport),
			style,
			viewport,
			rng,
			elapsed: 0.0,
			paused: false,
		};
		system.rebuild(viewport);
		system
	}

	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	pub fn interaction(&self) -> Interaction {
		self.interaction
	}

	pub fn style(&self) -> &FieldStyle {
		&self.style
	}

	/// Discards every particle and builds a new set for `viewport`.
	pub fn rebuild(&mut self, viewport: Viewport) {
		self.viewport = viewport;
		self.interaction = self.style.interaction_for(viewport);
		let count = self.style.density.count(viewport);
		self.particles = build(viewport, count, self.style.profile, &mut self.rng);
		log::debug!(
			"rebuilt {:?} field: {} particles for {}x{}",
			self.style.profile,
			self.particles.len(),
			viewport.width,
			viewport.height
		);
	}

	/// Advances the field by `dt` seconds.
	pub fn update(&mut self, dt: f64, pointer: Option<Vec2>) {
		if self.paused {
			return;
		}
		self.elapsed += dt;
		let frame = FrameContext {
			elapsed: self.elapsed,
			dt,
			pointer: self.effective_pointer(pointer),
			viewport: self.viewport,
		};
		advance(
			&mut self.particles,
			&frame,
			&Motion::ambient(self.interaction, self.style.smoothing),
		);
	}

	pub fn paint(&self, surface: &mut impl Surface, pointer: Option<Vec2>) {
		paint_field(
			surface,
			&self.particles,
			&self.style,
			self.interaction,
			self.effective_pointer(pointer),
		);
	}

	fn effective_pointer(&self, pointer: Option<Vec2>) -> Option<Vec2> {
		match self.interaction {
			Interaction::None => None,
			Interaction::Repulsion { .. } => pointer,
		}
	}
}

/// Backdrop dust plus text-forming particles, driven by the timeline.
pub struct LoadingScene {
	/// Backdrop particles first, then formation particles.
	pub particles: Vec<Particle>,
	targets: FormationTargets,
	timeline: Timeline,
	style: LoadingStyle,
	palette: Palette,
	viewport: Viewport,
	last_elapsed: f64,
}

impl LoadingScene {
	pub fn new(
		style: LoadingStyle,
		viewport: Viewport,
		targets: FormationTargets,
		timeline: Timeline,
		rng: &mut SmallRng,
	) -> Self {
		let layout = FormationLayout::for_viewport(viewport);
		let mut particles = build(viewport, layout.backdrop_count, Profile::Backdrop, rng);
		particles.extend(build(viewport, targets.particle_count(), Profile::Formation, rng));
		log::debug!(
			"loading scene: {} formation, {} backdrop particles",
			targets.particle_count(),
			layout.backdrop_count
		);
		Self {
			particles,
			targets,
			timeline,
			palette: Palette::single(style.color),
			style,
			viewport,
			last_elapsed: 0.0,
		}
	}

	pub fn targets(&self) -> &FormationTargets {
		&self.targets
	}

	/// Samples the timeline at `elapsed` seconds since mount and advances the
	/// particles. The timeline runs whether or not anything is painted.
	pub fn step(&mut self, elapsed: f64) -> TimelineFrame {
		let frame = self.timeline.sample(elapsed);
		let dt = (frame.elapsed - self.last_elapsed).clamp(0.0, 0.1);
		self.last_elapsed = frame.elapsed;

		let ctx = FrameContext {
			elapsed: frame.elapsed,
			dt,
			pointer: None,
			viewport: self.viewport,
		};
		let split = self
			.particles
			.iter()
			.position(|p| p.profile == Profile::Formation)
			.unwrap_or(self.particles.len());
		let (backdrop, formation) = self.particles.split_at_mut(split);

		advance(
			backdrop,
			&ctx,
			&Motion::ambient(Interaction::None, self.style.backdrop_smoothing),
		);
		advance(
			formation,
			&ctx,
			&Motion {
				interaction: Interaction::None,
				smoothing: self.style.formation_smoothing,
				formation: Some(FormationInput {
					targets: &self.targets,
					progress: frame.progress,
				}),
			},
		);
		frame
	}

	pub fn paint(&self, surface: &mut impl Surface, frame: &TimelineFrame) {
		paint_formation(surface, &self.particles, frame, &self.palette, self.viewport);
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;
	use std::rc::Rc;

	use rand::SeedableRng;

	use super::super::glyphs::GlyphTargets;
	use super::super::surface::RecordingSurface;
	use super::super::theme::Density;
	use super::super::timeline::{Phase, TimelineConfig};
	use super::*;

	fn rng() -> SmallRng {
		SmallRng::seed_from_u64(42)
	}

	#[test]
	fn desktop_field_count_follows_area_formula() {
		let style = FieldStyle {
			density: Density::Area {
				divisor: 1500.0,
				max: 700,
			},
			..FieldStyle::dot_grid()
		};
		let system = ParticleSystem::new(style, Viewport::new(1280.0, 800.0), rng());
		assert_eq!(system.particles.len(), (1280.0 * 800.0 / 1500.0_f64).floor() as usize);
		assert!(matches!(system.interaction(), Interaction::Repulsion { .. }));
	}

	#[test]
	fn resize_rebuilds_within_new_bounds() {
		let mut system = ParticleSystem::new(FieldStyle::dot_grid(), Viewport::new(1920.0, 1080.0), rng());
		assert_eq!(system.particles.len(), 300);

		let phone = Viewport::new(390.0, 844.0);
		system.rebuild(phone);
		assert_eq!(system.particles.len(), 80);
		assert_eq!(system.interaction(), Interaction::None);
		assert!(system.particles.iter().all(|p| phone.contains(p.position)));
	}

	#[test]
	fn paused_field_does_not_move() {
		let mut system = ParticleSystem::new(FieldStyle::dot_grid(), Viewport::new(800.0, 600.0), rng());
		let before: Vec<Vec2> = system.particles.iter().map(|p| p.position).collect();
		system.paused = true;
		system.update(1.0 / 30.0, None);
		let after: Vec<Vec2> = system.particles.iter().map(|p| p.position).collect();
		assert_eq!(before, after);
	}

	#[test]
	fn compact_field_ignores_pointer() {
		let system = ParticleSystem::new(FieldStyle::dot_grid(), Viewport::new(390.0, 844.0), rng());
		let mut surface = RecordingSurface::default();
		system.paint(&mut surface, Some(Vec2::new(10.0, 10.0)));
		assert_eq!(surface.circles().count(), system.particles.len());
	}

	fn scene(fired: Rc<Cell<u32>>) -> LoadingScene {
		let targets = FormationTargets::new(
			GlyphTargets::new(vec![Vec2::new(300.0, 300.0), Vec2::new(320.0, 300.0)]),
			GlyphTargets::new(vec![Vec2::new(600.0, 300.0)]),
		);
		let timeline = Timeline::new(TimelineConfig::default())
			.with_completion(move || fired.set(fired.get() + 1));
		LoadingScene::new(
			LoadingStyle::default(),
			Viewport::new(1280.0, 800.0),
			targets,
			timeline,
			&mut rng(),
		)
	}

	#[test]
	fn scene_holds_backdrop_then_formation() {
		let scene = scene(Rc::new(Cell::new(0)));
		assert_eq!(scene.particles.len(), 80 + 2);
		assert!(scene.particles[..80].iter().all(|p| p.profile == Profile::Backdrop));
		assert!(scene.particles[80..].iter().all(|p| p.profile == Profile::Formation));
	}

	#[test]
	fn text_forms_then_collapses_and_completes_once() {
		let fired = Rc::new(Cell::new(0));
		let mut scene = scene(fired.clone());

		let mut t = 0.0;
		while t < 7.0 {
			scene.step(t);
			t += 1.0 / 60.0;
		}
		let formation = &scene.particles[80..];
		assert!(formation[0].position.distance(Vec2::new(300.0, 300.0)) < 2.0);
		assert!(formation[1].position.distance(Vec2::new(320.0, 300.0)) < 2.0);

		// Smoothing trails the eased collapse, so sample half a second into the fade.
		while t < 14.5 {
			scene.step(t);
			t += 1.0 / 60.0;
		}
		let center = Vec2::new(640.0, 400.0);
		assert!(scene.particles[80..].iter().all(|p| p.position.distance(center) < 1.0));
		assert_eq!(fired.get(), 0);

		let mut last = Phase::Float;
		while t < 16.0 {
			let frame = scene.step(t);
			assert!(frame.phase >= last);
			last = frame.phase;
			t += 1.0 / 60.0;
		}
		assert_eq!(last, Phase::Complete);
		assert_eq!(fired.get(), 1);
	}

	#[test]
	fn timeline_completes_even_with_no_glyphs() {
		let fired = Rc::new(Cell::new(0));
		let counter = fired.clone();
		let timeline = Timeline::new(TimelineConfig::default())
			.with_completion(move || counter.set(counter.get() + 1));
		let mut scene = LoadingScene::new(
			LoadingStyle::default(),
			Viewport::new(1280.0, 800.0),
			FormationTargets::default(),
			timeline,
			&mut rng(),
		);
		scene.step(20.0);
		scene.step(21.0);
		assert_eq!(fired.get(), 1);
	}
}
