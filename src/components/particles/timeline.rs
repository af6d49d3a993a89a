//! Loading-screen timeline.
//!
//! A fixed, non-looping sequence of phases driven only by elapsed time since
//! mount:
//!
//! | seconds     | phase                         |
//! |-------------|-------------------------------|
//! | 0 – 2       | float                         |
//! | 2 – 5       | converge into the first text  |
//! | 5 – 7.5     | hold                          |
//! | 7.5 – 10.5  | morph into the second text    |
//! | 10.5 – 12.5 | hold                          |
//! | 12.5 – 14   | collapse inward               |
//! | 14 – 15     | fade out                      |
//! | 15 –        | complete                      |

use serde::Deserialize;

/// Ordered loading phases. The derived ordering follows the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
	Float,
	Converge,
	HoldFirst,
	Morph,
	HoldSecond,
	Collapse,
	Fade,
	Complete,
}

/// Phase boundaries in seconds since mount. Each value is the end of the
/// phase it names.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
	pub float_end: f64,
	pub converge_end: f64,
	pub hold_first_end: f64,
	pub morph_end: f64,
	pub hold_second_end: f64,
	pub collapse_end: f64,
	pub fade_end: f64,
}

impl Default for TimelineConfig {
	fn default() -> Self {
		Self {
			float_end: 2.0,
			converge_end: 5.0,
			hold_first_end: 7.5,
			morph_end: 10.5,
			hold_second_end: 12.5,
			collapse_end: 14.0,
			fade_end: 15.0,
		}
	}
}

impl TimelineConfig {
	pub fn phase_at(&self, t: f64) -> Phase {
		match t {
			t if t < self.float_end => Phase::Float,
			t if t < self.converge_end => Phase::Converge,
			t if t < self.hold_first_end => Phase::HoldFirst,
			t if t < self.morph_end => Phase::Morph,
			t if t < self.hold_second_end => Phase::HoldSecond,
			t if t < self.collapse_end => Phase::Collapse,
			t if t < self.fade_end => Phase::Fade,
			_ => Phase::Complete,
		}
	}

	pub fn progress_at(&self, t: f64) -> PhaseProgress {
		PhaseProgress {
			converge: eased(t, self.float_end, self.converge_end),
			morph: eased(t, self.hold_first_end, self.morph_end),
			collapse: eased(t, self.hold_second_end, self.collapse_end),
			fade: eased(t, self.collapse_end, self.fade_end),
		}
	}
}

/// `easeInOutCubic` on [0, 1].
pub fn ease_in_out_cubic(t: f64) -> f64 {
	let t = t.clamp(0.0, 1.0);
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

fn eased(t: f64, start: f64, end: f64) -> f64 {
	if t < start {
		return 0.0;
	}
	let span = end - start;
	if span <= 0.0 {
		return 1.0;
	}
	ease_in_out_cubic((t - start) / span)
}

/// Eased progress through each animated phase, each in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhaseProgress {
	pub converge: f64,
	pub morph: f64,
	pub collapse: f64,
	pub fade: f64,
}

impl PhaseProgress {
	pub fn clamped(self) -> Self {
		Self {
			converge: self.converge.clamp(0.0, 1.0),
			morph: self.morph.clamp(0.0, 1.0),
			collapse: self.collapse.clamp(0.0, 1.0),
			fade: self.fade.clamp(0.0, 1.0),
		}
	}
}

/// One sampled point on the timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineFrame {
	/// Seconds since mount, never decreasing.
	pub elapsed: f64,
	pub phase: Phase,
	pub progress: PhaseProgress,
}

/// Tracks elapsed time and fires the completion callback once.
pub struct Timeline {
	config: TimelineConfig,
	elapsed: f64,
	on_complete: Option<Box<dyn FnOnce()>>,
}

impl Timeline {
	pub fn new(config: TimelineConfig) -> Self {
		Self {
			config,
			elapsed: 0.0,
			on_complete: None,
		}
	}

	/// Runs `callback` the first time the timeline reaches [`Phase::Complete`].
	pub fn with_completion(mut self, callback: impl FnOnce() + 'static) -> Self {
		self.on_complete = Some(Box::new(callback));
		self
	}

	pub fn config(&self) -> &TimelineConfig {
		&self.config
	}

	/// Samples the timeline. Samples earlier than one already seen are treated
	/// as the latest, so the phase never moves backward.
	pub fn sample(&mut self, elapsed: f64) -> TimelineFrame {
		if elapsed.is_finite() && elapsed > self.elapsed {
			self.elapsed = elapsed;
		}
		let phase = self.config.phase_at(self.elapsed);
		if phase == Phase::Complete {
			if let Some(callback) = self.on_complete.take() {
				log::info!("loading timeline complete after {:.2}s", self.elapsed);
				callback();
			}
		}
		TimelineFrame {
			elapsed: self.elapsed,
			phase,
			progress: self.config.progress_at(self.elapsed),
		}
	}

	pub fn is_complete(&self) -> bool {
		self.config.phase_at(self.elapsed) == Phase::Complete
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;
	use std::rc::Rc;

	use proptest::prelude::*;

	use super::*;

	#[test]
	fn phases_follow_the_schedule() {
		let config = TimelineConfig::default();
		let expected = [
			(0.0, Phase::Float),
			(1.99, Phase::Float),
			(2.0, Phase::Converge),
			(6.0, Phase::HoldFirst),
			(9.0, Phase::Morph),
			(11.0, Phase::HoldSecond),
			(13.0, Phase::Collapse),
			(14.5, Phase::Fade),
			(15.0, Phase::Complete),
			(99.0, Phase::Complete),
		];
		for (t, phase) in expected {
			assert_eq!(config.phase_at(t), phase, "at {t}s");
		}
	}

	#[test]
	fn easing_hits_endpoints_and_midpoint() {
		assert_eq!(ease_in_out_cubic(0.0), 0.0);
		assert_eq!(ease_in_out_cubic(1.0), 1.0);
		assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-12);
		assert_eq!(ease_in_out_cubic(-3.0), 0.0);
		assert_eq!(ease_in_out_cubic(7.0), 1.0);
	}

	#[test]
	fn progress_is_zero_before_and_one_after_each_phase() {
		let config = TimelineConfig::default();
		let early = config.progress_at(1.0);
		assert_eq!(early, PhaseProgress::default());

		let mid = config.progress_at(3.5);
		assert!((mid.converge - 0.5).abs() < 1e-12);
		assert_eq!(mid.morph, 0.0);

		let late = config.progress_at(20.0);
		assert_eq!(late.converge, 1.0);
		assert_eq!(late.morph, 1.0);
		assert_eq!(late.collapse, 1.0);
		assert_eq!(late.fade, 1.0);
	}

	#[test]
	fn completion_fires_exactly_once() {
		let fired = Rc::new(Cell::new(0));
		let counter = fired.clone();
		let mut timeline =
			Timeline::new(TimelineConfig::default()).with_completion(move || counter.set(counter.get() + 1));

		for ms in (0..20_000).step_by(4) {
			timeline.sample(ms as f64 / 1000.0);
		}
		// A burst of samples past the boundary.
		for _ in 0..50 {
			timeline.sample(15.0);
		}
		assert_eq!(fired.get(), 1);
		assert!(timeline.is_complete());
	}

	#[test]
	fn completion_does_not_fire_early() {
		let fired = Rc::new(Cell::new(false));
		let flag = fired.clone();
		let mut timeline = Timeline::new(TimelineConfig::default()).with_completion(move || flag.set(true));
		timeline.sample(14.99);
		assert!(!fired.get());
		timeline.sample(15.0);
		assert!(fired.get());
	}

	#[test]
	fn earlier_samples_do_not_rewind() {
		let mut timeline = Timeline::new(TimelineConfig::default());
		assert_eq!(timeline.sample(8.0).phase, Phase::Morph);
		let frame = timeline.sample(1.0);
		assert_eq!(frame.phase, Phase::Morph);
		assert_eq!(frame.elapsed, 8.0);
	}

	proptest! {
		#[test]
		fn phase_ordinal_never_decreases(mut samples in proptest::collection::vec(0.0f64..30.0, 1..64)) {
			samples.sort_by(|a, b| a.partial_cmp(b).unwrap());
			let mut timeline = Timeline::new(TimelineConfig::default());
			let mut last = Phase::Float;
			for t in samples {
				let phase = timeline.sample(t).phase;
				prop_assert!(phase >= last);
				last = phase;
			}
		}

		#[test]
		fn progress_is_monotonic(a in 0.0f64..20.0, b in 0.0f64..20.0) {
			let config = TimelineConfig::default();
			let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
			let (p, q) = (config.progress_at(lo), config.progress_at(hi));
			prop_assert!(p.converge <= q.converge);
			prop_assert!(p.morph <= q.morph);
			prop_assert!(p.collapse <= q.collapse);
			prop_assert!(p.fade <= q.fade);
		}
	}
}
