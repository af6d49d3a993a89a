//! Frame pacing and resize coalescing, independent of the browser.
//!
//! Both types take timestamps in milliseconds from the same clock the frame
//! callback receives (`performance.now()`), so they can be polled from inside
//! the animation loop without extra timers.

/// Longest frame delta ever reported, in milliseconds. Protects the update
/// step from the jump after a background tab becomes visible again.
pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

/// Refresh timestamps may land just short of the interval; frames within
/// this margin still run.
const FRAME_SLACK_MS: f64 = 1.0;

/// Caps how often update and render run.
#[derive(Clone, Debug)]
pub struct FrameThrottle {
	interval_ms: f64,
	last_ms: Option<f64>,
}

impl FrameThrottle {
	/// `max_fps = None` lets every display refresh through.
	pub fn new(max_fps: Option<f64>) -> Self {
		let interval_ms = match max_fps {
			Some(fps) if fps > 0.0 => 1000.0 / fps,
			_ => 0.0,
		};
		Self {
			interval_ms,
			last_ms: None,
		}
	}

	pub fn interval_ms(&self) -> f64 {
		self.interval_ms
	}

	/// Returns the delta in seconds when work should run at `now_ms`, or `None`
	/// when the interval has not elapsed yet.
	pub fn poll(&mut self, now_ms: f64) -> Option<f64> {
		let delta_ms = match self.last_ms {
			None => self.interval_ms.max(1000.0 / 60.0),
			Some(last) => {
				let delta = now_ms - last;
				if delta < self.interval_ms - FRAME_SLACK_MS {
					return None;
				}
				delta
			}
		};
		self.last_ms = Some(now_ms);
		Some(delta_ms.clamp(0.0, MAX_FRAME_DELTA_MS) / 1000.0)
	}

	/// Forgets the last timestamp, e.g. after the page was hidden.
	pub fn reset(&mut self) {
		self.last_ms = None;
	}
}

/// Coalesces bursts of resize notifications into one rebuild.
#[derive(Clone, Debug)]
pub struct ResizeDebounce<T> {
	quiet_ms: f64,
	pending: Option<(f64, T)>,
}

impl<T> ResizeDebounce<T> {
	pub fn new(quiet_ms: f64) -> Self {
		Self {
			quiet_ms,
			pending: None,
		}
	}

	/// Records a resize; restarts the quiet period.
	pub fn notify(&mut self, now_ms: f64, value: T) {
		self.pending = Some((now_ms, value));
	}

	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	/// Yields the latest value once no resize arrived for the quiet period.
	pub fn poll(&mut self, now_ms: f64) -> Option<T> {
		match self.pending {
			Some((at, _)) if now_ms - at >= self.quiet_ms => self.pending.take().map(|(_, v)| v),
			_ => None,
		}
	}
}
