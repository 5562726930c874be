//! Frame-clock timers for automatic fit-to-view.
//!
//! Two independent triggers: a fixed delay after mount, and a short debounce
//! after the simulation settles. Either may fire first; fitting twice is
//! harmless because a second fit targets the same framing.

use super::config::TimingConfig;

#[derive(Clone, Debug)]
pub struct FitSchedule {
	now_ms: f64,
	deadlines: Vec<f64>,
	settle_delay_ms: f64,
}

impl FitSchedule {
	/// Arms the initial fit.
	pub fn new(timing: &TimingConfig) -> Self {
		Self {
			now_ms: 0.0,
			deadlines: vec![timing.initial_fit_delay_ms],
			settle_delay_ms: timing.settle_fit_delay_ms,
		}
	}

	pub fn now_ms(&self) -> f64 {
		self.now_ms
	}

	pub fn pending(&self) -> usize {
		self.deadlines.len()
	}

	/// Arm the post-settle fit.
	pub fn on_settled(&mut self) {
		self.deadlines.push(self.now_ms + self.settle_delay_ms);
	}

	/// Advance the clock; returns how many fits came due.
	pub fn advance(&mut self, dt_ms: f64) -> usize {
		self.now_ms += dt_ms.max(0.0);
		let now = self.now_ms;
		let before = self.deadlines.len();
		self.deadlines.retain(|&deadline| deadline > now);
		before - self.deadlines.len()
	}
}
