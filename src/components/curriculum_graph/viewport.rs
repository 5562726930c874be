//! Pan/zoom transform for the whole scene.
//!
//! Screen = world * k + (x, y). Programmatic moves (fit, reset, double-click
//! zoom) animate toward a target over a fixed duration; a new request always
//! replaces the one in flight, starting from wherever the view currently is.
//! Pointer gestures apply immediately and interrupt any animation.

use log::debug;

use super::config::ViewportConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for Transform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl Transform {
	pub const IDENTITY: Transform = Transform {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	/// World to screen.
	pub fn apply(&self, (wx, wy): (f64, f64)) -> (f64, f64) {
		(wx * self.k + self.x, wy * self.k + self.y)
	}

	/// Screen to world.
	pub fn invert(&self, (sx, sy): (f64, f64)) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Scale to `k` keeping the world point under `anchor` (screen) fixed.
	pub fn scale_to(&self, k: f64, anchor: (f64, f64)) -> Transform {
		let (wx, wy) = self.invert(anchor);
		Transform {
			x: anchor.0 - wx * k,
			y: anchor.1 - wy * k,
			k,
		}
	}

	fn lerp(&self, to: &Transform, t: f64) -> Transform {
		Transform {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}
}

fn ease_in_out_cubic(t: f64) -> f64 {
	let t = t * 2.0;
	if t <= 1.0 {
		t * t * t / 2.0
	} else {
		let t = t - 2.0;
		(t * t * t + 2.0) / 2.0
	}
}

#[derive(Clone, Copy, Debug)]
struct Transition {
	from: Transform,
	to: Transform,
	elapsed_ms: f64,
	duration_ms: f64,
}

/// Axis-aligned bounds of a point set, or `None` for an empty set.
/// A NaN coordinate makes the whole box NaN.
pub fn bounds(points: impl IntoIterator<Item = (f64, f64)>) -> Option<(f64, f64, f64, f64)> {
	let min = |a: f64, b: f64| if a.is_nan() || b.is_nan() { f64::NAN } else { a.min(b) };
	let max = |a: f64, b: f64| if a.is_nan() || b.is_nan() { f64::NAN } else { a.max(b) };
	points.into_iter().fold(None, |acc, (x, y)| {
		Some(match acc {
			None => (x, y, x, y),
			Some((x0, y0, x1, y1)) => (min(x0, x), min(y0, y), max(x1, x), max(y1, y)),
		})
	})
}

#[derive(Clone, Debug)]
pub struct Viewport {
	transform: Transform,
	width: f64,
	height: f64,
	config: ViewportConfig,
	transition: Option<Transition>,
}

impl Viewport {
	pub fn new(width: f64, height: f64, config: ViewportConfig) -> Self {
		Self {
			transform: Transform::IDENTITY,
			width,
			height,
			config,
			transition: None,
		}
	}

	pub fn transform(&self) -> Transform {
		self.transform
	}

	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn is_animating(&self) -> bool {
		self.transition.is_some()
	}

	/// Where the current transition ends, if one is running.
	pub fn target(&self) -> Option<Transform> {
		self.transition.map(|t| t.to)
	}

	/// Set the transform immediately, dropping any transition in flight.
	pub fn apply_transform(&mut self, transform: Transform) {
		self.transition = None;
		self.transform = transform;
	}

	/// Animate from the current transform to `to`.
	pub fn transition_to(&mut self, to: Transform, duration_ms: f64) {
		if duration_ms <= 0.0 {
			self.apply_transform(to);
			return;
		}
		self.transition = Some(Transition {
			from: self.transform,
			to,
			elapsed_ms: 0.0,
			duration_ms,
		});
	}

	/// Transform that frames `points` (grown by `padding`) in the viewport.
	///
	/// Never zooms in past 1 and leaves a margin. Returns `None` when the
	/// padded box is empty, non-finite, or has no area.
	pub fn fit_target(
		&self,
		points: impl IntoIterator<Item = (f64, f64)>,
		padding: f64,
	) -> Option<Transform> {
		let (x0, y0, x1, y1) = bounds(points)?;
		let (min_x, min_y) = (x0 - padding, y0 - padding);
		let (w, h) = (x1 + padding - min_x, y1 + padding - min_y);
		if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
			return None;
		}
		let k = (self.width / w).min(self.height / h).min(1.0) * self.config.fit_margin;
		if !(k.is_finite() && k > 0.0) {
			return None;
		}
		Some(Transform {
			x: (self.width - w * k) / 2.0 - min_x * k,
			y: (self.height - h * k) / 2.0 - min_y * k,
			k,
		})
	}

	/// Animate to frame `points`. Returns `false` (and leaves the view alone)
	/// when the bounding box is degenerate.
	pub fn fit_to_view(
		&mut self,
		points: impl IntoIterator<Item = (f64, f64)>,
		padding: Option<f64>,
	) -> bool {
		let padding = padding.unwrap_or(self.config.fit_padding);
		match self.fit_target(points, padding) {
			Some(target) => {
				debug!("Fit to view: k={:.3} x={:.1} y={:.1}", target.k, target.x, target.y);
				self.transition_to(target, self.config.fit_duration_ms);
				true
			}
			None => {
				debug!("Fit to view skipped: degenerate bounds");
				false
			}
		}
	}

	/// Animate back to the identity transform.
	pub fn reset(&mut self) {
		self.transition_to(Transform::IDENTITY, self.config.reset_duration_ms);
	}

	fn clamp_scale(&self, k: f64) -> f64 {
		k.clamp(self.config.min_scale, self.config.max_scale)
	}

	/// Multiply the scale by `factor` around a screen point, within the scale extent.
	pub fn zoom_at(&mut self, factor: f64, anchor: (f64, f64)) {
		if !(factor.is_finite() && factor > 0.0) {
			return;
		}
		let k = self.clamp_scale(self.transform.k * factor);
		let next = self.transform.scale_to(k, anchor);
		self.apply_transform(next);
	}

	/// Animated version of [`Viewport::zoom_at`], used for double-click.
	pub fn zoom_at_animated(&mut self, factor: f64, anchor: (f64, f64)) {
		let k = self.clamp_scale(self.transform.k * factor);
		let target = self.transform.scale_to(k, anchor);
		self.transition_to(target, self.config.dblclick_duration_ms);
	}

	/// Shift the view by a screen-space delta.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		let t = self.transform;
		self.apply_transform(Transform {
			x: t.x + dx,
			y: t.y + dy,
			k: t.k,
		});
	}

	/// Advance the running transition; returns `true` while still animating.
	pub fn advance(&mut self, dt_ms: f64) -> bool {
		let Some(mut transition) = self.transition else {
			return false;
		};
		transition.elapsed_ms += dt_ms.max(0.0);
		let t = (transition.elapsed_ms / transition.duration_ms).min(1.0);
		self.transform = transition.from.lerp(&transition.to, ease_in_out_cubic(t));
		if t >= 1.0 {
			self.transform = transition.to;
			self.transition = None;
			false
		} else {
			self.transition = Some(transition);
			true
		}
	}
}
