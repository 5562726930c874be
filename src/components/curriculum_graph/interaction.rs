use super::model::Node;

/// Global keyboard shortcuts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
	Reset,
	Fit,
}

impl KeyCommand {
	pub fn from_key(key: &str) -> Option<Self> {
		match key.to_lowercase().as_str() {
			"r" => Some(KeyCommand::Reset),
			"f" => Some(KeyCommand::Fit),
			_ => None,
		}
	}
}

/// Zoom multiplier for one wheel event. `delta_mode` is the DOM
/// `WheelEvent.deltaMode` (0 pixels, 1 lines, 2 pages).
pub fn wheel_factor(delta_y: f64, delta_mode: u32) -> f64 {
	let unit = match delta_mode {
		0 => 0.002,
		1 => 0.05,
		_ => 1.0,
	};
	2f64.powf(-delta_y * unit)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tooltip {
	pub visible: bool,
	pub html: String,
	pub left: f64,
	pub top: f64,
}

#[derive(Clone, Debug, Default)]
struct PanGesture {
	active: bool,
	last: (f64, f64),
}

/// Hover target, tooltip and background drag.
#[derive(Clone, Debug, Default)]
pub struct Interaction {
	hovered: Option<usize>,
	tooltip: Tooltip,
	pan: PanGesture,
	offset: (f64, f64),
}

impl Interaction {
	pub fn new(tooltip_offset: (f64, f64)) -> Self {
		Self {
			offset: tooltip_offset,
			..Default::default()
		}
	}

	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	pub fn tooltip(&self) -> &Tooltip {
		&self.tooltip
	}

	pub fn is_panning(&self) -> bool {
		self.pan.active
	}

	/// Pointer moved to `client` over `target`. Returns `true` if the tooltip changed.
	pub fn hover(&mut self, target: Option<(usize, &Node)>, client: (f64, f64)) -> bool {
		let before = self.tooltip.clone();
		match target {
			Some((idx, node)) => {
				self.hovered = Some(idx);
				self.tooltip = Tooltip {
					visible: true,
					html: node.title.clone().unwrap_or_default(),
					left: client.0 + self.offset.0,
					top: client.1 + self.offset.1,
				};
			}
			None => {
				self.hovered = None;
				self.tooltip.visible = false;
			}
		}
		self.tooltip != before
	}

	/// Pointer left the surface.
	pub fn pointer_out(&mut self) -> bool {
		self.pan.active = false;
		self.hover(None, (0.0, 0.0))
	}

	pub fn begin_pan(&mut self, screen: (f64, f64)) {
		self.pan = PanGesture {
			active: true,
			last: screen,
		};
	}

	/// Screen delta since the last drag position, while panning.
	pub fn drag_to(&mut self, screen: (f64, f64)) -> Option<(f64, f64)> {
		if !self.pan.active {
			return None;
		}
		let delta = (screen.0 - self.pan.last.0, screen.1 - self.pan.last.1);
		self.pan.last = screen;
		Some(delta)
	}

	pub fn end_pan(&mut self) {
		self.pan.active = false;
	}
}
