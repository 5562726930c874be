//! Tunables for the layout, viewport, auto-fit timers and colors.
//!
//! Every section deserializes with defaults, so a host only has to name the
//! values it wants to change:
//!
//! ```ignore
//! let config = GraphConfig::from_json(r#"{ "layout": { "charge_strength": -900 } }"#)?;
//! ```

use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphConfig {
	pub layout: LayoutConfig,
	pub viewport: ViewportConfig,
	pub timing: TimingConfig,
	pub style: StyleConfig,
}

impl GraphConfig {
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}

/// Force parameters. Strengths are per-tick multipliers scaled by alpha.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
	pub link_strength: f64,
	pub charge_strength: f64,
	/// Pairs closer than this are treated as this far apart by the charge force.
	pub charge_distance_min: f64,
	/// Pull toward the viewport centre, applied to each axis separately.
	pub position_strength: f64,
	/// Added to `r_i + r_j` to get the minimum centre distance.
	pub collision_padding: f64,
	pub collision_iterations: usize,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	pub velocity_decay: f64,
	/// Radius assumed for nodes whose payload omits `r`.
	pub default_radius: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		let alpha_min = 0.001_f64;
		Self {
			link_strength: 0.12,
			charge_strength: -1600.0,
			charge_distance_min: 1.0,
			position_strength: 0.03,
			collision_padding: 4.0,
			collision_iterations: 2,
			alpha_min,
			// 300 ticks from alpha 1 down to alpha_min
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			default_radius: 14.0,
		}
	}
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
	pub min_scale: f64,
	pub max_scale: f64,
	pub fit_padding: f64,
	/// Fraction of the viewport the fitted box may occupy.
	pub fit_margin: f64,
	pub fit_duration_ms: f64,
	pub reset_duration_ms: f64,
	pub dblclick_duration_ms: f64,
}

impl Default for ViewportConfig {
	fn default() -> Self {
		Self {
			min_scale: 0.2,
			max_scale: 4.0,
			fit_padding: 60.0,
			fit_margin: 0.9,
			fit_duration_ms: 700.0,
			reset_duration_ms: 600.0,
			dblclick_duration_ms: 250.0,
		}
	}
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
	pub initial_fit_delay_ms: f64,
	pub settle_fit_delay_ms: f64,
	/// Longest frame delta fed to transitions and timers (tab switches).
	pub max_frame_ms: f64,
}

impl Default for TimingConfig {
	fn default() -> Self {
		Self {
			initial_fit_delay_ms: 1200.0,
			settle_fit_delay_ms: 100.0,
			max_frame_ms: 100.0,
		}
	}
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct StyleConfig {
	pub background: String,
	pub link_stroke: String,
	pub link_opacity: f64,
	pub link_width: f64,
	pub node_stroke: String,
	pub node_stroke_width: f64,
	pub default_fill: String,
	pub label_fill: String,
	pub hover_ring: String,
	pub tooltip_offset: (f64, f64),
}

impl Default for StyleConfig {
	fn default() -> Self {
		Self {
			background: "#0f111a".into(),
			link_stroke: "#2b3147".into(),
			link_opacity: 0.5,
			link_width: 1.0,
			node_stroke: "#0f111a".into(),
			node_stroke_width: 1.2,
			default_fill: "#90a4ae".into(),
			label_fill: "#c7d0e0".into(),
			hover_ring: "rgba(255, 255, 255, 0.7)".into(),
			tooltip_offset: (12.0, 12.0),
		}
	}
}
