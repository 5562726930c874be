use log::debug;

use super::config::GraphConfig;
use super::interaction::{Interaction, KeyCommand, wheel_factor};
use super::layout::{Simulation, SimulationState, Tick};
use super::model::{GraphModel, Node};
use super::scene::Scene;
use super::schedule::FitSchedule;
use super::viewport::Viewport;

/// What a frame did, for the host loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
	pub ticked: bool,
	pub settled: bool,
	pub fits: usize,
}

/// Everything one mounted graph owns. Dropped on unmount.
pub struct CurriculumGraphState {
	pub model: GraphModel,
	pub simulation: Simulation,
	pub scene: Scene,
	pub viewport: Viewport,
	pub interaction: Interaction,
	pub config: GraphConfig,
	schedule: FitSchedule,
}

impl CurriculumGraphState {
	pub fn new(mut model: GraphModel, width: f64, height: f64, config: GraphConfig) -> Self {
		let center = (width / 2.0, height / 2.0);
		let simulation = Simulation::new(&mut model, config.layout.clone(), center);
		let scene = Scene::bind(&model, &config.style);
		Self {
			simulation,
			scene,
			viewport: Viewport::new(width, height, config.viewport.clone()),
			interaction: Interaction::new(config.style.tooltip_offset),
			schedule: FitSchedule::new(&config.timing),
			model,
			config,
		}
	}

	pub fn is_running(&self) -> bool {
		self.simulation.state() == SimulationState::Running
	}

	/// One animation frame: simulation tick, repaint data, timers, transition.
	pub fn frame(&mut self, dt_ms: f64) -> FrameReport {
		let dt_ms = dt_ms.clamp(0.0, self.config.timing.max_frame_ms);
		let mut report = FrameReport::default();

		match self.simulation.step(&mut self.model) {
			Tick::Idle => {}
			tick => {
				self.scene.on_tick(&self.model);
				report.ticked = true;
				if tick == Tick::Settled {
					report.settled = true;
					self.schedule.on_settled();
				}
			}
		}

		report.fits = self.schedule.advance(dt_ms);
		for _ in 0..report.fits {
			self.fit_to_view(None);
		}
		self.viewport.advance(dt_ms);
		report
	}

	pub fn fit_to_view(&mut self, padding: Option<f64>) -> bool {
		self.viewport
			.fit_to_view(self.model.nodes().iter().map(Node::position), padding)
	}

	pub fn reset_view(&mut self) {
		self.viewport.reset();
	}

	pub fn handle_key(&mut self, key: &str) -> Option<KeyCommand> {
		let command = KeyCommand::from_key(key)?;
		debug!("Key command {:?}", command);
		match command {
			KeyCommand::Reset => self.reset_view(),
			KeyCommand::Fit => {
				self.fit_to_view(None);
			}
		}
		Some(command)
	}

	/// Node under a screen point.
	pub fn node_at(&self, screen: (f64, f64)) -> Option<usize> {
		self.scene
			.node_at(self.viewport.transform().invert(screen))
	}

	pub fn pointer_down(&mut self, screen: (f64, f64)) {
		self.interaction.begin_pan(screen);
	}

	/// `screen` is relative to the canvas, `client` to the window (tooltip).
	/// Returns `true` when the tooltip needs repainting.
	pub fn pointer_move(&mut self, screen: (f64, f64), client: (f64, f64)) -> bool {
		if let Some((dx, dy)) = self.interaction.drag_to(screen) {
			self.viewport.pan_by(dx, dy);
			return false;
		}
		let target = self
			.node_at(screen)
			.and_then(|idx| self.model.node(idx).map(|node| (idx, node)));
		self.interaction.hover(target, client)
	}

	pub fn pointer_up(&mut self) {
		self.interaction.end_pan();
	}

	pub fn pointer_leave(&mut self) -> bool {
		self.interaction.pointer_out()
	}

	pub fn wheel(&mut self, delta_y: f64, delta_mode: u32, screen: (f64, f64)) {
		self.viewport
			.zoom_at(wheel_factor(delta_y, delta_mode), screen);
	}

	pub fn double_click(&mut self, screen: (f64, f64), shift: bool) {
		let factor = if shift { 0.5 } else { 2.0 };
		self.viewport.zoom_at_animated(factor, screen);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport.resize(width, height);
		self.simulation.set_center((width / 2.0, height / 2.0));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::curriculum_graph::types::{RawLink, RawNode};
	use crate::components::curriculum_graph::viewport::Transform;

	fn state() -> CurriculumGraphState {
		let nodes = ["t", "g", "o1", "o2"]
			.iter()
			.zip(["konu", "grup", "kazanım", "kazanım"])
			.map(|(id, kind)| RawNode {
				id: (*id).into(),
				kind: kind.into(),
				r: Some(12.0),
				color: None,
				label: Some(id.to_uppercase()),
				title: Some(format!("title {id}")),
			})
			.collect();
		let links = [("t", "g"), ("g", "o1"), ("g", "o2")]
			.iter()
			.map(|(s, t)| RawLink {
				source: (*s).into(),
				target: (*t).into(),
			})
			.collect();
		let model = GraphModel::build(nodes, links, 14.0).unwrap();
		CurriculumGraphState::new(model, 800.0, 600.0, GraphConfig::default())
	}

	#[test]
	fn frames_run_until_settled_then_auto_fit() {
		let mut s = state();
		let mut settled_at = None;
		let mut fits = 0;
		for frame in 0..400 {
			let report = s.frame(16.0);
			fits += report.fits;
			if report.settled {
				settled_at = Some(frame);
			}
		}
		assert!(settled_at.is_some());
		assert!(!s.is_running());
		// initial fit + settle fit
		assert_eq!(fits, 2);
		assert!(!s.viewport.is_animating());
		assert!(s.viewport.transform().k <= 0.9);

		assert!(!s.frame(16.0).ticked);
	}

	#[test]
	fn keyboard_fit_and_reset() {
		let mut s = state();
		for _ in 0..50 {
			s.frame(16.0);
		}
		assert_eq!(s.handle_key("F"), Some(KeyCommand::Fit));
		assert!(s.viewport.is_animating());
		assert_eq!(s.handle_key("r"), Some(KeyCommand::Reset));
		assert_eq!(s.viewport.target(), Some(Transform::IDENTITY));
		assert_eq!(s.handle_key("q"), None);
	}

	#[test]
	fn drag_pans_and_hover_shows_title() {
		let mut s = state();
		while s.is_running() || s.viewport.is_animating() {
			s.frame(16.0);
		}
		let before = s.viewport.transform();
		s.pointer_down((10.0, 10.0));
		assert!(!s.pointer_move((30.0, 25.0), (30.0, 25.0)));
		let after = s.viewport.transform();
		assert!((after.x - before.x - 20.0).abs() < 1e-9);
		assert!((after.y - before.y - 15.0).abs() < 1e-9);
		assert_eq!(after.k, before.k);
		s.pointer_up();

		let world = s.model.nodes()[0].position();
		let screen = s.viewport.transform().apply(world);
		assert!(s.pointer_move(screen, (50.0, 60.0)));
		assert_eq!(s.interaction.hovered(), Some(0));
		assert_eq!(s.interaction.tooltip().html, "title t");
		assert!(s.pointer_leave());
		assert!(!s.interaction.tooltip().visible);
	}

	#[test]
	fn wheel_zoom_respects_scale_extent() {
		let mut s = state();
		for _ in 0..20 {
			s.wheel(-500.0, 0, (400.0, 300.0));
		}
		assert_eq!(s.viewport.transform().k, 4.0);
		s.double_click((400.0, 300.0), true);
		assert_eq!(s.viewport.target().map(|t| t.k), Some(2.0));
	}
}
