//! Force-directed layout.
//!
//! Explicit integrator with velocity decay over five forces, evaluated in
//! order each tick and summed into node velocities:
//!
//! - **link**: soft spring toward [`link_distance`], split between endpoints by degree
//! - **charge**: all-pairs repulsion
//! - **center**: translates the layout so its centroid sits on the centre point
//! - **position**: weak pull of every node toward the centre point, per axis
//! - **collide**: iterative separation to `r_i + r_j + padding`
//!
//! The simulation "temperature" `alpha` decays geometrically each tick; once
//! it falls below `alpha_min` the simulation is settled and stops moving nodes
//! until [`Simulation::reheat`] is called.

use std::f64::consts::PI;

use log::{debug, info};

use super::config::LayoutConfig;
use super::model::{GraphModel, Link, Node};
use super::types::NodeKind;

/// Target centre distance between the endpoints of a link.
///
/// Topics get extra room so top-level hubs spread out; links into outcomes
/// get a little extra so leaves do not crowd their parent.
pub fn link_distance(source: &Node, target: &Node) -> f64 {
	let mut distance = 30.0 + 0.9 * (source.r + target.r);
	if source.kind == NodeKind::Topic || target.kind == NodeKind::Topic {
		distance += 60.0;
	}
	if target.kind == NodeKind::Outcome {
		distance += 5.0;
	}
	distance
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Force {
	Link,
	Charge,
	Center,
	Position,
	Collide,
}

impl Force {
	pub const ALL: [Force; 5] = [
		Force::Link,
		Force::Charge,
		Force::Center,
		Force::Position,
		Force::Collide,
	];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationState {
	Running,
	Settled,
}

/// Outcome of a single [`Simulation::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
	/// Positions moved; more ticks follow.
	Moved,
	/// Positions moved and alpha dropped below the stopping threshold.
	Settled,
	/// Already settled, nothing moved.
	Idle,
}

/// Linear congruential generator for jiggling coincident points.
#[derive(Clone, Debug)]
struct Lcg(u64);

impl Lcg {
	const A: u64 = 1_664_525;
	const C: u64 = 1_013_904_223;
	const M: u64 = 1 << 32;

	fn next(&mut self) -> f64 {
		self.0 = (Self::A.wrapping_mul(self.0).wrapping_add(Self::C)) % Self::M;
		self.0 as f64 / Self::M as f64
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

#[derive(Clone, Debug)]
pub struct Simulation {
	config: LayoutConfig,
	forces: Vec<Force>,
	center: (f64, f64),
	alpha: f64,
	velocities: Vec<(f64, f64)>,
	/// Share of each link's correction applied to its target.
	bias: Vec<f64>,
	ticks: u64,
	state: SimulationState,
	rng: Lcg,
}

impl Simulation {
	/// Seed positions on a spiral around `center` and start with every force.
	pub fn new(model: &mut GraphModel, config: LayoutConfig, center: (f64, f64)) -> Self {
		Self::with_forces(model, config, center, Force::ALL.to_vec())
	}

	pub fn with_forces(
		model: &mut GraphModel,
		config: LayoutConfig,
		center: (f64, f64),
		forces: Vec<Force>,
	) -> Self {
		let (nodes, links) = model.parts_mut();
		seed_positions(nodes, center);

		let mut degree = vec![0usize; nodes.len()];
		for link in links {
			degree[link.source] += 1;
			degree[link.target] += 1;
		}
		let bias = links
			.iter()
			.map(|l| degree[l.source] as f64 / (degree[l.source] + degree[l.target]) as f64)
			.collect();

		Self {
			config,
			forces,
			center,
			alpha: 1.0,
			velocities: vec![(0.0, 0.0); nodes.len()],
			bias,
			ticks: 0,
			state: SimulationState::Running,
			rng: Lcg(1),
		}
	}

	pub fn state(&self) -> SimulationState {
		self.state
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	pub fn center(&self) -> (f64, f64) {
		self.center
	}

	/// Move the point the centering forces pull toward.
	pub fn set_center(&mut self, center: (f64, f64)) {
		self.center = center;
	}

	/// Restart a settled simulation at full temperature.
	pub fn reheat(&mut self) {
		self.alpha = 1.0;
		self.state = SimulationState::Running;
	}

	/// Advance one tick: decay alpha, accumulate forces, integrate positions.
	pub fn step(&mut self, model: &mut GraphModel) -> Tick {
		if self.state == SimulationState::Settled {
			return Tick::Idle;
		}
		let (nodes, links) = model.parts_mut();
		if self.velocities.len() != nodes.len() {
			self.velocities.resize(nodes.len(), (0.0, 0.0));
		}

		self.alpha += (0.0 - self.alpha) * self.config.alpha_decay;
		self.ticks += 1;

		for i in 0..self.forces.len() {
			let force = self.forces[i];
			match force {
				Force::Link => self.apply_link(nodes, links),
				Force::Charge => self.apply_charge(nodes),
				Force::Center => self.apply_center(nodes),
				Force::Position => self.apply_position(nodes),
				Force::Collide => self.apply_collide(nodes),
			}
		}

		let keep = 1.0 - self.config.velocity_decay;
		for (node, v) in nodes.iter_mut().zip(self.velocities.iter_mut()) {
			v.0 *= keep;
			v.1 *= keep;
			node.x += v.0;
			node.y += v.1;
		}

		if self.alpha < self.config.alpha_min {
			self.state = SimulationState::Settled;
			info!("Simulation settled after {} ticks", self.ticks);
			Tick::Settled
		} else {
			Tick::Moved
		}
	}

	/// Step until settled or `max_ticks` elapse; returns ticks taken.
	pub fn run(&mut self, model: &mut GraphModel, max_ticks: usize) -> usize {
		let mut taken = 0;
		while taken < max_ticks {
			match self.step(model) {
				Tick::Idle => break,
				Tick::Settled => {
					taken += 1;
					break;
				}
				Tick::Moved => taken += 1,
			}
		}
		taken
	}

	fn apply_link(&mut self, nodes: &[Node], links: &[Link]) {
		let strength = self.config.link_strength * self.alpha;
		for (link, &bias) in links.iter().zip(&self.bias) {
			let (s, t) = (link.source, link.target);
			if s == t {
				continue;
			}
			let distance = link_distance(&nodes[s], &nodes[t]);
			let (vs, vt) = (self.velocities[s], self.velocities[t]);
			let mut dx = nodes[t].x + vt.0 - nodes[s].x - vs.0;
			let mut dy = nodes[t].y + vt.1 - nodes[s].y - vs.1;
			if dx == 0.0 {
				dx = self.rng.jiggle();
			}
			if dy == 0.0 {
				dy = self.rng.jiggle();
			}
			let l = (dx * dx + dy * dy).sqrt();
			let k = (l - distance) / l * strength;
			let (dx, dy) = (dx * k, dy * k);
			self.velocities[t].0 -= dx * bias;
			self.velocities[t].1 -= dy * bias;
			self.velocities[s].0 += dx * (1.0 - bias);
			self.velocities[s].1 += dy * (1.0 - bias);
		}
	}

	fn apply_charge(&mut self, nodes: &[Node]) {
		let strength = self.config.charge_strength * self.alpha;
		let min2 = self.config.charge_distance_min * self.config.charge_distance_min;
		for i in 0..nodes.len() {
			let (mut fx, mut fy) = (0.0, 0.0);
			for j in 0..nodes.len() {
				if i == j {
					continue;
				}
				let mut dx = nodes[j].x - nodes[i].x;
				let mut dy = nodes[j].y - nodes[i].y;
				if dx == 0.0 {
					dx = self.rng.jiggle();
				}
				if dy == 0.0 {
					dy = self.rng.jiggle();
				}
				let mut l = dx * dx + dy * dy;
				if l < min2 {
					l = (min2 * l).sqrt();
				}
				fx += dx * strength / l;
				fy += dy * strength / l;
			}
			self.velocities[i].0 += fx;
			self.velocities[i].1 += fy;
		}
	}

	fn apply_center(&mut self, nodes: &mut [Node]) {
		if nodes.is_empty() {
			return;
		}
		let n = nodes.len() as f64;
		let (sx, sy) = nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let (dx, dy) = (sx / n - self.center.0, sy / n - self.center.1);
		for node in nodes {
			node.x -= dx;
			node.y -= dy;
		}
	}

	fn apply_position(&mut self, nodes: &[Node]) {
		let k = self.config.position_strength * self.alpha;
		for (node, v) in nodes.iter().zip(self.velocities.iter_mut()) {
			v.0 += (self.center.0 - node.x) * k;
			v.1 += (self.center.1 - node.y) * k;
		}
	}

	fn apply_collide(&mut self, nodes: &[Node]) {
		let half_pad = self.config.collision_padding / 2.0;
		let radius = |node: &Node| (node.r + half_pad).max(0.0);
		for _ in 0..self.config.collision_iterations {
			for i in 0..nodes.len() {
				let ri = radius(&nodes[i]);
				let xi = nodes[i].x + self.velocities[i].0;
				let yi = nodes[i].y + self.velocities[i].1;
				for j in (i + 1)..nodes.len() {
					let rj = radius(&nodes[j]);
					let r = ri + rj;
					let mut dx = xi - (nodes[j].x + self.velocities[j].0);
					let mut dy = yi - (nodes[j].y + self.velocities[j].1);
					let mut l = dx * dx + dy * dy;
					if l >= r * r {
						continue;
					}
					if dx == 0.0 {
						dx = self.rng.jiggle();
						l += dx * dx;
					}
					if dy == 0.0 {
						dy = self.rng.jiggle();
						l += dy * dy;
					}
					let d = l.sqrt();
					let k = (r - d) / d;
					let (dx, dy) = (dx * k, dy * k);
					let (ri2, rj2) = (ri * ri, rj * rj);
					let w = if ri2 + rj2 > 0.0 { rj2 / (ri2 + rj2) } else { 0.5 };
					self.velocities[i].0 += dx * w;
					self.velocities[i].1 += dy * w;
					self.velocities[j].0 -= dx * (1.0 - w);
					self.velocities[j].1 -= dy * (1.0 - w);
				}
			}
		}
	}
}

/// Phyllotaxis spiral so no two nodes start on the same point.
fn seed_positions(nodes: &mut [Node], center: (f64, f64)) {
	let angle_step = PI * (3.0 - 5.0_f64.sqrt());
	for (i, node) in nodes.iter_mut().enumerate() {
		let radius = 10.0 * (0.5 + i as f64).sqrt();
		let angle = i as f64 * angle_step;
		node.x = center.0 + radius * angle.cos();
		node.y = center.1 + radius * angle.sin();
	}
	debug!("Seeded {} nodes around ({}, {})", nodes.len(), center.0, center.1);
}
