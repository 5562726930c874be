//! Retained scene: link lines below, node disks above, labels on top.
//!
//! Elements are keyed by node id. [`Scene::on_tick`] only copies positions;
//! [`Scene::rebind`] joins a new model against the existing elements so nodes
//! that survive keep their element (and its [`ElementKey`]).

use std::collections::HashMap;

use super::config::StyleConfig;
use super::model::{GraphModel, Node};
use super::types::NodeId;

/// Stable identity of a scene element across rebinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementKey(u64);

#[derive(Clone, Debug, PartialEq)]
pub struct NodeDisk {
	pub key: ElementKey,
	pub id: NodeId,
	pub r: f64,
	pub fill: String,
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkLine {
	pub source: usize,
	pub target: usize,
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelText {
	pub key: ElementKey,
	pub id: NodeId,
	/// Index into the node layer.
	pub node: usize,
	pub text: String,
	pub font_size: f64,
	pub x: f64,
	pub y: f64,
	/// Drawn this far below the node centre.
	pub dy: f64,
}

pub fn label_font_size(r: f64) -> f64 {
	(r * 0.52).max(12.0)
}

pub fn label_offset(r: f64) -> f64 {
	r + 14.0
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
	pub links: Vec<LinkLine>,
	pub nodes: Vec<NodeDisk>,
	pub labels: Vec<LabelText>,
	default_fill: String,
	next_key: u64,
}

impl Scene {
	pub fn bind(model: &GraphModel, style: &StyleConfig) -> Self {
		let mut scene = Scene {
			default_fill: style.default_fill.clone(),
			..Default::default()
		};
		scene.rebind(model);
		scene
	}

	fn next_key(&mut self) -> ElementKey {
		self.next_key += 1;
		ElementKey(self.next_key)
	}

	fn fill_for(&self, node: &Node) -> String {
		node.color.clone().unwrap_or_else(|| self.default_fill.clone())
	}

	/// Keyed join: keep elements whose id is still present, create the rest,
	/// drop the ones that disappeared. Element order follows the model.
	pub fn rebind(&mut self, model: &GraphModel) {
		let mut old_nodes: HashMap<NodeId, NodeDisk> =
			self.nodes.drain(..).map(|d| (d.id.clone(), d)).collect();
		let mut old_labels: HashMap<NodeId, ElementKey> =
			self.labels.drain(..).map(|l| (l.id, l.key)).collect();

		for node in model.nodes() {
			let disk = match old_nodes.remove(&node.id) {
				Some(mut disk) => {
					disk.r = node.r;
					disk.fill = self.fill_for(node);
					disk
				}
				None => NodeDisk {
					key: self.next_key(),
					id: node.id.clone(),
					r: node.r,
					fill: self.fill_for(node),
					x: node.x(),
					y: node.y(),
				},
			};
			self.nodes.push(disk);
		}

		for (idx, node) in model.nodes().iter().enumerate() {
			if !node.kind.is_labeled() {
				continue;
			}
			let key = match old_labels.remove(&node.id) {
				Some(key) => key,
				None => self.next_key(),
			};
			self.labels.push(LabelText {
				key,
				id: node.id.clone(),
				node: idx,
				text: node.label.clone().unwrap_or_default(),
				font_size: label_font_size(node.r),
				x: node.x(),
				y: node.y(),
				dy: label_offset(node.r),
			});
		}

		self.links = model
			.links()
			.iter()
			.map(|link| LinkLine {
				source: link.source,
				target: link.target,
				x1: 0.0,
				y1: 0.0,
				x2: 0.0,
				y2: 0.0,
			})
			.collect();

		self.on_tick(model);
	}

	/// Copy the current node positions into every element.
	pub fn on_tick(&mut self, model: &GraphModel) {
		let nodes = model.nodes();
		for (disk, node) in self.nodes.iter_mut().zip(nodes) {
			disk.x = node.x();
			disk.y = node.y();
		}
		for line in &mut self.links {
			(line.x1, line.y1) = nodes[line.source].position();
			(line.x2, line.y2) = nodes[line.target].position();
		}
		for label in &mut self.labels {
			(label.x, label.y) = nodes[label.node].position();
		}
	}

	pub fn positions(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
		self.nodes.iter().map(|d| (d.x, d.y))
	}

	/// Topmost node whose disk contains the world point.
	pub fn node_at(&self, (wx, wy): (f64, f64)) -> Option<usize> {
		self.nodes
			.iter()
			.enumerate()
			.rev()
			.find(|(_, d)| {
				let (dx, dy) = (d.x - wx, d.y - wy);
				dx * dx + dy * dy <= d.r * d.r
			})
			.map(|(i, _)| i)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::curriculum_graph::config::LayoutConfig;
	use crate::components::curriculum_graph::layout::Simulation;
	use crate::components::curriculum_graph::types::{RawLink, RawNode};

	fn raw(id: &str, kind: &str, r: f64, label: Option<&str>) -> RawNode {
		RawNode {
			id: id.into(),
			kind: kind.into(),
			r: Some(r),
			color: None,
			label: label.map(Into::into),
			title: None,
		}
	}

	fn model(nodes: Vec<RawNode>, links: &[(&str, &str)]) -> GraphModel {
		let links = links
			.iter()
			.map(|(s, t)| RawLink {
				source: (*s).into(),
				target: (*t).into(),
			})
			.collect();
		GraphModel::build(nodes, links, 14.0).unwrap()
	}

	#[test]
	fn labels_only_for_hierarchy_nodes() {
		let m = model(
			vec![
				raw("t", "konu", 40.0, Some("Sayılar")),
				raw("g", "grup", 10.0, None),
				raw("s", "alt_grup", 18.0, Some("Kesirler")),
				raw("o", "kazanım", 9.0, Some("K1")),
			],
			&[],
		);
		let scene = Scene::bind(&m, &StyleConfig::default());
		let ids: Vec<_> = scene.labels.iter().map(|l| l.id.0.as_str()).collect();
		assert_eq!(ids, ["t", "g", "s"]);

		let topic = &scene.labels[0];
		assert!((topic.font_size - 20.8).abs() < 1e-9);
		assert_eq!(topic.dy, 54.0);
		assert_eq!(scene.labels[1].font_size, 12.0);
		assert_eq!(scene.labels[1].text, "");
	}

	#[test]
	fn fill_defaults_when_color_missing() {
		let mut colored = raw("a", "grup", 10.0, None);
		colored.color = Some("#8e24aa".into());
		let m = model(vec![colored, raw("b", "kazanım", 8.0, None)], &[]);
		let scene = Scene::bind(&m, &StyleConfig::default());
		assert_eq!(scene.nodes[0].fill, "#8e24aa");
		assert_eq!(scene.nodes[1].fill, "#90a4ae");
	}

	#[test]
	fn tick_copies_live_positions() {
		let mut m = model(
			vec![raw("a", "konu", 20.0, None), raw("b", "kazanım", 10.0, None)],
			&[("a", "b")],
		);
		let mut sim = Simulation::new(&mut m, LayoutConfig::default(), (0.0, 0.0));
		let mut scene = Scene::bind(&m, &StyleConfig::default());
		for _ in 0..5 {
			sim.step(&mut m);
			scene.on_tick(&m);
			let (a, b) = (&m.nodes()[0], &m.nodes()[1]);
			assert_eq!((scene.nodes[1].x, scene.nodes[1].y), b.position());
			let line = &scene.links[0];
			assert_eq!((line.x1, line.y1), a.position());
			assert_eq!((line.x2, line.y2), b.position());
			assert_eq!((scene.labels[0].x, scene.labels[0].y), a.position());
		}
	}

	#[test]
	fn rebind_preserves_identity_of_surviving_nodes() {
		let first = model(
			vec![raw("a", "konu", 20.0, None), raw("b", "grup", 10.0, None)],
			&[("a", "b")],
		);
		let mut scene = Scene::bind(&first, &StyleConfig::default());
		let key_a = scene.nodes[0].key;
		let label_b = scene.labels[1].key;

		let second = model(
			vec![
				raw("c", "kazanım", 5.0, None),
				raw("b", "grup", 12.0, None),
				raw("a", "konu", 20.0, None),
			],
			&[("a", "c")],
		);
		scene.rebind(&second);

		assert_eq!(scene.nodes.len(), 3);
		assert_eq!(scene.nodes[2].key, key_a);
		assert_eq!(scene.nodes[1].r, 12.0);
		assert_eq!(scene.labels[0].key, label_b);
		assert_eq!(scene.labels[0].node, 1);
		assert_ne!(scene.nodes[0].key, key_a);
		assert_eq!(scene.links.len(), 1);
		assert_eq!((scene.links[0].source, scene.links[0].target), (2, 0));
	}

	#[test]
	fn hit_test_uses_node_radius() {
		let mut m = model(vec![raw("a", "grup", 10.0, None)], &[]);
		let _ = Simulation::new(&mut m, LayoutConfig::default(), (100.0, 100.0));
		let scene = Scene::bind(&m, &StyleConfig::default());
		let (x, y) = m.nodes()[0].position();
		assert_eq!(scene.node_at((x + 9.0, y)), Some(0));
		assert_eq!(scene.node_at((x + 11.0, y)), None);
	}
}
