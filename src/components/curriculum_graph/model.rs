use std::collections::HashMap;

use log::info;

use super::error::DataIntegrityError;
use super::types::{GraphPayload, NodeId, NodeKind, RawLink, RawNode};

/// A curriculum node. Only the layout engine moves `x`/`y`.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: NodeId,
	pub kind: NodeKind,
	pub r: f64,
	pub color: Option<String>,
	pub label: Option<String>,
	pub title: Option<String>,
	pub(crate) x: f64,
	pub(crate) y: f64,
}

impl Node {
	pub fn x(&self) -> f64 {
		self.x
	}

	pub fn y(&self) -> f64 {
		self.y
	}

	pub fn position(&self) -> (f64, f64) {
		(self.x, self.y)
	}
}

/// Link with both endpoints resolved to node indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
	pub source: usize,
	pub target: usize,
}

/// Validated graph: unique ids, every link endpoint resolved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphModel {
	nodes: Vec<Node>,
	links: Vec<Link>,
	index: HashMap<NodeId, usize>,
}

impl GraphModel {
	/// Validate and resolve a payload. Nodes without `r` get `default_radius`.
	pub fn build(
		raw_nodes: Vec<RawNode>,
		raw_links: Vec<RawLink>,
		default_radius: f64,
	) -> Result<Self, DataIntegrityError> {
		let mut index = HashMap::with_capacity(raw_nodes.len());
		let mut nodes = Vec::with_capacity(raw_nodes.len());

		for raw in raw_nodes {
			if index.contains_key(&raw.id) {
				return Err(DataIntegrityError::DuplicateNodeId(raw.id.0));
			}
			index.insert(raw.id.clone(), nodes.len());
			nodes.push(Node {
				id: raw.id,
				kind: raw.kind,
				r: raw.r.unwrap_or(default_radius),
				color: raw.color,
				label: raw.label,
				title: raw.title,
				x: 0.0,
				y: 0.0,
			});
		}

		let resolve = |link: usize, id: NodeId| {
			index
				.get(&id)
				.copied()
				.ok_or(DataIntegrityError::UnknownLinkEndpoint { link, id: id.0 })
		};
		let links = raw_links
			.into_iter()
			.enumerate()
			.map(|(i, raw)| {
				Ok(Link {
					source: resolve(i, raw.source)?,
					target: resolve(i, raw.target)?,
				})
			})
			.collect::<Result<Vec<_>, DataIntegrityError>>()?;

		info!("Graph built: {} nodes, {} links", nodes.len(), links.len());
		Ok(Self {
			nodes,
			links,
			index,
		})
	}

	pub fn from_payload(payload: GraphPayload, default_radius: f64) -> Result<Self, DataIntegrityError> {
		Self::build(payload.nodes, payload.links, default_radius)
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Mutable nodes next to the (immutable) links, for the layout engine.
	pub(crate) fn parts_mut(&mut self) -> (&mut [Node], &[Link]) {
		(&mut self.nodes, &self.links)
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	pub fn node(&self, idx: usize) -> Option<&Node> {
		self.nodes.get(idx)
	}

	pub fn index_of(&self, id: &NodeId) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Both endpoints of a link.
	pub fn endpoints(&self, link: &Link) -> (&Node, &Node) {
		(&self.nodes[link.source], &self.nodes[link.target])
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}
