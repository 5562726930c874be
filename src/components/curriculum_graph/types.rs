use std::fmt;

use serde::Deserialize;

use super::error::LoadError;

/// Node id as sent by the backend; numbers are kept as their decimal text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "RawId")]
pub struct NodeId(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
	Text(String),
	Number(serde_json::Number),
}

impl From<RawId> for NodeId {
	fn from(raw: RawId) -> Self {
		match raw {
			RawId::Text(s) => NodeId(s),
			RawId::Number(n) => NodeId(n.to_string()),
		}
	}
}

impl From<&str> for NodeId {
	fn from(s: &str) -> Self {
		NodeId(s.to_string())
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Hierarchy level of a curriculum node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum NodeKind {
	Topic,
	Group,
	Subgroup,
	Outcome,
	Other(String),
}

impl From<String> for NodeKind {
	fn from(tag: String) -> Self {
		match tag.as_str() {
			"konu" | "topic" => NodeKind::Topic,
			"grup" | "group" => NodeKind::Group,
			"alt_grup" | "subgroup" => NodeKind::Subgroup,
			"kazanım" | "outcome" => NodeKind::Outcome,
			_ => NodeKind::Other(tag),
		}
	}
}

impl From<&str> for NodeKind {
	fn from(tag: &str) -> Self {
		tag.to_string().into()
	}
}

impl NodeKind {
	/// Topics, groups and subgroups are drawn with a text label.
	pub fn is_labeled(&self) -> bool {
		matches!(self, NodeKind::Topic | NodeKind::Group | NodeKind::Subgroup)
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RawNode {
	pub id: NodeId,
	#[serde(rename = "type")]
	pub kind: NodeKind,
	#[serde(default)]
	pub r: Option<f64>,
	#[serde(default)]
	pub color: Option<String>,
	#[serde(default)]
	pub label: Option<String>,
	#[serde(default)]
	pub title: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RawLink {
	pub source: NodeId,
	pub target: NodeId,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphPayload {
	#[serde(default)]
	pub nodes: Vec<RawNode>,
	#[serde(default)]
	pub links: Vec<RawLink>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
	Success,
	Error,
	#[serde(other)]
	Unknown,
}

/// Envelope returned by the graph data endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiResponse {
	pub status: ResponseStatus,
	#[serde(default)]
	pub message: Option<String>,
	#[serde(default)]
	pub data: Option<GraphPayload>,
}

impl ApiResponse {
	pub fn into_payload(self) -> Result<GraphPayload, LoadError> {
		match self.status {
			ResponseStatus::Success => self.data.ok_or(LoadError::MissingData),
			ResponseStatus::Error | ResponseStatus::Unknown => Err(LoadError::Status(
				self.message.unwrap_or_else(|| "API error".to_string()),
			)),
		}
	}
}

/// Decode a response body into the graph payload.
pub fn parse_response(body: &str) -> Result<GraphPayload, LoadError> {
	let response: ApiResponse = serde_json::from_str(body)?;
	response.into_payload()
}

/// Decode a fetched body. The backend reports failures as an error envelope
/// on a 4xx/5xx response, so the envelope's message wins over the bare status.
pub fn decode_response(ok: bool, status: u16, body: &str) -> Result<GraphPayload, LoadError> {
	match parse_response(body) {
		Err(LoadError::Parse(_)) if !ok => Err(LoadError::Http(status)),
		result => result,
	}
}
