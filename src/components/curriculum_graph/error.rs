use thiserror::Error;

/// The payload describes a graph that cannot be laid out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataIntegrityError {
	#[error("duplicate node id `{0}`")]
	DuplicateNodeId(String),
	#[error("link #{link} references unknown node id `{id}`")]
	UnknownLinkEndpoint { link: usize, id: String },
}

/// Fetching or decoding the graph payload failed.
#[derive(Debug, Error)]
pub enum LoadError {
	#[error("fetch failed: {0}")]
	Fetch(String),
	#[error("HTTP {0}")]
	Http(u16),
	#[error("invalid payload: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("{0}")]
	Status(String),
	#[error("payload has no graph data")]
	MissingData,
}

/// Anything that keeps the graph from being shown.
#[derive(Debug, Error)]
pub enum GraphError {
	#[error(transparent)]
	Load(#[from] LoadError),
	#[error(transparent)]
	Integrity(#[from] DataIntegrityError),
}
