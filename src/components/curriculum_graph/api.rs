//! Fetches the graph payload from the backend.

use log::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use super::error::LoadError;
use super::types::{GraphPayload, decode_response};

/// Endpoint used when the build does not set `CURRICULUM_GRAPH_API`.
pub const DEFAULT_GRAPH_URL: &str = "/api/graph/data/";

/// Payload endpoint, overridable at build time.
pub fn graph_url() -> &'static str {
	option_env!("CURRICULUM_GRAPH_API").unwrap_or(DEFAULT_GRAPH_URL)
}

/// GET the payload once. No retries; failures go back to the host page.
pub async fn fetch_graph(url: &str) -> Result<GraphPayload, LoadError> {
	let result = fetch_body(url)
		.await
		.and_then(|(ok, status, body)| decode_response(ok, status, &body));
	match &result {
		Ok(payload) => debug!(
			"Fetched {} nodes / {} links from {}",
			payload.nodes.len(),
			payload.links.len(),
			url
		),
		Err(e) => warn!("Loading graph from {} failed: {}", url, e),
	}
	result
}

async fn fetch_body(url: &str) -> Result<(bool, u16, String), LoadError> {
	let opts = RequestInit::new();
	opts.set_method("GET");
	opts.set_mode(RequestMode::Cors);

	let request = Request::new_with_str_and_init(url, &opts)
		.map_err(|e| LoadError::Fetch(format!("request error: {:?}", e)))?;
	let window = web_sys::window().ok_or_else(|| LoadError::Fetch("no window".into()))?;

	let response: Response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(|e| LoadError::Fetch(format!("{:?}", e)))?
		.dyn_into()
		.map_err(|_| LoadError::Fetch("response is not a Response".into()))?;
	let text = response
		.text()
		.map_err(|e| LoadError::Fetch(format!("body error: {:?}", e)))?;
	let body = JsFuture::from(text)
		.await
		.map_err(|e| LoadError::Fetch(format!("body error: {:?}", e)))?
		.as_string()
		.ok_or_else(|| LoadError::Fetch("body is not text".into()))?;
	Ok((response.ok(), response.status(), body))
}
