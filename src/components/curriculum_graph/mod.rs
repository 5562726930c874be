//! Force-directed curriculum graph: payload model, layout engine, scene,
//! viewport and pointer/keyboard interaction, plus the Leptos component that
//! drives them from the animation frame loop.

pub mod api;
mod component;
pub mod config;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod model;
mod render;
pub mod scene;
pub mod schedule;
pub mod state;
pub mod types;
pub mod viewport;

pub use component::CurriculumGraph;
pub use config::GraphConfig;
pub use error::{DataIntegrityError, GraphError, LoadError};
pub use layout::{Simulation, SimulationState, link_distance};
pub use model::{GraphModel, Link, Node};
pub use scene::Scene;
pub use state::CurriculumGraphState;
pub use types::{
	GraphPayload, NodeId, NodeKind, RawLink, RawNode, decode_response, parse_response,
};
pub use viewport::{Transform, Viewport};
