use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;

use crate::components::curriculum_graph::api::{fetch_graph, graph_url};
use crate::components::curriculum_graph::{CurriculumGraph, GraphConfig, GraphError, GraphModel};

#[derive(Clone, Debug)]
enum LoadState {
	Loading,
	Ready(GraphModel),
	Failed(String),
}

/// Fetch and validate; an inconsistent graph never reaches the layout.
async fn load_graph(url: &str, config: &GraphConfig) -> Result<GraphModel, GraphError> {
	let payload = fetch_graph(url).await?;
	Ok(GraphModel::from_payload(payload, config.layout.default_radius)?)
}

const LEGEND: &[(&str, &str)] = &[
	("#1976d2", "Topic"),
	("#8e24aa", "Group"),
	("#00897b", "Subgroup"),
	("linear-gradient(90deg,#e53935,#ffb300,#00c853)", "Outcome (color = success)"),
];

#[component]
fn Legend() -> impl IntoView {
	view! {
		<div
			class="graph-legend"
			style="position: fixed; top: 12px; right: 12px; background: #151826; border: 1px solid #2a3042; padding: 10px 12px; border-radius: 10px; font-size: 13px; z-index: 10;"
		>
			{LEGEND
				.iter()
				.map(|(swatch, name)| {
					view! {
						<div style="display: flex; gap: 8px; align-items: center; margin: 4px 0;">
							<span style=format!(
								"display: inline-block; width: 14px; height: 14px; border-radius: 50%; background: {swatch};",
							) />
							{*name}
						</div>
					}
				})
				.collect_view()}
			<div style="color: #96a0b5;">"Size: hierarchy level / success"</div>
		</div>
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let load = RwSignal::new(LoadState::Loading);

	spawn_local(async move {
		let config = GraphConfig::default();
		let next = match load_graph(graph_url(), &config).await {
			Ok(model) => LoadState::Ready(model),
			Err(e) => {
				warn!("Graph unavailable: {}", e);
				LoadState::Failed(e.to_string())
			}
		};
		load.set(next);
	});

	view! {
		<div
			class="fullscreen-graph"
			style="height: 100vh; background: #0f111a; color: #e6e6e6;"
		>
			<Legend />
			{move || match load.get() {
				LoadState::Loading => view! { <div style="padding: 20px;">"Loading…"</div> }.into_any(),
				LoadState::Failed(message) => {
					view! { <div style="color: #f88; padding: 20px;">"Error: " {message}</div> }
						.into_any()
				}
				LoadState::Ready(model) => view! { <CurriculumGraph model=model /> }.into_any(),
			}}
			<div class="graph-overlay" style="position: fixed; bottom: 12px; left: 12px; color: #96a0b5; font-size: 12px;">
				"Scroll to zoom, drag to pan. R resets the view, F fits the graph."
			</div>
		</div>
	}
}
