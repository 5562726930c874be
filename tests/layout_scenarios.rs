use curriculum_graph::components::curriculum_graph::config::{LayoutConfig, ViewportConfig};
use curriculum_graph::components::curriculum_graph::{
	CurriculumGraphState, DataIntegrityError, GraphConfig, GraphModel, NodeKind, Simulation,
	SimulationState, Transform, Viewport, link_distance, parse_response,
};

/// Deterministic pseudo-random in [0, 1).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Random curriculum tree: one topic, a few groups, outcomes under them.
fn sample_body(n: usize) -> String {
	let kinds = ["konu", "grup", "alt_grup", "kazanım"];
	let nodes: Vec<String> = (0..n)
		.map(|i| {
			let kind = if i == 0 { kinds[0] } else { kinds[1 + i % 3] };
			let r = 6.0 + rand_simple(i * 7) * 30.0;
			format!(r#"{{ "id": "n{i}", "type": "{kind}", "r": {r:.1}, "label": "Node {i}" }}"#)
		})
		.collect();
	let links: Vec<String> = (1..n)
		.map(|i| {
			let parent = (rand_simple(i) * i as f64) as usize;
			format!(r#"{{ "source": "n{parent}", "target": "n{i}" }}"#)
		})
		.collect();
	format!(
		r#"{{ "status": "success", "data": {{ "nodes": [{}], "links": [{}] }} }}"#,
		nodes.join(","),
		links.join(",")
	)
}

fn sample_model(n: usize) -> GraphModel {
	let payload = parse_response(&sample_body(n)).unwrap();
	GraphModel::from_payload(payload, 14.0).unwrap()
}

fn pair(links: &str) -> Result<GraphModel, DataIntegrityError> {
	let body = format!(
		r#"{{ "status": "success", "data": {{
			"nodes": [ {{ "id": "A", "type": "konu", "r": 20 }}, {{ "id": "B", "type": "kazanım", "r": 10 }} ],
			"links": [{links}] }} }}"#
	);
	GraphModel::from_payload(parse_response(&body).unwrap(), 14.0)
}

fn distance(model: &GraphModel) -> f64 {
	let (ax, ay) = model.nodes()[0].position();
	let (bx, by) = model.nodes()[1].position();
	((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
}

#[test]
fn every_link_resolves_to_a_node() {
	let model = sample_model(120);
	assert_eq!(model.links().len(), 119);
	for link in model.links() {
		let (source, target) = model.endpoints(link);
		assert_eq!(model.index_of(&source.id), Some(link.source));
		assert_eq!(model.index_of(&target.id), Some(link.target));
	}
}

#[test]
fn positions_stay_finite() {
	let mut model = sample_model(150);
	let mut sim = Simulation::new(&mut model, LayoutConfig::default(), (640.0, 360.0));
	for _ in 0..400 {
		sim.step(&mut model);
		assert!(
			model
				.nodes()
				.iter()
				.all(|n| n.x().is_finite() && n.y().is_finite())
		);
	}
	assert_eq!(sim.state(), SimulationState::Settled);
}

#[test]
fn link_distance_is_monotone_and_topic_aware() {
	let model = sample_model(40);
	let nodes = model.nodes();
	for a in nodes {
		for b in nodes {
			for c in nodes.iter().filter(|c| c.kind == b.kind && c.r >= b.r) {
				assert!(link_distance(a, b) <= link_distance(a, c));
				assert!(link_distance(b, a) <= link_distance(c, a));
			}
		}
	}

	let topic = &nodes[0];
	assert_eq!(topic.kind, NodeKind::Topic);
	let group = nodes.iter().find(|n| n.kind == NodeKind::Group).unwrap();
	let mut like_topic = group.clone();
	like_topic.r = topic.r;
	assert!(link_distance(topic, group) > link_distance(&like_topic, group));
	assert!(link_distance(group, topic) > link_distance(group, &like_topic));
}

#[test]
fn topic_outcome_pair_settles_near_target_distance() {
	let mut linked = pair(r#"{ "source": "A", "target": "B" }"#).unwrap();
	let (a, b) = (&linked.nodes()[0], &linked.nodes()[1]);
	assert!((link_distance(a, b) - 122.0).abs() < 1e-9);

	let mut sim = Simulation::new(&mut linked, LayoutConfig::default(), (400.0, 300.0));
	sim.run(&mut linked, 1_000);
	// Spring, charge and the per-axis pull balance where 0.075 l² - 7.32 l - 1600 = 0.
	let settled = distance(&linked);
	let equilibrium = (7.32 + (7.32f64.powi(2) + 4.0 * 0.075 * 1600.0).sqrt()) / (2.0 * 0.075);
	assert!(
		(settled - equilibrium).abs() < equilibrium * 0.03,
		"settled at {settled}, expected about {equilibrium}"
	);

	let mut unlinked = pair("").unwrap();
	let mut sim = Simulation::new(&mut unlinked, LayoutConfig::default(), (400.0, 300.0));
	sim.run(&mut unlinked, 1_000);
	assert!(distance(&unlinked) > settled + 50.0);
}

#[test]
fn links_keep_collision_spacing() {
	let mut model = sample_model(60);
	let mut sim = Simulation::new(&mut model, LayoutConfig::default(), (0.0, 0.0));
	sim.run(&mut model, 1_000);
	let nodes = model.nodes();
	let mut worst: f64 = 1.0;
	for i in 0..nodes.len() {
		for j in (i + 1)..nodes.len() {
			let (xi, yi) = nodes[i].position();
			let (xj, yj) = nodes[j].position();
			let d = ((xi - xj).powi(2) + (yi - yj).powi(2)).sqrt();
			worst = worst.min(d / (nodes[i].r + nodes[j].r + 4.0));
		}
	}
	assert!(worst > 0.9, "closest pair at {worst} of minimum spacing");
}

#[test]
fn unknown_endpoint_fails_before_layout() {
	let err = pair(r#"{ "source": "A", "target": "missing" }"#).unwrap_err();
	assert!(matches!(err, DataIntegrityError::UnknownLinkEndpoint { ref id, .. } if id == "missing"));
}

#[test]
fn fit_centres_a_single_node() {
	let body = r#"{ "status": "success", "data": { "nodes": [ { "id": 1, "type": "grup", "r": 25 } ], "links": [] } }"#;
	let model = GraphModel::from_payload(parse_response(body).unwrap(), 14.0).unwrap();
	let mut state = CurriculumGraphState::new(model, 1024.0, 768.0, GraphConfig::default());
	for _ in 0..30 {
		state.frame(16.0);
	}
	assert!(state.fit_to_view(None));
	while state.viewport.advance(16.0) {}

	let t = state.viewport.transform();
	assert!(t.k <= 1.0);
	let (sx, sy) = t.apply(state.model.nodes()[0].position());
	assert!((sx - 512.0).abs() < 1e-6);
	assert!((sy - 384.0).abs() < 1e-6);
}

#[test]
fn empty_graph_fit_is_a_no_op() {
	let model = GraphModel::from_payload(
		parse_response(r#"{ "status": "success", "data": { "nodes": [], "links": [] } }"#).unwrap(),
		14.0,
	)
	.unwrap();
	let mut state = CurriculumGraphState::new(model, 800.0, 600.0, GraphConfig::default());
	state.viewport.apply_transform(Transform { x: 12.0, y: -4.0, k: 1.7 });
	assert!(!state.fit_to_view(None));
	for _ in 0..400 {
		state.frame(16.0);
	}
	assert_eq!(state.viewport.transform(), Transform { x: 12.0, y: -4.0, k: 1.7 });
}

#[test]
fn reset_always_reaches_identity() {
	for (i, factor) in [0.1, 0.7, 1.0, 3.5, 50.0].into_iter().enumerate() {
		let mut viewport = Viewport::new(800.0, 600.0, ViewportConfig::default());
		viewport.zoom_at(factor, (i as f64 * 100.0, 50.0));
		viewport.pan_by(-33.0 * i as f64, 71.0);
		viewport.reset();
		while viewport.advance(16.0) {}
		assert_eq!(viewport.transform(), Transform::IDENTITY);
	}
}
