use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::CurriculumGraphState;

/// Paint the scene: background, then links, nodes and labels under the view transform.
pub fn render(state: &CurriculumGraphState, ctx: &CanvasRenderingContext2d) {
	let style = &state.config.style;
	let (width, height) = state.viewport.size();
	let t = state.viewport.transform();

	ctx.set_fill_style_str(&style.background);
	ctx.fill_rect(0.0, 0.0, width, height);
	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	draw_labels(state, ctx);
	ctx.restore();
}

fn draw_links(state: &CurriculumGraphState, ctx: &CanvasRenderingContext2d) {
	let style = &state.config.style;
	ctx.set_global_alpha(style.link_opacity);
	ctx.set_stroke_style_str(&style.link_stroke);
	ctx.set_line_width(style.link_width);
	ctx.begin_path();
	for line in &state.scene.links {
		ctx.move_to(line.x1, line.y1);
		ctx.line_to(line.x2, line.y2);
	}
	ctx.stroke();
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &CurriculumGraphState, ctx: &CanvasRenderingContext2d) {
	let style = &state.config.style;
	let k = state.viewport.transform().k;
	ctx.set_stroke_style_str(&style.node_stroke);
	ctx.set_line_width(style.node_stroke_width);

	for disk in &state.scene.nodes {
		ctx.begin_path();
		let _ = ctx.arc(disk.x, disk.y, disk.r.max(0.0), 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&disk.fill);
		ctx.fill();
		ctx.stroke();
	}

	if let Some(disk) = state
		.interaction
		.hovered()
		.and_then(|idx| state.scene.nodes.get(idx))
	{
		ctx.begin_path();
		let _ = ctx.arc(disk.x, disk.y, disk.r.max(0.0) + 2.0 / k, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&style.hover_ring);
		ctx.set_line_width(1.5 / k);
		ctx.stroke();
	}
}

fn draw_labels(state: &CurriculumGraphState, ctx: &CanvasRenderingContext2d) {
	let style = &state.config.style;
	ctx.set_fill_style_str(&style.label_fill);
	ctx.set_text_align("center");
	for label in &state.scene.labels {
		if label.text.is_empty() {
			continue;
		}
		ctx.set_font(&format!("{}px sans-serif", label.font_size));
		let _ = ctx.fill_text(&label.text, label.x, label.y + label.dy);
	}
}
