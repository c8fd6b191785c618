use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::highlight::{EdgeStyle, NodeStyle};
use super::state::GraphEngine;

/// Ring color per hop tier, nearest first.
const TIER_STROKES: [&str; 5] = ["#ffffff", "#e0e0ff", "#b8c4ff", "#8fa3ff", "#6a85ff"];
const DIMMED_ALPHA: f64 = 0.15;

pub fn render(engine: &GraphEngine, ctx: &CanvasRenderingContext2d) {
	let (width, height) = engine.viewport();
	let t = engine.transform();
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, width, height);
	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);
	draw_edges(engine, ctx);
	draw_nodes(engine, ctx);
	ctx.restore();
}

fn draw_edges(engine: &GraphEngine, ctx: &CanvasRenderingContext2d) {
	let k = engine.transform().k;
	for (i, &(s, t)) in engine.link_endpoints().iter().enumerate() {
		if !engine.visibility().link(i) {
			continue;
		}
		let (Some((x1, y1)), Some((x2, y2))) = (engine.position(s), engine.position(t)) else {
			continue;
		};

		let (alpha, width, dashed) = match engine.link_style(i) {
			EdgeStyle::Normal => (0.6, 1.5 / k, false),
			EdgeStyle::Highlighted => (0.9, 2.5 / k, false),
			EdgeStyle::Dimmed => (DIMMED_ALPHA, 1.0 / k, true),
		};
		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {})", alpha));
		ctx.set_line_width(width);
		if dashed {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(4.0 / k),
				&JsValue::from_f64(4.0 / k),
			));
		}
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
		if dashed {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
	}
}

fn draw_nodes(engine: &GraphEngine, ctx: &CanvasRenderingContext2d) {
	let Some(data) = engine.data() else {
		return;
	};
	let k = engine.transform().k;

	for (i, node) in data.nodes.iter().enumerate() {
		if !engine.visibility().node(i) {
			continue;
		}
		let Some((x, y)) = engine.position(i) else {
			continue;
		};
		let style = engine.node_style(i);
		let alpha = if style == NodeStyle::Dimmed {
			DIMMED_ALPHA
		} else {
			1.0
		};

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, node.size, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&node.color);
		ctx.fill();

		let ring = match style {
			NodeStyle::Selected => Some(("#ffeb3b", 4.0)),
			NodeStyle::Tier(h) => Some((TIER_STROKES[(h as usize).saturating_sub(1).min(4)], 2.5)),
			NodeStyle::Reached => Some(("#5c6bc0", 1.5)),
			NodeStyle::Normal | NodeStyle::Dimmed => None,
		};
		if let Some((color, line)) = ring {
			ctx.begin_path();
			let _ = ctx.arc(x, y, node.size + line / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(color);
			ctx.set_line_width(line / k);
			ctx.stroke();
		}

		if engine.hovered() == Some(i) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, node.size + 6.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.7)");
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.9));
		ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
		let _ = ctx.fill_text(&node.name, x + node.size + 3.0, y + 3.0);
		ctx.set_global_alpha(1.0);
	}
}
