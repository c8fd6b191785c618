use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::{GraphCallbacks, GraphHandle};
use super::types::{GraphData, GraphNode};

type ListenerClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;
type FrameClosure = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Frame step assumed when there is no previous timestamp.
const FIRST_FRAME: f32 = 0.016;
/// Longest step fed to the engine, so a backgrounded tab does not jump.
const MAX_FRAME: f32 = 0.1;

/// Seconds between two `requestAnimationFrame` timestamps (milliseconds).
fn frame_dt(last: Option<f64>, now: f64) -> f32 {
	match last {
		Some(last) => (((now - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME),
		None => FIRST_FRAME,
	}
}

fn viewport_size(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		if let Some(window) = web_sys::window() {
			let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64());
			if let (Some(w), Some(h)) = (dim(window.inner_width()), dim(window.inner_height())) {
				return (w, h);
			}
		}
	}
	(
		width.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0)
		}),
	)
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Canvas view of a story graph driven by a shared [`GraphHandle`].
///
/// The page keeps the handle to change hop level and filters; node and
/// background events come back through the callback props.
#[component]
pub fn ForceGraphCanvas(
	/// Snapshot to draw; a new value re-renders the graph.
	#[prop(into)]
	data: Signal<GraphData>,
	/// Engine shared with the page.
	engine: GraphHandle,
	/// Size the canvas to the window instead of its parent.
	#[prop(default = false)]
	fullscreen: bool,
	/// Fixed canvas width.
	#[prop(default = None)]
	width: Option<f64>,
	/// Fixed canvas height.
	#[prop(default = None)]
	height: Option<f64>,
	/// A node was clicked.
	#[prop(optional, into)]
	on_node_click: Option<Callback<GraphNode>>,
	/// The pointer entered a node, with canvas coordinates.
	#[prop(optional, into)]
	on_node_mouseover: Option<Callback<(GraphNode, f64, f64)>>,
	/// The pointer left the hovered node.
	#[prop(optional, into)]
	on_node_mouseout: Option<Callback<()>>,
	/// Empty canvas was clicked.
	#[prop(optional, into)]
	on_background_click: Option<Callback<()>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let animate: FrameClosure = Rc::new(RefCell::new(None));
	let resize_cb: ListenerClosure = Rc::new(RefCell::new(None));
	let (engine_init, animate_init, resize_cb_init) =
		(engine.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window): Option<Window> = web_sys::window() else {
			error!("no window, graph not rendered");
			return;
		};

		let (w, h) = viewport_size(&canvas, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let mut callbacks = GraphCallbacks::default();
		if let Some(cb) = on_node_click {
			callbacks = callbacks.on_node_click(move |node| cb.run(node.clone()));
		}
		if let Some(cb) = on_node_mouseover {
			callbacks = callbacks.on_node_mouseover(move |node, x, y| cb.run((node.clone(), x, y)));
		}
		if let Some(cb) = on_node_mouseout {
			callbacks = callbacks.on_node_mouseout(move || cb.run(()));
		}
		let graph = data.get();
		engine_init.with_mut(|e| {
			e.resize(w, h);
			if let Some(cb) = on_background_click {
				e.on_background_click(move || cb.run(()));
			}
			e.render(graph, callbacks);
		});
		info!("graph rendered at {w}x{h}");

		// Listeners and the frame loop survive snapshot changes.
		if animate_init.borrow().is_some() {
			return;
		}

		let (engine_resize, canvas_resize) = (engine_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = viewport_size(&canvas_resize, fullscreen, width, height);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			engine_resize.with_mut(|e| e.resize(nw, nh));
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let Ok(Some(ctx)) = canvas.get_context("2d") else {
			error!("2d canvas context unavailable");
			return;
		};
		let Ok(ctx) = ctx.dyn_into::<CanvasRenderingContext2d>() else {
			error!("2d canvas context has an unexpected type");
			return;
		};
		let (engine_anim, animate_inner) = (engine_init.clone(), animate_init.clone());
		let mut last_frame = None;
		*animate_init.borrow_mut() = Some(Closure::new(move |now: f64| {
			let dt = frame_dt(last_frame, now);
			last_frame = Some(now);
			engine_anim.with_mut(|e| {
				e.tick(dt);
				render::render(e, &ctx);
			});
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let engine_md = engine.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = pointer(canvas_ref, &ev) {
			engine_md.with_mut(|e| e.pointer_down(x, y));
		}
	};

	let engine_mm = engine.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = pointer(canvas_ref, &ev) {
			engine_mm.with_mut(|e| e.pointer_move(x, y));
		}
	};

	let engine_mu = engine.clone();
	let on_mouseup = move |_: MouseEvent| {
		engine_mu.run("click", |e| e.pointer_up());
	};

	let engine_ml = engine.clone();
	let on_mouseleave = move |_: MouseEvent| {
		engine_ml.with_mut(|e| e.pointer_leave());
	};

	let engine_wh = engine;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = pointer(canvas_ref, &ev) {
			engine_wh.with_mut(|e| e.wheel(x, y, ev.delta_y()));
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
