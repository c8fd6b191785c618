//! Interaction state: selection, hop level, filters, drag pins and the
//! viewport, wrapped around a layout and the rendered snapshot.
//!
//! Highlight and filter results are cached as per-element styles and only
//! recomputed on the events that change them. Layout ticks move positions
//! every frame without touching the styles.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};

use super::config::GraphConfig;
use super::error::{EngineError, Result};
use super::filter::{self, FilterState, VisibilityMap};
use super::geometry::{self, Transition, ViewTransform};
use super::highlight::{self, EdgeStyle, HopClassification, NodeStyle};
use super::layout::{ForceLayout, LayoutAdapter};
use super::types::GraphData;
use super::types::GraphNode;

type NodeCallback = Box<dyn FnMut(&GraphNode)>;
type HoverCallback = Box<dyn FnMut(&GraphNode, f64, f64)>;
type UnitCallback = Box<dyn FnMut()>;

/// Handlers the UI registers when rendering a snapshot.
#[derive(Default)]
pub struct GraphCallbacks {
	/// A node was clicked (press and release without dragging).
	pub on_node_click: Option<NodeCallback>,
	/// The pointer entered a node. Receives screen coordinates.
	pub on_node_mouseover: Option<HoverCallback>,
	/// The pointer left the hovered node.
	pub on_node_mouseout: Option<UnitCallback>,
}

impl GraphCallbacks {
	/// Set the node click handler.
	pub fn on_node_click(mut self, f: impl FnMut(&GraphNode) + 'static) -> Self {
		self.on_node_click = Some(Box::new(f));
		self
	}

	/// Set the hover-enter handler.
	pub fn on_node_mouseover(mut self, f: impl FnMut(&GraphNode, f64, f64) + 'static) -> Self {
		self.on_node_mouseover = Some(Box::new(f));
		self
	}

	/// Set the hover-leave handler.
	pub fn on_node_mouseout(mut self, f: impl FnMut() + 'static) -> Self {
		self.on_node_mouseout = Some(Box::new(f));
		self
	}
}

/// Which node, if any, the neighborhood view is built around.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
	/// No node selected; nothing highlighted.
	Idle,
	/// `id` is selected and highlighted out to `hop_level` hops.
	NodeSelected {
		/// Selected node id.
		id: String,
		/// Current hop level.
		hop_level: u32,
	},
}

/// Tracks an in-progress node drag.
#[derive(Clone, Debug)]
struct DragState {
	node: usize,
	/// Node position minus pointer position, in world units.
	grab_offset: (f64, f64),
	press: (f64, f64),
	moved: bool,
}

/// Tracks an in-progress canvas pan.
#[derive(Clone, Debug)]
struct PanState {
	press: (f64, f64),
	transform_start: ViewTransform,
	moved: bool,
}

/// Rendered snapshot with its ids resolved to indices.
struct Scene<L> {
	data: GraphData,
	index: HashMap<String, usize>,
	links: Vec<(usize, usize)>,
	layout: L,
}

impl<L: LayoutAdapter> Scene<L> {
	fn build(mut data: GraphData, viewport: (f64, f64), config: &GraphConfig) -> Self {
		let mut index = HashMap::new();
		data.nodes.retain(|node| {
			if index.contains_key(&node.id) {
				warn!("duplicate node id {:?} dropped", node.id);
				return false;
			}
			index.insert(node.id.clone(), index.len());
			true
		});

		let mut links = Vec::with_capacity(data.links.len());
		data.links.retain(|link| match (index.get(&link.source), index.get(&link.target)) {
			(Some(&s), Some(&t)) => {
				links.push((s, t));
				true
			}
			_ => {
				warn!("link {} -> {} references a missing node, dropped", link.source, link.target);
				false
			}
		});

		let layout = L::build(&data.nodes, &links, viewport, &config.simulation);
		Self {
			data,
			index,
			links,
			layout,
		}
	}
}

/// The interactive graph engine.
///
/// Starts unrendered; [`render`](Self::render) installs a snapshot. Every
/// operation that names a node validates it first and leaves the state
/// untouched when it fails.
pub struct GraphEngine<L: LayoutAdapter = ForceLayout> {
	config: GraphConfig,
	scene: Option<Scene<L>>,
	callbacks: GraphCallbacks,
	background_click: Option<UnitCallback>,
	selected: Option<String>,
	hop_level: u32,
	filters: FilterState,
	highlight: HopClassification,
	visibility: VisibilityMap,
	node_styles: Vec<NodeStyle>,
	link_styles: Vec<EdgeStyle>,
	transform: ViewTransform,
	transition: Option<Transition>,
	drag: Option<DragState>,
	pan: Option<PanState>,
	hovered: Option<usize>,
	width: f64,
	height: f64,
}

impl<L: LayoutAdapter> Default for GraphEngine<L> {
	fn default() -> Self {
		Self::new(GraphConfig::default(), 0.0, 0.0)
	}
}

impl<L: LayoutAdapter> GraphEngine<L> {
	/// Unrendered engine for a `width` x `height` viewport.
	pub fn new(config: GraphConfig, width: f64, height: f64) -> Self {
		Self {
			hop_level: config.default_hop_level.max(1),
			config,
			scene: None,
			callbacks: GraphCallbacks::default(),
			background_click: None,
			selected: None,
			filters: FilterState::default(),
			highlight: HopClassification::default(),
			visibility: VisibilityMap::default(),
			node_styles: Vec::new(),
			link_styles: Vec::new(),
			transform: ViewTransform::IDENTITY,
			transition: None,
			drag: None,
			pan: None,
			hovered: None,
			width,
			height,
		}
	}

	/// Install a snapshot, replacing any previous one.
	///
	/// Duplicate node ids and links to unknown nodes are dropped with a
	/// warning. Selection and highlight reset; hop level and filters carry
	/// over and are applied to the new snapshot.
	pub fn render(&mut self, data: GraphData, callbacks: GraphCallbacks) {
		self.set_hover(None, 0.0, 0.0);
		let scene = Scene::build(data, (self.width, self.height), &self.config);
		debug!(
			"rendering {} nodes, {} links",
			scene.data.nodes.len(),
			scene.links.len()
		);
		self.scene = Some(scene);
		self.callbacks = callbacks;
		self.selected = None;
		self.highlight = HopClassification::default();
		self.transform = ViewTransform::IDENTITY;
		self.transition = None;
		self.drag = None;
		self.pan = None;
		self.refilter();
		self.restyle();
	}

	/// Whether a snapshot has been rendered.
	pub fn is_rendered(&self) -> bool {
		self.scene.is_some()
	}

	/// The rendered snapshot.
	pub fn data(&self) -> Option<&GraphData> {
		self.scene.as_ref().map(|s| &s.data)
	}

	/// Snapshot index of a node id.
	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.scene.as_ref()?.index.get(id).copied()
	}

	/// Resolved link endpoints, aligned with `data().links`.
	pub fn link_endpoints(&self) -> &[(usize, usize)] {
		self.scene.as_ref().map_or(&[], |s| s.links.as_slice())
	}

	/// World position of the node at snapshot index `node`.
	pub fn position(&self, node: usize) -> Option<(f64, f64)> {
		self.scene.as_ref()?.layout.position(node)
	}

	/// Whether the node is held in place by a drag.
	pub fn is_pinned(&self, node: usize) -> bool {
		self.scene.as_ref().is_some_and(|s| s.layout.is_pinned(node))
	}

	/// Configuration the engine was built with.
	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	/// Current selection state.
	pub fn selection(&self) -> Selection {
		match &self.selected {
			Some(id) => Selection::NodeSelected {
				id: id.clone(),
				hop_level: self.hop_level,
			},
			None => Selection::Idle,
		}
	}

	/// Id of the selected node, if any.
	pub fn selected_id(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	/// Hop level applied to selections.
	pub fn hop_level(&self) -> u32 {
		self.hop_level
	}

	/// Active filter values.
	pub fn filters(&self) -> FilterState {
		self.filters
	}

	/// Hop classification of the current highlight.
	pub fn highlight(&self) -> &HopClassification {
		&self.highlight
	}

	/// Visibility under the active filters.
	pub fn visibility(&self) -> &VisibilityMap {
		&self.visibility
	}

	/// Cached style of the node at index `node`.
	pub fn node_style(&self, node: usize) -> NodeStyle {
		self.node_styles.get(node).copied().unwrap_or(NodeStyle::Normal)
	}

	/// Cached style of the link at index `link`.
	pub fn link_style(&self, link: usize) -> EdgeStyle {
		self.link_styles.get(link).copied().unwrap_or(EdgeStyle::Normal)
	}

	/// World to screen transform for this frame.
	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	/// Whether a centering transition is in flight.
	pub fn is_transitioning(&self) -> bool {
		self.transition.is_some()
	}

	/// Viewport size in screen pixels.
	pub fn viewport(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	/// Index of the node under the pointer.
	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	/// Id of the node being dragged.
	pub fn dragging(&self) -> Option<&str> {
		let drag = self.drag.as_ref()?;
		let scene = self.scene.as_ref()?;
		scene.data.nodes.get(drag.node).map(|n| n.id.as_str())
	}

	fn scene(&self) -> Result<&Scene<L>> {
		self.scene.as_ref().ok_or(EngineError::UninitializedEngine)
	}

	fn require_node(&self, id: &str) -> Result<usize> {
		self.scene()?
			.index
			.get(id)
			.copied()
			.ok_or_else(|| EngineError::MissingNode(id.to_string()))
	}

	fn refilter(&mut self) {
		self.visibility = match &self.scene {
			Some(scene) => filter::apply_filters(&scene.data.nodes, &scene.data.links, &self.filters),
			None => VisibilityMap::default(),
		};
	}

	fn restyle(&mut self) {
		let Some(scene) = &self.scene else {
			self.node_styles.clear();
			self.link_styles.clear();
			return;
		};
		self.node_styles = scene
			.data
			.nodes
			.iter()
			.map(|n| self.highlight.node_style(&n.id))
			.collect();
		self.link_styles = scene
			.data
			.links
			.iter()
			.map(|l| self.highlight.link_style(l))
			.collect();
	}

	// --- Selection ----------------------------------------------------

	/// Select `id`, classify its neighborhood out to `max_hops` and center
	/// the viewport on it.
	pub fn highlight_nodes_multi_hop(&mut self, id: &str, max_hops: u32) -> Result<()> {
		self.require_node(id)?;
		self.center_on_node(id)?;
		let scene = self.scene()?;
		let hops = highlight::compute_hops(&scene.data.nodes, &scene.data.links, id, max_hops);
		debug!("highlight {id}: {} nodes within {max_hops} hops", hops.len());
		self.highlight = hops;
		self.selected = Some(id.to_string());
		self.restyle();
		Ok(())
	}

	/// Drop every hop style. Selection is not changed.
	pub fn clear_all_highlights(&mut self) {
		self.highlight = HopClassification::default();
		self.restyle();
	}

	/// Select `id` and highlight it at the current hop level.
	///
	/// Used for search picks; a click goes through [`click_node`](Self::click_node).
	pub fn select_node(&mut self, id: &str) -> Result<()> {
		self.highlight_nodes_multi_hop(id, self.hop_level)
	}

	/// Select a clicked node and notify `on_node_click`. Clicking the
	/// selected node again re-runs the highlight.
	pub fn click_node(&mut self, id: &str) -> Result<()> {
		self.select_node(id)?;
		let index = self.require_node(id)?;
		if let (Some(cb), Some(scene)) = (self.callbacks.on_node_click.as_mut(), &self.scene) {
			cb(&scene.data.nodes[index]);
		}
		Ok(())
	}

	/// Back to `Idle`: clear highlight and selection, then notify the
	/// background click handler.
	pub fn click_background(&mut self) {
		debug!("background click, selection cleared");
		self.clear_all_highlights();
		self.selected = None;
		if let Some(cb) = self.background_click.as_mut() {
			cb();
		}
	}

	/// Register the handler run after a background click.
	pub fn on_background_click(&mut self, f: impl FnMut() + 'static) {
		self.background_click = Some(Box::new(f));
	}

	/// Change the hop level, re-highlighting the current selection.
	pub fn set_hop_level(&mut self, hop_level: u32) -> Result<()> {
		if hop_level < 1 {
			return Err(EngineError::InvalidHopLevel(hop_level));
		}
		self.hop_level = hop_level;
		match self.selected.clone() {
			Some(id) => self.highlight_nodes_multi_hop(&id, hop_level),
			None => Ok(()),
		}
	}

	// --- Filters ------------------------------------------------------

	/// Set both filter axes and recompute visibility.
	///
	/// Refused with `UninitializedEngine` while nothing is rendered; the
	/// stored filters are left as they were.
	pub fn apply_filters(&mut self, iteration: Option<i64>, connections: Option<i64>) -> Result<()> {
		self.scene()?;
		self.filters = FilterState {
			iteration,
			connections,
		};
		self.refilter();
		debug!(
			"filters {:?}: {} nodes visible",
			self.filters,
			self.visibility.visible_node_count()
		);
		Ok(())
	}

	/// Parse and set the iteration filter. Invalid text keeps the old value.
	pub fn set_iteration_filter(&mut self, text: &str) -> Result<()> {
		let value = filter::parse_filter_input(text)?;
		self.apply_filters(Some(value), self.filters.connections)
	}

	/// Drop the iteration filter, keeping the connection filter.
	pub fn clear_iteration_filter(&mut self) -> Result<()> {
		self.apply_filters(None, self.filters.connections)
	}

	/// Parse and set the connection filter. Invalid text keeps the old value.
	pub fn set_connection_filter(&mut self, text: &str) -> Result<()> {
		let value = filter::parse_filter_input(text)?;
		self.apply_filters(self.filters.iteration, Some(value))
	}

	/// Drop the connection filter, keeping the iteration filter.
	pub fn clear_connection_filter(&mut self) -> Result<()> {
		self.apply_filters(self.filters.iteration, None)
	}

	// --- Viewport -----------------------------------------------------

	/// Start an eased pan that brings `id` to the viewport center at the
	/// current zoom. Replaces any transition already running.
	pub fn center_on_node(&mut self, id: &str) -> Result<()> {
		let index = self.require_node(id)?;
		let position = self
			.position(index)
			.ok_or_else(|| EngineError::MissingNode(id.to_string()))?;
		let target = geometry::center_on(position, (self.width, self.height), self.transform.k);
		self.transition = Some(Transition::new(
			self.transform,
			target,
			self.config.center_duration,
		));
		Ok(())
	}

	/// New viewport size; the layout follows the viewport center.
	pub fn resize(&mut self, width: f64, height: f64) {
		let from = (self.width / 2.0, self.height / 2.0);
		self.width = width;
		self.height = height;
		if let Some(scene) = self.scene.as_mut() {
			scene.layout.recenter(from, (width / 2.0, height / 2.0));
		}
	}

	/// Zoom one wheel notch about the screen point `(sx, sy)`.
	/// A zero vertical delta (horizontal scroll) is ignored.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		if delta_y == 0.0 {
			return;
		}
		let factor = if delta_y > 0.0 {
			1.0 / self.config.zoom_step
		} else {
			self.config.zoom_step
		};
		self.transition = None;
		self.transform =
			self.transform
				.zoom_about(sx, sy, factor, self.config.min_zoom, self.config.max_zoom);
	}

	/// Advance layout and any running transition by `dt` seconds.
	pub fn tick(&mut self, dt: f32) {
		if let Some(scene) = self.scene.as_mut() {
			scene.layout.tick(dt);
		}
		if let Some(transition) = self.transition.as_mut() {
			self.transform = transition.advance(dt as f64);
			if transition.is_finished() {
				self.transition = None;
			}
		}
	}

	// --- Drag ---------------------------------------------------------

	/// Pin `id` where it currently is. Selection is not touched.
	pub fn drag_start(&mut self, id: &str) -> Result<()> {
		let index = self.require_node(id)?;
		let Some(position) = self.position(index) else {
			return Err(EngineError::MissingNode(id.to_string()));
		};
		self.begin_drag(index, position, position);
		Ok(())
	}

	/// Move the pin of the dragged node to world point `(x, y)`.
	pub fn drag_to(&mut self, x: f64, y: f64) {
		let Some(drag) = self.drag.as_ref() else {
			return;
		};
		let (node, (ox, oy)) = (drag.node, drag.grab_offset);
		if let Some(scene) = self.scene.as_mut() {
			scene.layout.pin(node, x + ox, y + oy);
		}
	}

	/// Release the dragged node back to the simulation.
	pub fn drag_end(&mut self) {
		if let (Some(drag), Some(scene)) = (self.drag.take(), self.scene.as_mut()) {
			scene.layout.unpin(drag.node);
		}
	}

	fn begin_drag(&mut self, node: usize, position: (f64, f64), pointer: (f64, f64)) {
		if let Some(scene) = self.scene.as_mut() {
			scene.layout.pin(node, position.0, position.1);
		}
		self.drag = Some(DragState {
			node,
			grab_offset: (position.0 - pointer.0, position.1 - pointer.1),
			press: self.transform.apply(pointer.0, pointer.1),
			moved: false,
		});
	}

	// --- Pointer ------------------------------------------------------

	/// Topmost visible node under the screen point `(sx, sy)`.
	pub fn node_at(&self, sx: f64, sy: f64) -> Option<usize> {
		let scene = self.scene.as_ref()?;
		let (gx, gy) = self.transform.invert(sx, sy);
		(0..scene.data.nodes.len()).rev().find(|&i| {
			if !self.visibility.node(i) {
				return false;
			}
			let Some((x, y)) = scene.layout.position(i) else {
				return false;
			};
			let (dx, dy) = (x - gx, y - gy);
			(dx * dx + dy * dy).sqrt() < scene.data.nodes[i].size
		})
	}

	/// Press at screen point `(sx, sy)`: grabs a node or starts a pan.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		let pointer = self.transform.invert(sx, sy);
		match self.node_at(sx, sy) {
			Some(node) => {
				let position = self.position(node).unwrap_or(pointer);
				self.begin_drag(node, position, pointer);
			}
			None => {
				self.transition = None;
				self.pan = Some(PanState {
					press: (sx, sy),
					transform_start: self.transform,
					moved: false,
				});
			}
		}
	}

	/// Pointer motion: drags, pans or updates hover.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		let tolerance = self.config.click_tolerance;
		let beyond = |press: (f64, f64)| (sx - press.0).hypot(sy - press.1) > tolerance;

		if let Some(drag) = self.drag.as_mut() {
			drag.moved |= beyond(drag.press);
			let (x, y) = self.transform.invert(sx, sy);
			self.drag_to(x, y);
		} else if let Some(pan) = self.pan.as_mut() {
			pan.moved |= beyond(pan.press);
			self.transform = ViewTransform {
				x: pan.transform_start.x + (sx - pan.press.0),
				y: pan.transform_start.y + (sy - pan.press.1),
				k: pan.transform_start.k,
			};
		} else {
			let hovered = self.node_at(sx, sy);
			self.set_hover(hovered, sx, sy);
		}
	}

	/// Finish a gesture. A press that did not travel counts as a click.
	pub fn pointer_up(&mut self) -> Result<()> {
		if let Some(pan) = self.pan.take() {
			if !pan.moved {
				self.click_background();
			}
			return Ok(());
		}
		let Some(drag) = self.drag.clone() else {
			return Ok(());
		};
		self.drag_end();
		if drag.moved {
			return Ok(());
		}
		let id = self
			.scene()?
			.data
			.nodes
			.get(drag.node)
			.map(|n| n.id.clone())
			.ok_or(EngineError::UninitializedEngine)?;
		self.click_node(&id)
	}

	/// The pointer left the canvas: abandon gestures without clicking.
	pub fn pointer_leave(&mut self) {
		self.drag_end();
		self.pan = None;
		self.set_hover(None, 0.0, 0.0);
	}

	fn set_hover(&mut self, node: Option<usize>, sx: f64, sy: f64) {
		if self.hovered == node {
			return;
		}
		if self.hovered.take().is_some() {
			if let Some(cb) = self.callbacks.on_node_mouseout.as_mut() {
				cb();
			}
		}
		self.hovered = node;
		if let (Some(i), Some(cb), Some(scene)) =
			(node, self.callbacks.on_node_mouseover.as_mut(), &self.scene)
		{
			cb(&scene.data.nodes[i], sx, sy);
		}
	}
}

/// Shared handle the UI layer holds on the engine.
///
/// Everything runs on the browser's single thread, so a `RefCell` suffices.
/// Callbacks invoked by the engine must not borrow the handle again.
#[derive(Clone, Default)]
pub struct GraphHandle(Rc<RefCell<GraphEngine>>);

impl GraphHandle {
	/// Handle on a fresh, unrendered engine.
	pub fn new(config: GraphConfig) -> Self {
		Self(Rc::new(RefCell::new(GraphEngine::new(config, 0.0, 0.0))))
	}

	/// Borrow the engine.
	pub fn with<R>(&self, f: impl FnOnce(&GraphEngine) -> R) -> R {
		f(&self.0.borrow())
	}

	/// Borrow the engine mutably.
	pub fn with_mut<R>(&self, f: impl FnOnce(&mut GraphEngine) -> R) -> R {
		f(&mut self.0.borrow_mut())
	}

	/// Run a fallible engine operation, logging a rejection instead of
	/// propagating it.
	pub fn run(&self, action: &str, f: impl FnOnce(&mut GraphEngine) -> Result<()>) {
		if let Err(e) = self.with_mut(f) {
			warn!("{action} ignored: {e}");
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::config::SimulationConfig;
	use crate::components::force_graph::filter::size_for_connections;
	use crate::components::force_graph::types::{GraphLink, NodeType};
	use pretty_assertions::assert_eq;
	use serde_json::json;
	use std::cell::Cell;

	/// Layout that puts node `i` at `(i * 100, 0)` and drifts every free
	/// node one unit right per tick.
	struct LineLayout {
		positions: Vec<(f64, f64)>,
		pinned: Vec<bool>,
	}

	impl LayoutAdapter for LineLayout {
		fn build(nodes: &[GraphNode], _: &[(usize, usize)], _: (f64, f64), _: &SimulationConfig) -> Self {
			Self {
				positions: (0..nodes.len()).map(|i| (i as f64 * 100.0, 0.0)).collect(),
				pinned: vec![false; nodes.len()],
			}
		}

		fn tick(&mut self, _: f32) {
			for (p, &pinned) in self.positions.iter_mut().zip(&self.pinned) {
				if !pinned {
					p.0 += 1.0;
				}
			}
		}

		fn position(&self, node: usize) -> Option<(f64, f64)> {
			self.positions.get(node).copied()
		}

		fn pin(&mut self, node: usize, x: f64, y: f64) {
			self.positions[node] = (x, y);
			self.pinned[node] = true;
		}

		fn unpin(&mut self, node: usize) {
			self.pinned[node] = false;
		}

		fn is_pinned(&self, node: usize) -> bool {
			self.pinned[node]
		}

		fn recenter(&mut self, _: (f64, f64), _: (f64, f64)) {}
	}

	fn node(id: &str, created_at: i64, connections: usize) -> GraphNode {
		GraphNode {
			id: id.into(),
			name: id.into(),
			node_type: NodeType::Character,
			size: size_for_connections(connections),
			color: NodeType::Character.color().into(),
			data: json!({ "created_at": created_at })
				.as_object()
				.cloned()
				.unwrap_or_default(),
		}
	}

	/// A - B - C - D with iterations 1, 2, 2, 3.
	fn chain() -> GraphData {
		GraphData {
			nodes: vec![node("A", 1, 1), node("B", 2, 2), node("C", 2, 2), node("D", 3, 1)],
			links: vec![
				GraphLink::new("A", "B"),
				GraphLink::new("B", "C"),
				GraphLink::new("C", "D"),
			],
			topic: None,
		}
	}

	fn engine() -> GraphEngine<LineLayout> {
		let mut engine = GraphEngine::new(GraphConfig::default(), 800.0, 600.0);
		engine.render(chain(), GraphCallbacks::default());
		engine
	}

	#[test]
	fn starts_idle_with_default_hop_level() {
		let engine = engine();
		assert_eq!(engine.selection(), Selection::Idle);
		assert_eq!(engine.hop_level(), 1);
		assert_eq!(engine.node_style(0), NodeStyle::Normal);
	}

	#[test]
	fn click_selects_and_highlights() {
		let mut engine = engine();
		engine.click_node("B").unwrap();

		assert_eq!(
			engine.selection(),
			Selection::NodeSelected {
				id: "B".into(),
				hop_level: 1
			}
		);
		let styles: Vec<_> = (0..4).map(|i| engine.node_style(i)).collect();
		assert_eq!(
			styles,
			vec![
				NodeStyle::Tier(1),
				NodeStyle::Selected,
				NodeStyle::Tier(1),
				NodeStyle::Dimmed
			]
		);
		assert_eq!(engine.link_style(2), EdgeStyle::Dimmed);
	}

	#[test]
	fn clicking_selected_node_keeps_it_selected() {
		let mut engine = engine();
		engine.click_node("B").unwrap();
		engine.click_node("B").unwrap();
		assert_eq!(engine.selected_id(), Some("B"));
		assert_eq!(engine.node_style(1), NodeStyle::Selected);
	}

	#[test]
	fn hop_change_rehighlights_without_changing_selection() {
		let mut engine = engine();
		engine.click_node("B").unwrap();
		engine.set_hop_level(2).unwrap();

		assert_eq!(engine.selected_id(), Some("B"));
		assert_eq!(engine.node_style(3), NodeStyle::Tier(2));
		assert!((0..3).all(|i| engine.link_style(i) == EdgeStyle::Highlighted));
	}

	#[test]
	fn highlighting_another_node_moves_the_selection() {
		let mut engine = engine();
		engine.select_node("A").unwrap();
		engine.highlight_nodes_multi_hop("D", 1).unwrap();
		assert_eq!(engine.selected_id(), Some("D"));
		assert_eq!(engine.node_style(3), NodeStyle::Selected);

		engine.set_hop_level(2).unwrap();
		assert_eq!(engine.highlight().selected(), Some("D"));
		assert_eq!(engine.selected_id(), engine.highlight().selected());
		assert_eq!(engine.node_style(1), NodeStyle::Tier(2));
		assert_eq!(engine.node_style(0), NodeStyle::Dimmed);
	}

	#[test]
	fn hop_change_while_idle_only_stores_level() {
		let mut engine = engine();
		engine.set_hop_level(3).unwrap();
		assert_eq!(engine.selection(), Selection::Idle);
		assert!(engine.highlight().is_empty());
		assert_eq!(engine.set_hop_level(0), Err(EngineError::InvalidHopLevel(0)));
		assert_eq!(engine.hop_level(), 3);
	}

	#[test]
	fn background_click_returns_to_idle() {
		let mut engine = engine();
		let fired = Rc::new(Cell::new(0));
		let counter = fired.clone();
		engine.on_background_click(move || counter.set(counter.get() + 1));

		engine.click_node("A").unwrap();
		engine.click_background();

		assert_eq!(engine.selection(), Selection::Idle);
		assert!(engine.highlight().is_empty());
		assert_eq!(engine.node_style(3), NodeStyle::Normal);
		assert_eq!(fired.get(), 1);
	}

	#[test]
	fn missing_node_leaves_state_intact() {
		let mut engine = engine();
		engine.click_node("B").unwrap();
		let before = engine.highlight().clone();

		assert_eq!(
			engine.click_node("nope"),
			Err(EngineError::MissingNode("nope".into()))
		);
		assert_eq!(
			engine.center_on_node("nope"),
			Err(EngineError::MissingNode("nope".into()))
		);
		assert_eq!(engine.selected_id(), Some("B"));
		assert_eq!(engine.highlight(), &before);
	}

	#[test]
	fn unrendered_engine_refuses_work() {
		let mut engine: GraphEngine<LineLayout> = GraphEngine::default();
		assert_eq!(
			engine.highlight_nodes_multi_hop("A", 1),
			Err(EngineError::UninitializedEngine)
		);
		assert_eq!(engine.apply_filters(Some(2), None), Err(EngineError::UninitializedEngine));
		assert_eq!(engine.filters(), FilterState::default());
		assert_eq!(engine.selection(), Selection::Idle);

		engine.render(chain(), GraphCallbacks::default());
		assert_eq!(engine.visibility().visible_node_count(), 4);
	}

	#[test]
	fn filters_compose_with_highlight() {
		let mut engine = engine();
		engine.click_node("B").unwrap();
		engine.set_iteration_filter("2").unwrap();

		assert_eq!(engine.selected_id(), Some("B"));
		assert!(!engine.visibility().node(0));
		// Still classified as hop 1, just not present.
		assert_eq!(engine.node_style(0), NodeStyle::Tier(1));
		assert!(!engine.visibility().link(0));
		assert!(engine.visibility().link(1));
	}

	#[test]
	fn filter_axes_clear_independently() {
		let mut engine = engine();
		engine.set_iteration_filter("2").unwrap();
		engine.set_connection_filter("2").unwrap();
		assert_eq!(
			engine.filters(),
			FilterState {
				iteration: Some(2),
				connections: Some(2)
			}
		);

		engine.clear_iteration_filter().unwrap();
		assert_eq!(engine.filters().iteration, None);
		assert_eq!(engine.filters().connections, Some(2));
		assert_eq!(engine.visibility().visible_node_count(), 2);

		engine.clear_connection_filter().unwrap();
		assert_eq!(engine.visibility().visible_node_count(), 4);
	}

	#[test]
	fn invalid_filter_text_keeps_previous_value() {
		let mut engine = engine();
		engine.set_iteration_filter("3").unwrap();
		assert_eq!(
			engine.set_iteration_filter("three"),
			Err(EngineError::InvalidFilterInput("three".into()))
		);
		assert_eq!(engine.filters().iteration, Some(3));
		assert_eq!(engine.visibility().visible_node_count(), 1);
	}

	#[test]
	fn selecting_centers_with_a_transition() {
		let mut engine = engine();
		engine.select_node("C").unwrap();
		assert!(engine.is_transitioning());

		for _ in 0..100 {
			engine.tick(0.016);
		}
		assert!(!engine.is_transitioning());
		// C drifted with the layout while the transition ran; the target was
		// computed from where it stood when selected.
		let t = engine.transform();
		assert_eq!(t.k, 1.0);
		assert_eq!((t.x, t.y), (400.0 - 200.0, 300.0));
	}

	#[test]
	fn newer_centering_supersedes_older() {
		let mut engine = engine();
		engine.select_node("A").unwrap();
		engine.tick(0.1);
		engine.select_node("D").unwrap();
		let target = engine.transition.as_ref().map(Transition::target);
		let d = engine.position(3).unwrap();
		assert_eq!(target, Some(geometry::center_on(d, (800.0, 600.0), 1.0)));
	}

	#[test]
	fn drag_pins_then_releases() {
		let mut engine = engine();
		engine.click_node("B").unwrap();

		engine.drag_start("A").unwrap();
		assert_eq!(engine.dragging(), Some("A"));
		engine.drag_to(50.0, 50.0);
		engine.tick(0.016);
		assert_eq!(engine.position(0), Some((50.0, 50.0)));
		assert!(engine.is_pinned(0));

		engine.drag_end();
		engine.tick(0.016);
		assert!(!engine.is_pinned(0));
		assert_eq!(engine.position(0), Some((51.0, 50.0)));
		assert_eq!(engine.selected_id(), Some("B"));
		assert_eq!(engine.dragging(), None);
	}

	#[test]
	fn press_and_release_on_node_is_a_click() {
		let mut engine = engine();
		let clicked = Rc::new(RefCell::new(Vec::new()));
		let sink = clicked.clone();
		engine.render(
			chain(),
			GraphCallbacks::default().on_node_click(move |n| sink.borrow_mut().push(n.id.clone())),
		);

		// Node C sits at world (200, 0); identity transform.
		engine.pointer_down(202.0, 1.0);
		engine.pointer_up().unwrap();

		assert_eq!(clicked.borrow().as_slice(), ["C".to_string()]);
		assert_eq!(engine.selected_id(), Some("C"));
		assert!(!engine.is_pinned(2));
	}

	#[test]
	fn dragging_a_node_does_not_click_it() {
		let mut engine = engine();
		engine.pointer_down(200.0, 0.0);
		engine.pointer_move(240.0, 30.0);
		assert_eq!(engine.position(2), Some((240.0, 30.0)));
		engine.pointer_up().unwrap();

		assert_eq!(engine.selection(), Selection::Idle);
		assert!(!engine.is_pinned(2));
	}

	#[test]
	fn background_press_pans_or_clicks() {
		let mut engine = engine();
		engine.click_node("A").unwrap();

		engine.pointer_down(500.0, 500.0);
		engine.pointer_move(520.0, 490.0);
		engine.pointer_up().unwrap();
		assert_eq!(engine.selected_id(), Some("A"));
		assert!(!engine.is_transitioning());
		assert_eq!((engine.transform().x, engine.transform().y), (20.0, -10.0));

		engine.pointer_down(500.0, 500.0);
		engine.pointer_up().unwrap();
		assert_eq!(engine.selection(), Selection::Idle);
	}

	#[test]
	fn hidden_nodes_cannot_be_hit() {
		let mut engine = engine();
		assert_eq!(engine.node_at(0.0, 0.0), Some(0));
		engine.set_iteration_filter("2").unwrap();
		assert_eq!(engine.node_at(0.0, 0.0), None);
	}

	#[test]
	fn hover_reports_enter_and_leave() {
		let mut engine = engine();
		let log = Rc::new(RefCell::new(Vec::new()));
		let (over, out) = (log.clone(), log.clone());
		engine.render(
			chain(),
			GraphCallbacks::default()
				.on_node_mouseover(move |n, _, _| over.borrow_mut().push(format!("over {}", n.id)))
				.on_node_mouseout(move || out.borrow_mut().push("out".to_string())),
		);

		engine.pointer_move(100.0, 0.0);
		engine.pointer_move(101.0, 0.0);
		engine.pointer_move(300.0, 0.0);
		engine.pointer_move(600.0, 300.0);

		assert_eq!(
			log.borrow().as_slice(),
			["over B", "out", "over D", "out"].map(String::from)
		);
	}

	#[test]
	fn rerender_ends_hover() {
		let mut engine = engine();
		let outs = Rc::new(Cell::new(0));
		let counter = outs.clone();
		engine.render(
			chain(),
			GraphCallbacks::default().on_node_mouseout(move || counter.set(counter.get() + 1)),
		);
		engine.pointer_move(100.0, 0.0);
		assert_eq!(engine.hovered(), Some(1));

		engine.render(chain(), GraphCallbacks::default());
		assert_eq!(engine.hovered(), None);
		assert_eq!(outs.get(), 1);
	}

	#[test]
	fn wheel_zoom_cancels_transition_and_clamps() {
		let mut engine = engine();
		engine.select_node("D").unwrap();
		engine.wheel(400.0, 300.0, -1.0);
		assert!(!engine.is_transitioning());
		assert!((engine.transform().k - 1.1).abs() < 1e-9);

		for _ in 0..100 {
			engine.wheel(0.0, 0.0, 1.0);
		}
		assert!((engine.transform().k - 0.1).abs() < 1e-9);
	}

	#[test]
	fn horizontal_scroll_does_not_zoom() {
		let mut engine = engine();
		engine.select_node("D").unwrap();
		engine.wheel(400.0, 300.0, 0.0);
		assert_eq!(engine.transform(), ViewTransform::IDENTITY);
		assert!(engine.is_transitioning());
	}

	#[test]
	fn render_drops_dangling_links_and_duplicates() {
		let mut data = chain();
		data.nodes.push(node("A", 9, 0));
		data.links.push(GraphLink::new("A", "ghost"));
		let mut engine: GraphEngine<LineLayout> = GraphEngine::new(GraphConfig::default(), 800.0, 600.0);
		engine.render(data, GraphCallbacks::default());

		let rendered = engine.data().unwrap();
		assert_eq!(rendered.nodes.len(), 4);
		assert_eq!(rendered.links.len(), 3);
		assert_eq!(engine.link_endpoints(), &[(0, 1), (1, 2), (2, 3)]);
	}

	#[test]
	fn rerender_resets_selection_keeps_hop_level() {
		let mut engine = engine();
		engine.set_hop_level(2).unwrap();
		engine.click_node("B").unwrap();
		engine.render(chain(), GraphCallbacks::default());

		assert_eq!(engine.selection(), Selection::Idle);
		assert_eq!(engine.hop_level(), 2);
	}
}
