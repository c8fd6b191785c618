//! Boundary between the engine and the physics integrator.
//!
//! The engine only needs coordinates per snapshot index plus the ability to
//! pin a node while it is dragged. [`ForceLayout`] provides that on top of
//! the `force_graph` simulation.

use std::collections::HashSet;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};

use super::config::SimulationConfig;
use super::types::GraphNode;

/// Position provider driven by a per-frame tick.
///
/// Nodes are addressed by their index in the rendered snapshot.
pub trait LayoutAdapter {
	/// Seed a layout for `nodes` joined by `links` inside a viewport.
	fn build(
		nodes: &[GraphNode],
		links: &[(usize, usize)],
		viewport: (f64, f64),
		config: &SimulationConfig,
	) -> Self
	where
		Self: Sized;

	/// Advance the simulation by `dt` seconds. Pinned nodes do not move.
	fn tick(&mut self, dt: f32);

	/// Current world position of a node.
	fn position(&self, node: usize) -> Option<(f64, f64)>;

	/// Fix a node at `(x, y)` until [`unpin`](Self::unpin).
	fn pin(&mut self, node: usize, x: f64, y: f64);

	/// Hand a pinned node back to the simulation.
	fn unpin(&mut self, node: usize);

	/// Whether the node is currently pinned.
	fn is_pinned(&self, node: usize) -> bool;

	/// Move the layout when the viewport center moves from `from` to `to`.
	fn recenter(&mut self, from: (f64, f64), to: (f64, f64));
}

/// [`LayoutAdapter`] backed by a `force_graph` simulation.
pub struct ForceLayout {
	graph: ForceGraph<usize, ()>,
	indices: Vec<DefaultNodeIdx>,
	positions: Vec<(f64, f64)>,
	pinned: Vec<bool>,
}

impl ForceLayout {
	fn sync_positions(&mut self) {
		let positions = &mut self.positions;
		self.graph.visit_nodes(|node| {
			if let Some(slot) = positions.get_mut(node.data.user_data) {
				*slot = (node.x() as f64, node.y() as f64);
			}
		});
	}

	fn with_node(&mut self, node: usize, f: impl Fn(&mut NodeData<usize>)) {
		let Some(&idx) = self.indices.get(node) else {
			return;
		};
		self.graph.visit_nodes_mut(|n| {
			if n.index() == idx {
				f(&mut n.data);
			}
		});
	}
}

impl LayoutAdapter for ForceLayout {
	fn build(
		nodes: &[GraphNode],
		links: &[(usize, usize)],
		viewport: (f64, f64),
		config: &SimulationConfig,
	) -> Self {
		let mut graph = ForceGraph::new(config.parameters());
		let (width, height) = viewport;
		let mut indices = Vec::with_capacity(nodes.len());
		let mut positions = Vec::with_capacity(nodes.len());

		for i in 0..nodes.len() {
			let angle = (i as f64) * 2.0 * PI / nodes.len() as f64;
			let (x, y) = (
				width / 2.0 + config.seed_radius * angle.cos(),
				height / 2.0 + config.seed_radius * angle.sin(),
			);
			indices.push(graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: config.node_mass,
				is_anchor: false,
				user_data: i,
			}));
			positions.push((x, y));
		}

		let mut seen = HashSet::new();
		for &(s, t) in links {
			let key = (s.min(t), s.max(t));
			if s == t || !seen.insert(key) {
				continue;
			}
			if let (Some(&src), Some(&tgt)) = (indices.get(s), indices.get(t)) {
				graph.add_edge(src, tgt, EdgeData::default());
			}
		}

		let mut layout = Self {
			graph,
			pinned: vec![false; indices.len()],
			indices,
			positions,
		};
		layout.sync_positions();
		layout
	}

	fn tick(&mut self, dt: f32) {
		if self.indices.is_empty() {
			return;
		}
		self.graph.update(dt);
		self.sync_positions();
	}

	fn position(&self, node: usize) -> Option<(f64, f64)> {
		self.positions.get(node).copied()
	}

	fn pin(&mut self, node: usize, x: f64, y: f64) {
		self.with_node(node, |data| {
			data.x = x as f32;
			data.y = y as f32;
			data.is_anchor = true;
		});
		if let Some(flag) = self.pinned.get_mut(node) {
			*flag = true;
			self.positions[node] = (x, y);
		}
	}

	fn unpin(&mut self, node: usize) {
		self.with_node(node, |data| data.is_anchor = false);
		if let Some(flag) = self.pinned.get_mut(node) {
			*flag = false;
		}
	}

	fn is_pinned(&self, node: usize) -> bool {
		self.pinned.get(node).copied().unwrap_or(false)
	}

	fn recenter(&mut self, from: (f64, f64), to: (f64, f64)) {
		let (dx, dy) = ((to.0 - from.0) as f32, (to.1 - from.1) as f32);
		self.graph.visit_nodes_mut(|n| {
			if !n.data.is_anchor {
				n.data.x += dx;
				n.data.y += dy;
			}
		});
		self.sync_positions();
	}
}
