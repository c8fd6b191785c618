//! Node visibility by iteration and connection count, cascaded to links.

use std::collections::HashMap;

use super::error::{EngineError, Result};
use super::types::{GraphLink, GraphNode};

/// Radius assigned to a node with `connections` links.
///
/// [`connections_from_size`] inverts this; the two must change together.
pub fn size_for_connections(connections: usize) -> f64 {
	connections as f64 * 3.0 + 10.0
}

/// Connection count recovered from a rendered node radius.
pub fn connections_from_size(size: f64) -> i64 {
	(size / 3.0 - 3.0).round() as i64
}

/// Active filter values. `None` on an axis means no filtering on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
	/// Keep only nodes whose `created_at` equals this.
	pub iteration: Option<i64>,
	/// Keep only nodes with at least this many connections.
	pub connections: Option<i64>,
}

impl FilterState {
	/// Whether either axis filters anything.
	pub fn is_active(&self) -> bool {
		self.iteration.is_some() || self.connections.is_some()
	}

	/// Whether `node` passes both axes.
	pub fn accepts(&self, node: &GraphNode) -> bool {
		if let Some(iteration) = self.iteration {
			if node.created_at() != Some(iteration) {
				return false;
			}
		}
		if let Some(min) = self.connections {
			if connections_from_size(node.size) < min {
				return false;
			}
		}
		true
	}
}

/// Visibility flags aligned with the node and link slices they came from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibilityMap {
	nodes: Vec<bool>,
	links: Vec<bool>,
}

impl VisibilityMap {
	/// Everything visible.
	pub fn all_visible(node_count: usize, link_count: usize) -> Self {
		Self {
			nodes: vec![true; node_count],
			links: vec![true; link_count],
		}
	}

	/// Visibility of the node at `index`. Out of range reads as visible.
	pub fn node(&self, index: usize) -> bool {
		self.nodes.get(index).copied().unwrap_or(true)
	}

	/// Visibility of the link at `index`. Out of range reads as visible.
	pub fn link(&self, index: usize) -> bool {
		self.links.get(index).copied().unwrap_or(true)
	}

	/// Number of visible nodes.
	pub fn visible_node_count(&self) -> usize {
		self.nodes.iter().filter(|&&v| v).count()
	}

	/// Number of visible links.
	pub fn visible_link_count(&self) -> usize {
		self.links.iter().filter(|&&v| v).count()
	}
}

/// Compute node visibility from `filters`, then link visibility from the
/// endpoints: a link is shown iff both endpoints are shown.
pub fn apply_filters(nodes: &[GraphNode], links: &[GraphLink], filters: &FilterState) -> VisibilityMap {
	let node_flags: Vec<bool> = nodes.iter().map(|n| filters.accepts(n)).collect();
	let by_id: HashMap<&str, bool> = nodes
		.iter()
		.zip(&node_flags)
		.map(|(n, &v)| (n.id.as_str(), v))
		.collect();
	let visible = |id: &str| by_id.get(id).copied().unwrap_or(false);
	let link_flags = links
		.iter()
		.map(|l| visible(&l.source) && visible(&l.target))
		.collect();

	VisibilityMap {
		nodes: node_flags,
		links: link_flags,
	}
}

/// Parse filter text the way a leading-integer parse would: surrounding
/// whitespace is skipped, an optional sign and the leading digits are read,
/// anything after them is ignored. No leading digits is an error.
pub fn parse_filter_input(text: &str) -> Result<i64> {
	let trimmed = text.trim_start();
	let (negative, rest) = match trimmed.as_bytes().first() {
		Some(b'-') => (true, &trimmed[1..]),
		Some(b'+') => (false, &trimmed[1..]),
		_ => (false, trimmed),
	};
	let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
	if digits_len == 0 {
		return Err(EngineError::InvalidFilterInput(text.to_string()));
	}
	let value: i64 = rest[..digits_len]
		.parse()
		.map_err(|_| EngineError::InvalidFilterInput(text.to_string()))?;
	Ok(if negative { -value } else { value })
}
