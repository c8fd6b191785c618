//! Multi-hop neighborhood classification around a selected node.
//!
//! [`compute_hops`] is a pure function of the snapshot; the engine keeps the
//! resulting [`HopClassification`] and maps it to per-element styles only
//! when the selection or hop level changes.

use std::collections::HashMap;

use super::types::{GraphLink, GraphNode};

/// Hops beyond this still count as highlighted but share one style.
pub const MAX_HOP_TIER: u32 = 5;

/// Visual role of a node with respect to the current selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeStyle {
	/// Nothing is selected.
	Normal,
	/// The selected node itself.
	Selected,
	/// Reached at this hop, `1..=MAX_HOP_TIER`.
	Tier(u32),
	/// Reached further out than the last tier.
	Reached,
	/// Not reachable within the hop limit.
	Dimmed,
}

/// Visual role of a link with respect to the current selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeStyle {
	/// Nothing is selected.
	Normal,
	/// Both endpoints are within the hop limit.
	Highlighted,
	/// At least one endpoint is out of reach.
	Dimmed,
}

/// Hop distance of every node reached from the selected node.
///
/// Each node appears at most once, at the smallest hop it was reached.
/// The default value is the empty classification (nothing selected).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HopClassification {
	selected: Option<String>,
	max_hops: u32,
	hops: HashMap<String, u32>,
}

impl HopClassification {
	/// Center of the classification.
	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	/// Hop limit the classification was computed with.
	pub fn max_hops(&self) -> u32 {
		self.max_hops
	}

	/// Hop distance of `id`, `None` when unreached.
	pub fn hop(&self, id: &str) -> Option<u32> {
		self.hops.get(id).copied()
	}

	/// True when nothing is selected.
	pub fn is_empty(&self) -> bool {
		self.hops.is_empty()
	}

	/// Number of classified nodes, the selected one included.
	pub fn len(&self) -> usize {
		self.hops.len()
	}

	/// Ids reached at exactly `hop`, sorted.
	pub fn bucket(&self, hop: u32) -> Vec<&str> {
		let mut ids: Vec<&str> = self
			.hops
			.iter()
			.filter(|&(_, &h)| h == hop)
			.map(|(id, _)| id.as_str())
			.collect();
		ids.sort_unstable();
		ids
	}

	/// A link is highlighted when it touches the selected node or joins two
	/// classified nodes, whether or not it lies on a shortest path.
	pub fn is_link_highlighted(&self, link: &GraphLink) -> bool {
		let Some(selected) = self.selected.as_deref() else {
			return false;
		};
		link.touches(selected)
			|| (self.hops.contains_key(&link.source) && self.hops.contains_key(&link.target))
	}

	/// Style of the node `id`.
	pub fn node_style(&self, id: &str) -> NodeStyle {
		if self.selected.is_none() {
			return NodeStyle::Normal;
		}
		match self.hop(id) {
			Some(0) => NodeStyle::Selected,
			Some(h) if h <= MAX_HOP_TIER => NodeStyle::Tier(h),
			Some(_) => NodeStyle::Reached,
			None => NodeStyle::Dimmed,
		}
	}

	/// Style of `link`.
	pub fn link_style(&self, link: &GraphLink) -> EdgeStyle {
		if self.selected.is_none() {
			EdgeStyle::Normal
		} else if self.is_link_highlighted(link) {
			EdgeStyle::Highlighted
		} else {
			EdgeStyle::Dimmed
		}
	}
}

/// Breadth-first hop classification from `selected` out to `max_hops`.
///
/// Links are traversed in both directions. Links with an endpoint missing
/// from `nodes` are ignored. An unknown `selected` id gives the empty
/// classification.
pub fn compute_hops(
	nodes: &[GraphNode],
	links: &[GraphLink],
	selected: &str,
	max_hops: u32,
) -> HopClassification {
	let mut adjacency: HashMap<&str, Vec<&str>> =
		nodes.iter().map(|n| (n.id.as_str(), Vec::new())).collect();
	if !adjacency.contains_key(selected) {
		return HopClassification::default();
	}
	for link in links {
		let (s, t) = (link.source.as_str(), link.target.as_str());
		if !adjacency.contains_key(s) || !adjacency.contains_key(t) {
			continue;
		}
		if let Some(list) = adjacency.get_mut(s) {
			list.push(t);
		}
		if let Some(list) = adjacency.get_mut(t) {
			list.push(s);
		}
	}

	let mut hops = HashMap::from([(selected.to_string(), 0)]);
	let mut frontier = vec![selected];
	for hop in 1..=max_hops {
		let mut next = Vec::new();
		for id in &frontier {
			for &neighbor in adjacency.get(id).into_iter().flatten() {
				if !hops.contains_key(neighbor) {
					hops.insert(neighbor.to_string(), hop);
					next.push(neighbor);
				}
			}
		}
		if next.is_empty() {
			break;
		}
		frontier = next;
	}

	HopClassification {
		selected: Some(selected.to_string()),
		max_hops,
		hops,
	}
}
