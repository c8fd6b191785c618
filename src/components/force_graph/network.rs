//! Saved story network files and their conversion into a renderable
//! snapshot.
//!
//! A saved network stores each node with the ids it is connected to:
//!
//! ```json
//! {"topic": "...", "nodes": {"character_1": {"id": "character_1", "type": "character",
//!   "data": {"role": "hero"}, "edges": ["info_1"]}}}
//! ```

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Deserialize;
use serde_json::{Map, Value};

use super::filter::size_for_connections;
use super::types::{
	GraphData, GraphLink, GraphNode, GraphStatistics, InfoEntry, NodeDetails, NodeType,
	Participants,
};

const EVENT_NAME_CHARS: usize = 50;
const INFO_NAME_CHARS: usize = 30;

/// One node of a saved network.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NetworkNode {
	/// Unique node id.
	pub id: String,
	/// Kind of story element.
	#[serde(rename = "type")]
	pub node_type: NodeType,
	/// Free-form attributes (`name`, `role`, `summary`, `created_at`, ...).
	#[serde(default)]
	pub data: Map<String, Value>,
	/// Ids of connected nodes. Connections are stored on both ends.
	#[serde(default)]
	pub edges: BTreeSet<String>,
}

/// A saved character network.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct StoryNetwork {
	/// Story topic the network was generated for.
	pub topic: String,
	/// Nodes keyed by id, iterated in id order.
	pub nodes: BTreeMap<String, NetworkNode>,
}

fn text<'a>(data: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
	data.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn truncate(s: &str, chars: usize) -> &str {
	match s.char_indices().nth(chars) {
		Some((end, _)) => &s[..end],
		None => s,
	}
}

impl NetworkNode {
	/// Label shown next to the node.
	pub fn display_name(&self) -> String {
		let data = &self.data;
		match self.node_type {
			NodeType::Character => text(data, "name")
				.or_else(|| text(data, "role"))
				.unwrap_or(&self.id)
				.to_string(),
			NodeType::Event => {
				truncate(text(data, "summary").unwrap_or(&self.id), EVENT_NAME_CHARS).to_string()
			}
			NodeType::Info => format!(
				"{}: {}",
				text(data, "type").unwrap_or("Info"),
				truncate(text(data, "content").unwrap_or(""), INFO_NAME_CHARS)
			),
			NodeType::Placeholder => format!("[{}]", text(data, "role").unwrap_or("Unknown")),
		}
	}
}

impl StoryNetwork {
	/// Parse a saved network file.
	pub fn from_json(json: &str) -> serde_json::Result<Self> {
		serde_json::from_str(json)
	}

	fn neighbors<'a>(&'a self, node: &'a NetworkNode) -> impl Iterator<Item = &'a NetworkNode> {
		node.edges.iter().filter_map(|id| self.nodes.get(id))
	}

	/// Build the snapshot served to the viewer.
	///
	/// Size encodes the stored connection count. Each connection becomes one
	/// link regardless of which end stores it; connections to unknown ids are
	/// skipped.
	pub fn to_graph_data(&self) -> GraphData {
		let nodes = self
			.nodes
			.values()
			.map(|node| GraphNode {
				id: node.id.clone(),
				name: node.display_name(),
				node_type: node.node_type,
				size: size_for_connections(node.edges.len()),
				color: node.node_type.color().to_string(),
				data: node.data.clone(),
			})
			.collect();

		let mut seen = HashSet::new();
		let mut links = Vec::new();
		for (id, node) in &self.nodes {
			for other in node.edges.iter().filter(|o| self.nodes.contains_key(*o)) {
				let pair = if id <= other { (id, other) } else { (other, id) };
				if seen.insert(pair) {
					links.push(GraphLink::new(id.clone(), other.clone()));
				}
			}
		}

		GraphData {
			nodes,
			links,
			topic: Some(self.topic.clone()),
		}
	}

	/// Node counts per type and the number of undirected connections.
	pub fn statistics(&self) -> GraphStatistics {
		let mut stats = GraphStatistics {
			total_nodes: self.nodes.len(),
			total_edges: self.nodes.values().map(|n| n.edges.len()).sum::<usize>() / 2,
			..GraphStatistics::default()
		};
		for node in self.nodes.values() {
			stats.count(node.node_type);
		}
		stats
	}

	/// Side panel record for `id`.
	pub fn node_details(&self, id: &str) -> Option<NodeDetails> {
		let node = self.nodes.get(id)?;
		let of_type = |t: NodeType| {
			self.neighbors(node)
				.filter(move |n| n.node_type == t)
				.map(|n| n.id.clone())
				.collect::<Vec<_>>()
		};

		let infos = (node.node_type == NodeType::Character).then(|| {
			self.neighbors(node)
				.filter(|n| n.node_type == NodeType::Info)
				.map(|n| InfoEntry {
					id: n.id.clone(),
					info_type: text(&n.data, "type").map(str::to_string),
					content: text(&n.data, "content").map(str::to_string),
				})
				.collect()
		});
		let participants = (node.node_type == NodeType::Event).then(|| Participants {
			infos: of_type(NodeType::Info),
			placeholders: of_type(NodeType::Placeholder),
		});

		Some(NodeDetails {
			id: node.id.clone(),
			node_type: node.node_type,
			data: node.data.clone(),
			connections: node.edges.len(),
			connected_nodes: node.edges.iter().cloned().collect(),
			infos,
			participants,
		})
	}
}
