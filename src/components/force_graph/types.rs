//! Graph data structures exchanged with the data-access layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of story element a node represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
	/// A named or role-only character.
	Character,
	/// A plot event owned by a character.
	Event,
	/// A fact attached to a character or event.
	Info,
	/// An unresolved participant slot of an event.
	Placeholder,
}

impl NodeType {
	/// Wire name, as used in `"type"` fields.
	pub fn as_str(self) -> &'static str {
		match self {
			NodeType::Character => "character",
			NodeType::Event => "event",
			NodeType::Info => "info",
			NodeType::Placeholder => "placeholder",
		}
	}

	/// Fill color used when the snapshot does not carry one.
	pub fn color(self) -> &'static str {
		match self {
			NodeType::Character => "#FF6B6B",
			NodeType::Event => "#4ECDC4",
			NodeType::Info => "#FFD93D",
			NodeType::Placeholder => "#95E1D3",
		}
	}
}

/// A node in the graph snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	/// Unique identifier, stable across reloads. Links reference nodes by it.
	pub id: String,
	/// Display label.
	pub name: String,
	#[serde(rename = "type")]
	/// Story element kind.
	pub node_type: NodeType,
	/// Rendered radius. Encodes the connection count, see
	/// [`size_for_connections`](super::filter::size_for_connections).
	pub size: f64,
	/// CSS fill color.
	pub color: String,
	/// Opaque attribute bag from the story network (`created_at`, `role`, ...).
	#[serde(default)]
	pub data: Map<String, Value>,
}

impl GraphNode {
	/// Iteration in which the node was created, if the data bag carries one.
	pub fn created_at(&self) -> Option<i64> {
		self.data.get("created_at").and_then(Value::as_i64)
	}
}

/// An undirected relation between two nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
	/// One endpoint id.
	pub source: String,
	/// The other endpoint id.
	pub target: String,
}

impl GraphLink {
	/// Link between two node ids.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
		}
	}

	/// Whether `id` is one of the endpoints.
	pub fn touches(&self, id: &str) -> bool {
		self.source == id || self.target == id
	}
}

/// Complete graph snapshot: nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	/// All nodes, ids unique.
	pub nodes: Vec<GraphNode>,
	/// All links, endpoints present in `nodes`.
	pub links: Vec<GraphLink>,
	/// Story topic, shown in the page title.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub topic: Option<String>,
}

impl GraphData {
	/// Look up a node by id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}
}

/// An info node attached to a character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InfoEntry {
	/// Info node id.
	pub id: String,
	#[serde(rename = "type")]
	/// Info category, e.g. `"trait"`.
	pub info_type: Option<String>,
	/// Info text.
	pub content: Option<String>,
}

/// Info and placeholder ids connected to an event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Participants {
	/// Connected info ids.
	pub infos: Vec<String>,
	/// Connected placeholder ids.
	pub placeholders: Vec<String>,
}

/// Detail record for the side panel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeDetails {
	/// Node id.
	pub id: String,
	#[serde(rename = "type")]
	/// Node kind.
	pub node_type: NodeType,
	/// Raw attribute bag.
	pub data: Map<String, Value>,
	/// Degree of the node.
	pub connections: usize,
	/// Ids of adjacent nodes.
	pub connected_nodes: Vec<String>,
	/// Present for characters only.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub infos: Option<Vec<InfoEntry>>,
	/// Present for events only.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub participants: Option<Participants>,
}

/// Aggregate counts for the statistics table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStatistics {
	/// Number of nodes.
	pub total_nodes: usize,
	/// Number of undirected edges.
	pub total_edges: usize,
	/// Character nodes.
	pub characters: usize,
	/// Event nodes.
	pub events: usize,
	/// Info nodes.
	pub infos: usize,
	/// Placeholder nodes.
	pub placeholders: usize,
}

impl GraphStatistics {
	/// Count nodes per type and edges of a snapshot.
	pub fn from_graph(data: &GraphData) -> Self {
		let mut stats = Self {
			total_nodes: data.nodes.len(),
			total_edges: data.links.len(),
			..Self::default()
		};
		for node in &data.nodes {
			stats.count(node.node_type);
		}
		stats
	}

	pub(crate) fn count(&mut self, node_type: NodeType) {
		match node_type {
			NodeType::Character => self.characters += 1,
			NodeType::Event => self.events += 1,
			NodeType::Info => self.infos += 1,
			NodeType::Placeholder => self.placeholders += 1,
		}
	}
}
