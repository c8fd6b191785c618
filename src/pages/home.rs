use leptos::prelude::*;
use leptos_meta::Title;

use crate::components::force_graph::filter::connections_from_size;
use crate::components::force_graph::network::{NetworkNode, StoryNetwork};
use crate::components::force_graph::{
	ForceGraphCanvas, GraphConfig, GraphData, GraphHandle, GraphNode, NodeDetails, NodeType,
};

const HOP_LEVELS: [u32; 5] = [1, 2, 3, 4, 5];

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Sample story network: characters own infos, events hang off infos and
/// pull in placeholders. Iterations grow with the element index.
fn sample_network(characters: usize) -> StoryNetwork {
	let mut net = StoryNetwork {
		topic: "The Lighthouse Keepers".into(),
		..StoryNetwork::default()
	};
	let add = |net: &mut StoryNetwork, id: String, node_type, data: serde_json::Value| {
		let node = NetworkNode {
			id: id.clone(),
			node_type,
			data: data.as_object().cloned().unwrap_or_default(),
			edges: Default::default(),
		};
		net.nodes.insert(id, node);
	};
	let connect = |net: &mut StoryNetwork, a: &str, b: &str| {
		if let Some(n) = net.nodes.get_mut(a) {
			n.edges.insert(b.to_string());
		}
		if let Some(n) = net.nodes.get_mut(b) {
			n.edges.insert(a.to_string());
		}
	};

	let roles = ["keeper", "smuggler", "widow", "inspector", "child", "priest"];
	let mut info_ids = Vec::new();
	for c in 0..characters {
		let id = format!("character_{}", c + 1);
		let role = roles[c % roles.len()];
		add(
			&mut net,
			id.clone(),
			NodeType::Character,
			serde_json::json!({ "role": role, "name": null, "created_at": 1 + c % 3 }),
		);
		for k in 0..(2 + (rand_simple(c) * 2.0) as usize) {
			let info = format!("info_{}", info_ids.len() + 1);
			add(
				&mut net,
				info.clone(),
				NodeType::Info,
				serde_json::json!({
					"type": if k == 0 { "secret" } else { "trait" },
					"content": format!("{role} detail #{}", k + 1),
					"owner_id": id,
					"created_at": 1 + (c + k) % 3,
				}),
			);
			connect(&mut net, &id, &info);
			info_ids.push(info);
		}
	}

	for e in 0..info_ids.len() / 2 {
		let id = format!("event_{}", e + 1);
		let owner = &info_ids[(rand_simple(e + 100) * info_ids.len() as f64) as usize];
		let other = &info_ids[(rand_simple(e + 200) * info_ids.len() as f64) as usize];
		add(
			&mut net,
			id.clone(),
			NodeType::Event,
			serde_json::json!({
				"summary": format!("Night {} at the lighthouse", e + 1),
				"owner_id": owner,
				"created_at": 2 + e % 2,
			}),
		);
		connect(&mut net, &id, owner);
		connect(&mut net, &id, other);
		if e % 3 == 0 {
			let placeholder = format!("placeholder_{}", e / 3 + 1);
			add(
				&mut net,
				placeholder.clone(),
				NodeType::Placeholder,
				serde_json::json!({ "role": "stranger", "owner_id": id, "created_at": 3 }),
			);
			connect(&mut net, &id, &placeholder);
		}
	}
	net
}

fn details_title(details: &NodeDetails) -> String {
	let field = |key: &str| {
		details
			.data
			.get(key)
			.and_then(|v| v.as_str())
			.unwrap_or("Unknown")
			.to_string()
	};
	match details.node_type {
		NodeType::Placeholder => format!("[PlaceHolder] {}", field("role")),
		NodeType::Info => format!("[Info] {}", field("type")),
		_ => details
			.data
			.get("name")
			.and_then(|v| v.as_str())
			.unwrap_or(&details.id)
			.to_string(),
	}
}

/// Type-specific block of the detail panel.
#[derive(Clone, Debug, PartialEq)]
enum DetailSection {
	/// `label: value` on one line.
	Field(&'static str, String),
	/// Heading followed by a paragraph.
	Text(&'static str, String),
	/// Heading followed by a bullet list.
	List(&'static str, Vec<String>),
}

fn data_text(details: &NodeDetails, key: &str) -> Option<String> {
	match details.data.get(key)? {
		serde_json::Value::Null => None,
		serde_json::Value::String(s) if s.is_empty() => None,
		serde_json::Value::String(s) => Some(s.clone()),
		other => Some(other.to_string()),
	}
}

fn type_sections(details: &NodeDetails) -> Vec<DetailSection> {
	use DetailSection::{Field, List, Text};

	let value = |key| data_text(details, key);
	let or_unknown = |key| value(key).unwrap_or_else(|| "Unknown".to_string());
	let mut sections = Vec::new();
	match details.node_type {
		NodeType::Character => {
			sections.extend(value("role").map(|role| Field("Role", role)));
			let infos = details.infos.as_deref().unwrap_or_default();
			if !infos.is_empty() {
				let lines = infos
					.iter()
					.map(|info| {
						format!(
							"{}: {}",
							info.info_type.as_deref().unwrap_or("Info"),
							info.content.as_deref().unwrap_or("")
						)
					})
					.collect();
				sections.push(List("Related Information", lines));
			}
		}
		NodeType::Event => {
			sections.push(Field("Owner id", or_unknown("owner_id")));
			sections.extend(value("summary").map(|summary| Text("Summary", summary)));
			if let Some(participants) = &details.participants {
				if !participants.infos.is_empty() {
					sections.push(List("Info Nodes", participants.infos.clone()));
				}
				if !participants.placeholders.is_empty() {
					sections.push(List("PlaceHolders", participants.placeholders.clone()));
				}
			}
		}
		NodeType::Info => {
			sections.push(Field("Info Type", or_unknown("type")));
			sections.push(Field("Owner id", or_unknown("owner_id")));
			sections.extend(value("content").map(|content| Text("Content", content)));
		}
		NodeType::Placeholder => {
			sections.push(Field("Role", or_unknown("role")));
			sections.push(Field("Owner id", or_unknown("owner_id")));
			sections.extend(value("context").map(|context| Text("Context", context)));
		}
	}
	sections
}

fn section_view(section: DetailSection) -> AnyView {
	match section {
		DetailSection::Field(label, value) => {
			view! { <p><strong>{label}":"</strong>" "{value}</p> }.into_any()
		}
		DetailSection::Text(label, text) => view! { <h3>{label}</h3><p>{text}</p> }.into_any(),
		DetailSection::List(label, items) => view! {
			<h3>{label}</h3>
			<ul>{items.into_iter().map(|item| view! { <li>{item}</li> }).collect_view()}</ul>
		}
		.into_any(),
	}
}

/// Connected ids present in the snapshot, as `(id, "name (type)")`.
fn connected_entries(details: &NodeDetails, graph: &GraphData) -> Vec<(String, String)> {
	details
		.connected_nodes
		.iter()
		.filter_map(|id| graph.node(id))
		.map(|node| {
			(
				node.id.clone(),
				format!("{} ({})", node.name, node.node_type.as_str()),
			)
		})
		.collect()
}

fn tooltip_text(node: &GraphNode) -> String {
	format!(
		"{} | Type: {} | Connections: {}",
		node.name,
		node.node_type.as_str(),
		connections_from_size(node.size)
	)
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let network = StoredValue::new(sample_network(8));
	let graph_data = Memo::new(move |_| network.with_value(StoryNetwork::to_graph_data));
	let stats = network.with_value(StoryNetwork::statistics);
	let topic = network.with_value(|n| n.topic.clone());

	let engine = GraphHandle::new(GraphConfig::default());
	let (hop_level, set_hop_level) = signal(1u32);
	let (details, set_details) = signal(None::<NodeDetails>);
	let (picked, set_picked) = signal(None::<String>);
	let tooltip = RwSignal::new(None::<(String, f64, f64)>);
	let iteration_text = RwSignal::new(String::new());
	let connection_text = RwSignal::new(String::new());

	// Picks from the detail panel select like a search result.
	let engine_pick = engine.clone();
	Effect::new(move |_| {
		if let Some(id) = picked.get() {
			engine_pick.run("select", |e| e.select_node(&id));
			set_details.set(network.with_value(|n| n.node_details(&id)));
		}
	});

	let hop_buttons = HOP_LEVELS
		.into_iter()
		.map(|n| {
			let engine = engine.clone();
			view! {
				<button
					class="hop-btn"
					class:active=move || hop_level.get() == n
					on:click=move |_| {
						set_hop_level.set(n);
						engine.run("hop level change", |e| e.set_hop_level(n));
					}
				>
					{format!("{n} hop")}
				</button>
			}
		})
		.collect_view();

	let (engine_ia, engine_ic, engine_ca, engine_cc) =
		(engine.clone(), engine.clone(), engine.clone(), engine.clone());

	let stat_rows = [
		("Total Nodes", stats.total_nodes),
		("Total Edges", stats.total_edges),
		("Characters", stats.characters),
		("Events", stats.events),
		("Info Nodes", stats.infos),
		("PlaceHolders", stats.placeholders),
	]
	.into_iter()
	.map(|(label, value)| view! { <tr><th>{label}</th><td>{value}</td></tr> })
	.collect_view();

	view! {
		<Title text=topic.clone() />
		<div class="story-viewer">
			<aside class="side-panel">
				<h1>{topic.clone()}</h1>

				<section class="hop-controls">{hop_buttons}</section>

				<section class="filters">
					<input
						type="text"
						placeholder="Iteration"
						prop:value=move || iteration_text.get()
						on:input=move |ev| iteration_text.set(event_target_value(&ev))
					/>
					<button on:click=move |_| {
						let text = iteration_text.get_untracked();
						engine_ia.run("iteration filter", |e| e.set_iteration_filter(&text));
					}>"Apply"</button>
					<button on:click=move |_| {
						iteration_text.set(String::new());
						engine_ic.run("iteration filter", |e| e.clear_iteration_filter());
					}>"Clear"</button>

					<input
						type="text"
						placeholder="Min connections"
						prop:value=move || connection_text.get()
						on:input=move |ev| connection_text.set(event_target_value(&ev))
					/>
					<button on:click=move |_| {
						let text = connection_text.get_untracked();
						engine_ca.run("connection filter", |e| e.set_connection_filter(&text));
					}>"Apply"</button>
					<button on:click=move |_| {
						connection_text.set(String::new());
						engine_cc.run("connection filter", |e| e.clear_connection_filter());
					}>"Clear"</button>
				</section>

				<table class="stats">{stat_rows}</table>

				<section class="node-info">
					{move || details.get().map(|d| {
						let created_at = data_text(&d, "created_at").unwrap_or_default();
						let sections = type_sections(&d).into_iter().map(section_view).collect_view();
						let connected = graph_data.with(|g| connected_entries(&d, g));
						let connected_view = (!connected.is_empty()).then(|| view! {
							<h3>"Connected Nodes"</h3>
							<ul>
								{connected
									.into_iter()
									.map(|(id, label)| view! {
										<li>
											<span class="connected-node" on:click=move |_| set_picked.set(Some(id.clone()))>
												{label}
											</span>
										</li>
									})
									.collect_view()}
							</ul>
						});
						view! {
							<h2>{details_title(&d)}</h2>
							<p><strong>"ID:"</strong>" "{d.id.clone()}</p>
							<p><strong>"Type:"</strong>" "{d.node_type.as_str()}</p>
							<p><strong>"Connections:"</strong>" "{d.connections}</p>
							<p><strong>"Created at:"</strong>" "{created_at}</p>
							{sections}
							{connected_view}
						}
					})}
				</section>
			</aside>

			<div class="graph-area">
				<ForceGraphCanvas
					data=graph_data
					engine=engine
					on_node_click=move |node: GraphNode| {
						set_details.set(network.with_value(|n| n.node_details(&node.id)))
					}
					on_node_mouseover=move |(node, x, y): (GraphNode, f64, f64)| {
						tooltip.set(Some((tooltip_text(&node), x, y)))
					}
					on_node_mouseout=move |_: ()| tooltip.set(None)
					on_background_click=move |_: ()| set_details.set(None)
				/>
				{move || tooltip.get().map(|(text, x, y)| view! {
					<div class="tooltip" style=format!("left: {}px; top: {}px;", x + 10.0, y - 10.0)>
						{text}
					</div>
				})}
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sample_network_is_consistent() {
		let net = sample_network(8);
		for (id, node) in &net.nodes {
			for other in &node.edges {
				assert!(net.nodes[other].edges.contains(id), "{id} <-> {other}");
			}
		}
		let stats = net.statistics();
		assert_eq!(stats.characters, 8);
		assert!(stats.events > 0 && stats.placeholders > 0);
		assert_eq!(net.to_graph_data().links.len(), stats.total_edges);
	}

	#[test]
	fn event_sections_list_participants() {
		let net = sample_network(2);
		let details = net.node_details("event_1").unwrap();
		let sections = type_sections(&details);

		assert!(matches!(&sections[0], DetailSection::Field("Owner id", id) if id.starts_with("info_")));
		assert_eq!(
			sections[1],
			DetailSection::Text("Summary", "Night 1 at the lighthouse".into())
		);
		assert!(sections.contains(&DetailSection::List(
			"PlaceHolders",
			vec!["placeholder_1".into()]
		)));
		assert!(sections.iter().any(|s| matches!(s, DetailSection::List("Info Nodes", ids) if !ids.is_empty())));
	}

	#[test]
	fn character_sections_show_role_and_infos() {
		let net = sample_network(1);
		let sections = type_sections(&net.node_details("character_1").unwrap());
		assert_eq!(sections[0], DetailSection::Field("Role", "keeper".into()));
		assert_eq!(
			sections[1],
			DetailSection::List(
				"Related Information",
				vec!["secret: keeper detail #1".into(), "trait: keeper detail #2".into()]
			)
		);
	}

	#[test]
	fn placeholder_and_info_sections_fall_back_to_unknown() {
		let mut net = sample_network(2);
		let sections = type_sections(&net.node_details("placeholder_1").unwrap());
		assert_eq!(sections[0], DetailSection::Field("Role", "stranger".into()));
		assert_eq!(sections[1], DetailSection::Field("Owner id", "event_1".into()));
		assert_eq!(sections.len(), 2);

		if let Some(info) = net.nodes.get_mut("info_1") {
			info.data.remove("type");
		}
		let sections = type_sections(&net.node_details("info_1").unwrap());
		assert_eq!(sections[0], DetailSection::Field("Info Type", "Unknown".into()));
		assert_eq!(
			sections[2],
			DetailSection::Text("Content", "keeper detail #1".into())
		);
	}

	#[test]
	fn connected_entries_skip_ids_missing_from_snapshot() {
		let net = sample_network(2);
		let mut details = net.node_details("character_1").unwrap();
		details.connected_nodes.push("ghost".into());
		let graph = net.to_graph_data();

		let entries = connected_entries(&details, &graph);
		assert_eq!(entries.len(), details.connected_nodes.len() - 1);
		assert_eq!(entries[0], ("info_1".to_string(), "secret: keeper detail #1 (info)".to_string()));
		assert!(entries.iter().all(|(id, _)| id != "ghost"));
	}

	#[test]
	fn detail_titles_by_type() {
		let net = sample_network(2);
		let title = |id: &str| details_title(&net.node_details(id).unwrap());
		assert_eq!(title("character_1"), "character_1");
		assert_eq!(title("info_1"), "[Info] secret");
		assert_eq!(title("placeholder_1"), "[PlaceHolder] stranger");
	}
}
