//! Tunables for the layout, viewport and interaction handling.

use force_graph::SimulationParameters;

/// Physics constants handed to the force layout.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
	/// Repulsion between every pair of nodes.
	pub force_charge: f32,
	/// Spring strength along links.
	pub force_spring: f32,
	/// Cap on the force applied to a node per step.
	pub force_max: f32,
	/// Scale from accumulated force to velocity.
	pub node_speed: f32,
	/// Velocity kept between steps, `0..1`.
	pub damping_factor: f32,
	/// Mass of every node. Heavier nodes react slower.
	pub node_mass: f32,
	/// Radius of the circle nodes are seeded on around the viewport center.
	pub seed_radius: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			force_charge: 400.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			node_mass: 10.0,
			seed_radius: 100.0,
		}
	}
}

impl SimulationConfig {
	/// Parameters in the form `force_graph` takes them.
	pub fn parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.force_charge,
			force_spring: self.force_spring,
			force_max: self.force_max,
			node_speed: self.node_speed,
			damping_factor: self.damping_factor,
		}
	}
}

/// Engine configuration. `Default` matches the stock viewer.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphConfig {
	/// Physics of the force layout.
	pub simulation: SimulationConfig,
	/// Smallest zoom factor reachable with the wheel.
	pub min_zoom: f64,
	/// Largest zoom factor reachable with the wheel.
	pub max_zoom: f64,
	/// Multiplicative zoom change per wheel notch.
	pub zoom_step: f64,
	/// Length of the center-on-node transition, in seconds.
	pub center_duration: f64,
	/// Pointer travel (screen px) below which a press counts as a click.
	pub click_tolerance: f64,
	/// Hop level used until the user picks another one.
	pub default_hop_level: u32,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			simulation: SimulationConfig::default(),
			min_zoom: 0.1,
			max_zoom: 10.0,
			zoom_step: 1.1,
			center_duration: 0.75,
			click_tolerance: 3.0,
			default_hop_level: 1,
		}
	}
}
