//! Interactive story graph view.
//!
//! Renders a character/event network on an HTML canvas with:
//! - Physics-based node positioning via force simulation
//! - Multi-hop neighborhood highlight around a selected node
//! - Iteration and connection-count filters cascaded to links
//! - Pan, zoom, eased center-on-node and node dragging
//!
//! The engine ([`GraphEngine`]) holds no DOM state and is usable on its own;
//! [`ForceGraphCanvas`] wires it to a canvas.

mod component;
pub mod config;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod highlight;
pub mod layout;
pub mod network;
mod render;
pub mod state;
pub mod types;

pub use component::ForceGraphCanvas;
pub use config::GraphConfig;
pub use error::EngineError;
pub use filter::{FilterState, VisibilityMap};
pub use geometry::ViewTransform;
pub use highlight::{EdgeStyle, HopClassification, NodeStyle};
pub use layout::{ForceLayout, LayoutAdapter};
pub use network::StoryNetwork;
pub use state::{GraphCallbacks, GraphEngine, GraphHandle, Selection};
pub use types::{GraphData, GraphLink, GraphNode, GraphStatistics, NodeDetails, NodeType};
