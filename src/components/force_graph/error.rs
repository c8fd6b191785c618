//! Engine error type.

use thiserror::Error;

/// Reasons an engine operation was rejected.
///
/// None of these are fatal: the rejected operation leaves the previous
/// selection, highlight and filter state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
	/// The operation named a node id absent from the current snapshot.
	#[error("node {0:?} not found")]
	MissingNode(String),

	/// Highlight or filter requested before a snapshot was rendered.
	#[error("graph not rendered yet")]
	UninitializedEngine,

	/// Filter text that does not start with an integer.
	#[error("filter value {0:?} is not a number")]
	InvalidFilterInput(String),

	/// Hop levels start at 1.
	#[error("hop level must be at least 1, got {0}")]
	InvalidHopLevel(u32),
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
