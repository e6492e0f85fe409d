//! Error types for the skill graph.
//!
//! None of these reach the page: the graph degrades to an empty or waiting state.

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
	#[error("no skills to lay out")]
	EmptyNodeSet,

	#[error("container {width}x{height} is not a valid layout area")]
	DegenerateContainer { width: f64, height: f64 },

	#[error("invalid skill data: {0}")]
	InvalidData(#[from] serde_json::Error),

	#[error("invalid graph config: {0}")]
	InvalidConfig(#[source] serde_json::Error),
}
