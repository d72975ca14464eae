use thiserror::Error;

/// Errors that can occur during layout computation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// An input array does not line up with the graph's vertex count, or an
    /// adjacency entry points at a vertex that does not exist
    #[error("shape mismatch: expected {expected} entries, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Layered layout was invoked on a graph that contains a cycle; cycle
    /// removal is not implemented, so this fails instead of guessing
    #[error("graph contains a cycle; layered layout requires an acyclic graph")]
    CyclicGraph,

    /// The external LP/ILP solver reported infeasibility, unboundedness or
    /// an internal failure
    #[error("solver failed: {0}")]
    Solver(String),
}
