use crate::{Graph, LayoutError, Point};

/// A layout engine that can compute positions for graph vertices
///
/// Engines are stateless: each call works on its own copies of whatever it
/// derives from the input graph, and a failed call produces no positions.
/// The returned list is aligned to vertex index. The layered engine appends
/// positions for the dummy vertices it introduces after the original
/// vertices, so its list can be longer than the input graph.
pub trait LayoutEngine {
    /// Compute vertex positions for the given graph
    ///
    /// # Errors
    /// Returns an error if the layout computation fails (e.g., graph
    /// contains cycles for layered layout, or the external solver rejects
    /// the generated program)
    fn layout(&self, graph: &Graph) -> Result<Vec<Point>, LayoutError>;
}
