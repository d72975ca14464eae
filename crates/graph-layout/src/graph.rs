use crate::LayoutError;
use petgraph::visit::{IntoNeighborsDirected, IntoNodeIdentifiers};
use petgraph::Direction;
use std::collections::HashMap;
use std::hash::Hash;

/// Directed graph over dense vertex indices `0..n`
///
/// Vertices are identified by their index; edges are stored as an adjacency
/// list of successor indices. Duplicate edges and self-loops are disallowed
/// by convention but not enforced. Every layout engine takes this
/// representation as its read-only input and works on private copies of
/// whatever it derives from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    adj: Vec<Vec<usize>>,
}

impl Graph {
    /// Create a graph with `vertex_count` vertices and no edges
    pub fn new(vertex_count: usize) -> Self {
        Self {
            adj: vec![Vec::new(); vertex_count],
        }
    }

    /// Build a graph from an adjacency list, validating that every successor
    /// index refers to an existing vertex
    pub fn from_adjacency(adj: Vec<Vec<usize>>) -> Result<Self, LayoutError> {
        let n = adj.len();
        for successors in &adj {
            for &w in successors {
                if w >= n {
                    return Err(LayoutError::ShapeMismatch {
                        expected: n,
                        actual: w + 1,
                    });
                }
            }
        }
        Ok(Self { adj })
    }

    /// Build a graph from any petgraph-compatible graph, densifying its node
    /// identifiers into `0..n`
    ///
    /// Node identifiers are ranked in sorted order so the mapping is
    /// deterministic. Returns the graph together with the vertex-index to
    /// original-identifier mapping, for translating positions back.
    pub fn from_petgraph<G>(graph: G) -> (Self, Vec<G::NodeId>)
    where
        G: IntoNodeIdentifiers + IntoNeighborsDirected,
        G::NodeId: Copy + Ord + Hash,
    {
        let mut ids: Vec<G::NodeId> = graph.node_identifiers().collect();
        ids.sort_unstable();
        let index: HashMap<G::NodeId, usize> =
            ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        let mut adj = vec![Vec::new(); ids.len()];
        for (i, &id) in ids.iter().enumerate() {
            for succ in graph.neighbors_directed(id, Direction::Outgoing) {
                adj[i].push(index[&succ]);
            }
        }

        (Self { adj }, ids)
    }

    /// Internal constructor for adjacency lists already known to be valid
    pub(crate) fn from_adjacency_unchecked(adj: Vec<Vec<usize>>) -> Self {
        Self { adj }
    }

    /// Add the edge `from -> to`
    ///
    /// # Panics
    /// Panics if either endpoint is not a vertex of the graph.
    pub fn add_edge(&mut self, from: usize, to: usize) {
        assert!(
            from < self.adj.len() && to < self.adj.len(),
            "edge ({from}, {to}) out of bounds for graph of {} vertices",
            self.adj.len()
        );
        self.adj[from].push(to);
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.adj.len()
    }

    /// Whether the graph has no vertices
    pub fn is_empty(&self) -> bool {
        self.adj.is_empty()
    }

    /// Successors of `v`, in insertion order
    pub fn successors(&self, v: usize) -> &[usize] {
        &self.adj[v]
    }

    /// The full adjacency list
    pub fn adjacency(&self) -> &[Vec<usize>] {
        &self.adj
    }

    /// Iterate over all edges as `(from, to)` pairs
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adj
            .iter()
            .enumerate()
            .flat_map(|(v, succs)| succs.iter().map(move |&w| (v, w)))
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.adj.iter().map(Vec::len).sum()
    }

    /// In-degree of every vertex
    pub fn in_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.adj.len()];
        for (_, w) in self.edges() {
            degrees[w] += 1;
        }
        degrees
    }

    /// Neighbor lists with edge direction ignored, deduplicated
    ///
    /// The spring and stress engines treat the graph as undirected.
    pub fn undirected_neighbors(&self) -> Vec<Vec<usize>> {
        let mut neighbors = vec![Vec::new(); self.adj.len()];
        for (v, w) in self.edges() {
            neighbors[v].push(w);
            neighbors[w].push(v);
        }
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }
        neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graphmap::DiGraphMap;

    #[test]
    fn from_adjacency_validates_indices() {
        assert!(Graph::from_adjacency(vec![vec![1], vec![0]]).is_ok());

        let result = Graph::from_adjacency(vec![vec![2], vec![]]);
        assert_eq!(
            result,
            Err(LayoutError::ShapeMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn edges_and_degrees() {
        let mut graph = Graph::new(3);
        graph.add_edge(0, 1);
        graph.add_edge(0, 2);
        graph.add_edge(1, 2);

        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edges().collect::<Vec<_>>(), [(0, 1), (0, 2), (1, 2)]);
        assert_eq!(graph.in_degrees(), [0, 1, 2]);
        assert_eq!(graph.undirected_neighbors(), [vec![1, 2], vec![0, 2], vec![0, 1]]);
    }

    #[test]
    fn from_petgraph_densifies_identifiers() {
        let mut source = DiGraphMap::new();
        source.add_edge(10, 30, ());
        source.add_edge(30, 20, ());

        let (graph, ids) = Graph::from_petgraph(&source);
        assert_eq!(ids, [10, 20, 30]);
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.successors(0), [2]);
        assert_eq!(graph.successors(2), [1]);
    }
}
