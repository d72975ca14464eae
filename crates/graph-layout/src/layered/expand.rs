use crate::Graph;
use tracing::trace;

/// The expanded graph produced by dummy-vertex insertion
///
/// Dummy vertices occupy the indices from `dummy_start` up; everything below
/// is an original vertex. Dummies carry no label and zero size.
#[derive(Debug, Clone)]
pub struct Expansion {
    pub graph: Graph,
    pub layer: Vec<usize>,
    pub dummy_start: usize,
}

/// Break every edge spanning more than one layer into a chain of unit-span
/// edges through freshly appended dummy vertices
///
/// The adjacency list is append-only with stable indices, scanned with a
/// `while v < len` loop so appended dummies are picked up by the same pass.
/// A long edge `v -> w` is re-targeted at a dummy on `layer[v] + 1`; the
/// dummy inherits the edge to `w` and, still spanning too far, gets split
/// again when the scan reaches it. Afterwards every edge satisfies
/// `layer[w] == layer[v] + 1`.
pub(crate) fn expand(graph: &Graph, layers: &[usize]) -> Expansion {
    let mut adj: Vec<Vec<usize>> = graph.adjacency().to_vec();
    let mut layer = layers.to_vec();
    let dummy_start = adj.len();

    let mut v = 0;
    while v < adj.len() {
        for slot in 0..adj[v].len() {
            let w = adj[v][slot];
            if layer[w] > layer[v] + 1 {
                let dummy = adj.len();
                layer.push(layer[v] + 1);
                adj.push(vec![w]);
                adj[v][slot] = dummy;
            }
        }
        v += 1;
    }

    trace!(
        "expansion added {} dummy vertices",
        adj.len() - dummy_start
    );
    Expansion {
        graph: Graph::from_adjacency_unchecked(adj),
        layer,
        dummy_start,
    }
}
