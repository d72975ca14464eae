use crate::{Graph, LayoutError};
use std::collections::VecDeque;
use tracing::trace;

/// Assign each vertex its longest-path layer, starting at 1
///
/// Works through an explicit queue of in-degree-zero vertices: draining a
/// vertex relaxes `layer[w] = max(layer[w], layer[v] + 1)` for each
/// successor and releases it once all its in-edges are accounted for. Every
/// source (and every isolated vertex) lands on layer 1; for every edge
/// `v -> w` the result satisfies `layer[w] > layer[v]`.
///
/// # Errors
/// Returns [`LayoutError::CyclicGraph`] if the queue drains before visiting
/// every vertex, which happens exactly when the graph contains a cycle.
pub(crate) fn assign_layers(graph: &Graph) -> Result<Vec<usize>, LayoutError> {
    let n = graph.vertex_count();
    let mut remaining_in = graph.in_degrees();
    let mut layer = vec![1usize; n];

    let mut queue: VecDeque<usize> = (0..n).filter(|&v| remaining_in[v] == 0).collect();
    let mut drained = 0;

    while let Some(v) = queue.pop_front() {
        drained += 1;
        for &w in graph.successors(v) {
            layer[w] = layer[w].max(layer[v] + 1);
            remaining_in[w] -= 1;
            if remaining_in[w] == 0 {
                queue.push_back(w);
            }
        }
    }

    if drained < n {
        return Err(LayoutError::CyclicGraph);
    }

    trace!("assigned {} vertices to layers", n);
    Ok(layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn diamond_with_shortcut() {
        // 0 -> 1, 0 -> 2, 0 -> 3, 1 -> 3, 2 -> 3
        let graph =
            Graph::from_adjacency(vec![vec![1, 2, 3], vec![3], vec![3], vec![]]).unwrap();
        assert_eq!(assign_layers(&graph).unwrap(), [1, 2, 2, 3]);
    }

    #[test]
    fn edges_always_point_to_deeper_layers() {
        let graph = Graph::from_adjacency(vec![
            vec![1, 4],
            vec![2],
            vec![3],
            vec![],
            vec![3],
            vec![0],
        ])
        .unwrap();
        let layer = assign_layers(&graph).unwrap();
        for (v, w) in graph.edges() {
            assert!(layer[w] > layer[v], "edge ({v}, {w}): {layer:?}");
        }
    }

    #[test]
    fn isolated_vertices_stay_on_the_first_layer() {
        let graph = Graph::new(3);
        assert_eq!(assign_layers(&graph).unwrap(), [1, 1, 1]);
    }

    #[test]
    fn cycle_is_rejected() {
        let graph = Graph::from_adjacency(vec![vec![1], vec![2], vec![0]]).unwrap();
        assert_eq!(assign_layers(&graph), Err(LayoutError::CyclicGraph));
    }

    #[test]
    fn self_loop_is_rejected() {
        let graph = Graph::from_adjacency(vec![vec![0], vec![]]).unwrap();
        assert_eq!(assign_layers(&graph), Err(LayoutError::CyclicGraph));
    }

    #[test]
    fn cycle_reachable_from_a_source_is_rejected() {
        // 0 -> 1 -> 2 -> 1
        let graph = Graph::from_adjacency(vec![vec![1], vec![2], vec![1]]).unwrap();
        assert_eq!(assign_layers(&graph), Err(LayoutError::CyclicGraph));
    }

    #[test]
    fn empty_graph() {
        assert_eq!(assign_layers(&Graph::new(0)).unwrap(), Vec::<usize>::new());
    }
}
