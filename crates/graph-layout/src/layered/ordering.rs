use crate::solver::{Problem, Relation, Solver, VariableId};
use crate::{Graph, LayoutError};
use std::collections::HashMap;
use tracing::debug;

/// How the per-layer vertex order is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingStrategy {
    /// Barycentric sweeps: fast, good in practice, no optimality guarantee
    Barycenter {
        /// Number of down/up sweep rounds
        sweeps: usize,
    },

    /// Integer program minimizing the exact crossing count; exponentially
    /// more expensive, intended for small graphs
    Optimal,
}

impl Default for OrderingStrategy {
    fn default() -> Self {
        OrderingStrategy::Barycenter { sweeps: 5 }
    }
}

/// Group vertices by layer, in vertex-index order within each layer
///
/// The result is indexed by `layer - 1`.
pub(crate) fn initial_ordering(layers: &[usize]) -> Vec<Vec<usize>> {
    let depth = layers.iter().copied().max().unwrap_or(0);
    let mut ordering = vec![Vec::new(); depth];
    for (v, &layer) in layers.iter().enumerate() {
        ordering[layer - 1].push(v);
    }
    ordering
}

/// Count edge crossings implied by a per-layer ordering
///
/// Expects the unit-span (expanded) graph: every edge must connect
/// consecutive layers. Two edges between the same pair of layers cross iff
/// their endpoint orders disagree.
pub fn count_crossings(graph: &Graph, ordering: &[Vec<usize>]) -> usize {
    let mut rank = vec![0usize; graph.vertex_count()];
    for layer in ordering {
        for (position, &v) in layer.iter().enumerate() {
            rank[v] = position;
        }
    }

    let mut crossings = 0;
    for window in ordering.windows(2) {
        let edges: Vec<(usize, usize)> = window[0]
            .iter()
            .flat_map(|&u| {
                let rank = &rank;
                graph.successors(u).iter().map(move |&w| (rank[u], rank[w]))
            })
            .collect();

        for (i, a) in edges.iter().enumerate() {
            for b in &edges[i + 1..] {
                if (a.0 < b.0 && a.1 > b.1) || (a.0 > b.0 && a.1 < b.1) {
                    crossings += 1;
                }
            }
        }
    }
    crossings
}

/// Barycentric crossing minimization
///
/// Starts from index order and runs a fixed number of sweep rounds; there is
/// no convergence check. The down pass reorders each layer by the mean rank
/// of its predecessors, the up pass reorders by successors against the ranks
/// the down pass just produced. Vertices without neighbors in the reference
/// layer keep their current rank as sort key.
pub(crate) fn order_barycenter(graph: &Graph, layers: &[usize], sweeps: usize) -> Vec<Vec<usize>> {
    let n = graph.vertex_count();
    let mut ordering = initial_ordering(layers);

    let successors = graph.adjacency();
    let mut predecessors = vec![Vec::new(); n];
    for (v, w) in graph.edges() {
        predecessors[w].push(v);
    }

    let mut rank = vec![0usize; n];
    for layer in &ordering {
        for (position, &v) in layer.iter().enumerate() {
            rank[v] = position;
        }
    }

    for _ in 0..sweeps {
        // Down: reorder layer L+1 by the barycenter of predecessors in L.
        for l in 1..ordering.len() {
            reorder_by_barycenter(&mut ordering[l], &predecessors, &mut rank);
        }
        // Up: reorder layer L by the barycenter of successors in L+1.
        for l in (0..ordering.len().saturating_sub(1)).rev() {
            reorder_by_barycenter(&mut ordering[l], successors, &mut rank);
        }
    }

    ordering
}

fn reorder_by_barycenter(
    layer: &mut [usize],
    neighbors: &[Vec<usize>],
    rank: &mut [usize],
) {
    let mut keyed: Vec<(f64, usize)> = layer
        .iter()
        .map(|&v| {
            let adjacent = &neighbors[v];
            let barycenter = if adjacent.is_empty() {
                rank[v] as f64
            } else {
                adjacent.iter().map(|&u| rank[u] as f64).sum::<f64>() / adjacent.len() as f64
            };
            (barycenter, v)
        })
        .collect();

    keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    for (position, &(_, v)) in keyed.iter().enumerate() {
        layer[position] = v;
        rank[v] = position;
    }
}

/// Exact crossing minimization via one integer program over all layers
///
/// For every layer, a binary variable per vertex pair encodes "i precedes
/// j"; the reverse orientation is the complement, and transitivity
/// constraints make each layer's variables a total order. Every pair of
/// edges between consecutive layers with distinct endpoints gets a binary
/// crossing indicator bounded below by the disagreement of the two order
/// variables, and the sum of indicators is minimized.
pub(crate) fn order_optimal<S: Solver>(
    graph: &Graph,
    layers: &[usize],
    solver: &S,
) -> Result<Vec<Vec<usize>>, LayoutError> {
    let members = initial_ordering(layers);
    if members.len() < 2 {
        return Ok(members);
    }

    let mut local = vec![0usize; graph.vertex_count()];
    for layer in &members {
        for (position, &v) in layer.iter().enumerate() {
            local[v] = position;
        }
    }

    let mut problem = Problem::new();

    // "i precedes j" variables, one per unordered pair within a layer.
    let pair_vars: Vec<HashMap<(usize, usize), VariableId>> = members
        .iter()
        .map(|layer| {
            let mut vars = HashMap::new();
            for i in 0..layer.len() {
                for j in i + 1..layer.len() {
                    vars.insert((i, j), problem.add_binary());
                }
            }
            vars
        })
        .collect();

    // "i precedes j" as `sign * var + offset`, folding in complementarity.
    let before = |layer: usize, i: usize, j: usize| -> (VariableId, f64, f64) {
        if i < j {
            (pair_vars[layer][&(i, j)], 1.0, 0.0)
        } else {
            (pair_vars[layer][&(j, i)], -1.0, 1.0)
        }
    };

    // Transitivity: 0 <= x[i,j] + x[j,k] - x[i,k] <= 1 for every triple.
    for (layer, vars) in pair_vars.iter().enumerate() {
        let size = members[layer].len();
        for i in 0..size {
            for j in i + 1..size {
                for k in j + 1..size {
                    let terms = vec![
                        (vars[&(i, j)], 1.0),
                        (vars[&(j, k)], 1.0),
                        (vars[&(i, k)], -1.0),
                    ];
                    problem.add_constraint(terms.clone(), Relation::LessEq, 1.0);
                    problem.add_constraint(terms, Relation::GreaterEq, 0.0);
                }
            }
        }
    }

    // One crossing indicator per pair of edges between consecutive layers.
    for l in 0..members.len() - 1 {
        let edges: Vec<(usize, usize)> = members[l]
            .iter()
            .flat_map(|&u| {
                let local = &local;
                graph
                    .successors(u)
                    .iter()
                    .map(move |&w| (local[u], local[w]))
            })
            .collect();

        for (i, &(u1, w1)) in edges.iter().enumerate() {
            for &(u2, w2) in &edges[i + 1..] {
                if u1 == u2 || w1 == w2 {
                    // Shared endpoint: these edges cannot cross.
                    continue;
                }
                let crossing = problem.add_binary();
                problem.add_objective_term(crossing, 1.0);

                let (uv, us, uk) = before(l, u1, u2);
                let (wv, ws, wk) = before(l + 1, w1, w2);

                // crossing >= (u1 before u2) - (w1 before w2), and the mirror
                problem.add_constraint(
                    vec![(crossing, 1.0), (uv, -us), (wv, ws)],
                    Relation::GreaterEq,
                    uk - wk,
                );
                problem.add_constraint(
                    vec![(crossing, 1.0), (uv, us), (wv, -ws)],
                    Relation::GreaterEq,
                    wk - uk,
                );
            }
        }
    }

    debug!(
        "ordering ILP: {} variables, {} constraints",
        problem.variable_count(),
        problem.constraints().len()
    );
    let values = solver.solve(&problem)?;

    // Order each layer by how many peers a vertex precedes: the leftmost
    // vertex precedes all others, the rightmost none.
    let ordering = members
        .iter()
        .enumerate()
        .map(|(layer, layer_members)| {
            let size = layer_members.len();
            let mut counted: Vec<(usize, usize)> = layer_members
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    let precedes = (0..size)
                        .filter(|&j| j != i)
                        .map(|j| {
                            let (var, sign, offset) = before(layer, i, j);
                            (sign * values[var] + offset).round() as usize
                        })
                        .sum::<usize>();
                    (precedes, v)
                })
                .collect();
            counted.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
            counted.into_iter().map(|(_, v)| v).collect()
        })
        .collect();

    Ok(ordering)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layered::expand::expand;
    use crate::layered::layers::assign_layers;
    use crate::solver::MicroLp;
    use test_log::test;

    fn assert_valid_ordering(layers: &[usize], ordering: &[Vec<usize>]) {
        for (index, layer) in ordering.iter().enumerate() {
            let mut expected: Vec<usize> = (0..layers.len())
                .filter(|&v| layers[v] == index + 1)
                .collect();
            let mut actual = layer.clone();
            expected.sort_unstable();
            actual.sort_unstable();
            assert_eq!(actual, expected, "layer {} is not a permutation", index + 1);
        }
    }

    /// Minimum crossing count over every combination of layer permutations
    fn brute_force_minimum(graph: &Graph, layers: &[usize]) -> usize {
        fn permutations(items: &[usize]) -> Vec<Vec<usize>> {
            if items.len() <= 1 {
                return vec![items.to_vec()];
            }
            let mut all = Vec::new();
            for (i, &first) in items.iter().enumerate() {
                let mut rest = items.to_vec();
                rest.remove(i);
                for mut tail in permutations(&rest) {
                    tail.insert(0, first);
                    all.push(tail);
                }
            }
            all
        }

        fn search(
            graph: &Graph,
            ordering: &mut Vec<Vec<usize>>,
            options: &[Vec<Vec<usize>>],
            best: &mut usize,
        ) {
            if ordering.len() == options.len() {
                *best = (*best).min(count_crossings(graph, ordering));
                return;
            }
            for candidate in &options[ordering.len()] {
                ordering.push(candidate.clone());
                search(graph, ordering, options, best);
                ordering.pop();
            }
        }

        let options: Vec<Vec<Vec<usize>>> = initial_ordering(layers)
            .iter()
            .map(|layer| permutations(layer))
            .collect();
        let mut best = usize::MAX;
        search(graph, &mut Vec::new(), &options, &mut best);
        best
    }

    #[test]
    fn barycenter_resolves_a_simple_crossing() {
        // 0 -> 3, 1 -> 2: index order crosses.
        let graph =
            Graph::from_adjacency(vec![vec![3], vec![2], vec![], vec![]]).unwrap();
        let layers = vec![1, 1, 2, 2];
        assert_eq!(count_crossings(&graph, &initial_ordering(&layers)), 1);

        let ordering = order_barycenter(&graph, &layers, 5);
        assert_valid_ordering(&layers, &ordering);
        assert_eq!(count_crossings(&graph, &ordering), 0);
    }

    #[test]
    fn barycenter_orderings_are_permutations() {
        let graph = Graph::from_adjacency(vec![
            vec![2, 3],
            vec![2, 4],
            vec![5],
            vec![5],
            vec![5],
            vec![],
        ])
        .unwrap();
        let layers = assign_layers(&graph).unwrap();
        let expansion = expand(&graph, &layers);

        let ordering = order_barycenter(&expansion.graph, &expansion.layer, 5);
        assert_valid_ordering(&expansion.layer, &ordering);
    }

    #[test]
    fn optimal_matches_brute_force_on_two_layers() {
        // Two layers of three vertices with a deliberately tangled wiring.
        let graph = Graph::from_adjacency(vec![
            vec![5],
            vec![3, 5],
            vec![4],
            vec![],
            vec![],
            vec![],
        ])
        .unwrap();
        let layers = vec![1, 1, 1, 2, 2, 2];

        let ordering = order_optimal(&graph, &layers, &MicroLp).unwrap();
        assert_valid_ordering(&layers, &ordering);
        assert_eq!(
            count_crossings(&graph, &ordering),
            brute_force_minimum(&graph, &layers)
        );
    }

    #[test]
    fn optimal_matches_brute_force_on_three_layers() {
        let graph = Graph::from_adjacency(vec![
            vec![2, 3],
            vec![2],
            vec![4],
            vec![5],
            vec![],
            vec![],
        ])
        .unwrap();
        let layers = vec![1, 1, 2, 2, 3, 3];

        let ordering = order_optimal(&graph, &layers, &MicroLp).unwrap();
        assert_valid_ordering(&layers, &ordering);
        assert_eq!(
            count_crossings(&graph, &ordering),
            brute_force_minimum(&graph, &layers)
        );
    }

    #[test]
    fn optimal_matches_brute_force_on_a_four_wide_layer() {
        // Four sources wired to three targets, reversing the index order.
        let graph = Graph::from_adjacency(vec![
            vec![6],
            vec![5],
            vec![4, 6],
            vec![4],
            vec![],
            vec![],
            vec![],
        ])
        .unwrap();
        let layers = vec![1, 1, 1, 1, 2, 2, 2];

        let ordering = order_optimal(&graph, &layers, &MicroLp).unwrap();
        assert_valid_ordering(&layers, &ordering);
        assert_eq!(
            count_crossings(&graph, &ordering),
            brute_force_minimum(&graph, &layers)
        );
    }

    #[test]
    fn optimal_handles_a_crossing_free_graph() {
        let graph = Graph::from_adjacency(vec![vec![2], vec![3], vec![], vec![]]).unwrap();
        let layers = vec![1, 1, 2, 2];

        let ordering = order_optimal(&graph, &layers, &MicroLp).unwrap();
        assert_valid_ordering(&layers, &ordering);
        assert_eq!(count_crossings(&graph, &ordering), 0);
    }

    #[test]
    fn crossing_count_on_the_known_tangle() {
        // 0 -> 3, 0 -> 4, 1 -> 3, 2 -> 4 in index order: only (0,4) and
        // (1,3) cross; every other pair shares an endpoint or is nested.
        let graph = Graph::from_adjacency(vec![
            vec![3, 4],
            vec![3],
            vec![4],
            vec![],
            vec![],
        ])
        .unwrap();
        let layers = vec![1, 1, 1, 2, 2];
        assert_eq!(count_crossings(&graph, &initial_ordering(&layers)), 1);
    }
}
