use crate::solver::{Problem, Relation, Solver};
use crate::{Graph, LayoutError, Point};
use tracing::debug;

/// Weight of an edge's horizontal deviation in the coordinate objective
///
/// Bends in long edges are penalized hardest, after Gansner et al.: a
/// segment between two dummies belongs to the interior of a long edge and
/// should stay as straight as possible.
fn deviation_weight(u: usize, w: usize, dummy_start: usize) -> f64 {
    match (u >= dummy_start, w >= dummy_start) {
        (false, false) => 1.0,
        (true, true) => 8.0,
        _ => 2.0,
    }
}

/// Assign coordinates by linear program
///
/// One continuous variable per vertex of the expanded graph. Consecutive
/// vertices in each layer's order are kept at least
/// `(width_a + width_b) / 2 + xsep` apart, which pins the chosen order; per
/// edge, a non-negative auxiliary variable bounds `|x_u − x_w|` and the
/// weighted sum of auxiliaries is minimized. The vertical coordinate is not
/// optimized: `y = (layer − 1) · ysep`.
///
/// # Errors
/// Solver failures (including infeasibility) are propagated; no fallback
/// coordinates are produced.
pub(crate) fn assign_coordinates<S: Solver>(
    graph: &Graph,
    layer: &[usize],
    ordering: &[Vec<usize>],
    widths: &[f64],
    dummy_start: usize,
    xsep: f64,
    ysep: f64,
    solver: &S,
) -> Result<Vec<Point>, LayoutError> {
    let n = graph.vertex_count();
    let mut problem = Problem::new();

    let xs: Vec<_> = (0..n).map(|_| problem.add_continuous(0.0)).collect();

    // Minimum separation between horizontal neighbors.
    for members in ordering {
        for pair in members.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let gap = (widths[a] + widths[b]) / 2.0 + xsep;
            problem.add_constraint(
                vec![(xs[b], 1.0), (xs[a], -1.0)],
                Relation::GreaterEq,
                gap,
            );
        }
    }

    // Auxiliary variable per edge bounding the endpoint misalignment.
    for (u, w) in graph.edges() {
        let deviation = problem.add_continuous(0.0);
        problem.add_objective_term(deviation, deviation_weight(u, w, dummy_start));

        // deviation >= x_u - x_w and deviation >= x_w - x_u
        problem.add_constraint(
            vec![(deviation, 1.0), (xs[u], -1.0), (xs[w], 1.0)],
            Relation::GreaterEq,
            0.0,
        );
        problem.add_constraint(
            vec![(deviation, 1.0), (xs[u], 1.0), (xs[w], -1.0)],
            Relation::GreaterEq,
            0.0,
        );
    }

    debug!(
        "coordinate LP: {} variables, {} constraints",
        problem.variable_count(),
        problem.constraints().len()
    );
    let values = solver.solve(&problem)?;

    Ok((0..n)
        .map(|v| Point::new(values[xs[v]], (layer[v] - 1) as f64 * ysep))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::MicroLp;
    use test_log::test;

    #[test]
    fn spacing_invariant_holds() {
        // A fan: one source over three targets.
        let graph =
            Graph::from_adjacency(vec![vec![1, 2, 3], vec![], vec![], vec![]]).unwrap();
        let layer = vec![1, 2, 2, 2];
        let ordering = vec![vec![0], vec![1, 2, 3]];
        let widths = vec![1.0; 4];

        let positions = assign_coordinates(
            &graph, &layer, &ordering, &widths, 4, 0.5, 1.0, &MicroLp,
        )
        .unwrap();

        for pair in ordering[1].windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let gap = positions[b].x - positions[a].x;
            assert!(gap >= 1.0 + 0.5 - 1e-6, "gap between {a} and {b} is {gap}");
        }
    }

    #[test]
    fn chains_line_up_when_unconstrained() {
        // Two parallel chains; nothing forces misalignment, so each edge's
        // deviation should optimize to zero.
        let graph = Graph::from_adjacency(vec![
            vec![2],
            vec![3],
            vec![4],
            vec![5],
            vec![],
            vec![],
        ])
        .unwrap();
        let layer = vec![1, 1, 2, 2, 3, 3];
        let ordering = vec![vec![0, 1], vec![2, 3], vec![4, 5]];
        let widths = vec![1.0; 6];

        let positions = assign_coordinates(
            &graph, &layer, &ordering, &widths, 6, 0.5, 1.0, &MicroLp,
        )
        .unwrap();

        assert!((positions[0].x - positions[2].x).abs() < 1e-6);
        assert!((positions[2].x - positions[4].x).abs() < 1e-6);
        assert!((positions[1].x - positions[3].x).abs() < 1e-6);
    }

    #[test]
    fn vertical_coordinate_follows_the_layer() {
        let graph = Graph::from_adjacency(vec![vec![1], vec![2], vec![]]).unwrap();
        let layer = vec![1, 2, 3];
        let ordering = vec![vec![0], vec![1], vec![2]];
        let widths = vec![1.0; 3];

        let positions = assign_coordinates(
            &graph, &layer, &ordering, &widths, 3, 0.5, 40.0, &MicroLp,
        )
        .unwrap();

        assert_eq!(positions[0].y, 0.0);
        assert_eq!(positions[1].y, 40.0);
        assert_eq!(positions[2].y, 80.0);
    }

    #[test]
    fn dummy_widths_do_not_consume_space() {
        // Layer 2 holds a real vertex and a zero-width dummy.
        let graph = Graph::from_adjacency(vec![
            vec![1, 3],
            vec![2],
            vec![],
            vec![2],
        ])
        .unwrap();
        let layer = vec![1, 2, 3, 2];
        let ordering = vec![vec![0], vec![1, 3], vec![2]];
        let widths = vec![1.0, 1.0, 1.0, 0.0];

        let positions = assign_coordinates(
            &graph, &layer, &ordering, &widths, 3, 0.5, 1.0, &MicroLp,
        )
        .unwrap();

        let gap = positions[3].x - positions[1].x;
        assert!(gap >= 0.5 + 0.5 - 1e-6, "gap is {gap}");
    }
}
