use crate::{Graph, LayoutEngine, LayoutError, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

const UNREACHABLE: u32 = u32::MAX;

/// Stress-majorization layout engine
///
/// Target distances are unweighted shortest-path distances over the
/// undirected graph; pair weights are `d^-weight_exponent` (2 by default,
/// so close pairs dominate). Starting from seeded random positions, each
/// sweep repositions every vertex at the weighted average of its ideal
/// placements relative to all reachable vertices (a localized majorization
/// step), which never increases the stress
/// `Σ w_ij (‖x_i − x_j‖ − d_ij)²`. Sweeps stop when the relative stress
/// decrease falls below `epsilon` or `max_iterations` is reached.
///
/// Unreachable pairs carry no weight, so the components of a disconnected
/// graph converge independently. Output is centered on the mean but not
/// rescaled.
#[derive(Debug, Clone)]
pub struct StressMajorization {
    /// Relative stress decrease below which iteration stops
    pub epsilon: f64,

    /// Cap on the number of majorization sweeps
    pub max_iterations: usize,

    /// Exponent of the distance-based pair weights `w_ij = d_ij^-exponent`
    pub weight_exponent: f64,

    /// Seed for the initial random placement
    pub seed: u64,
}

impl Default for StressMajorization {
    fn default() -> Self {
        Self {
            epsilon: 1e-4,
            max_iterations: 300,
            weight_exponent: 2.0,
            seed: 0,
        }
    }
}

impl LayoutEngine for StressMajorization {
    fn layout(&self, graph: &Graph) -> Result<Vec<Point>, LayoutError> {
        let n = graph.vertex_count();
        if n == 0 {
            return Ok(Vec::new());
        }
        if n == 1 {
            return Ok(vec![Point::origin()]);
        }

        let distances = all_pairs_distances(graph);
        let weights = pair_weights(&distances, self.weight_exponent);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut positions: Vec<Point> = (0..n)
            .map(|_| {
                Point::new(
                    rng.gen_range(-1.0..=1.0),
                    rng.gen_range(-1.0..=1.0),
                )
            })
            .collect();

        let mut stress = stress_value(&positions, &distances, &weights);
        debug!("stress layout: {n} vertices, initial stress {stress}");

        for sweep in 0..self.max_iterations {
            majorization_sweep(&mut positions, &distances, &weights);

            let next = stress_value(&positions, &distances, &weights);
            let converged = stress > 0.0 && (stress - next) / stress < self.epsilon;
            stress = next;
            if converged || stress == 0.0 {
                debug!("stress layout converged after {} sweeps", sweep + 1);
                break;
            }
        }

        center(&mut positions);
        Ok(positions)
    }
}

/// One Gauss-Seidel pass: each vertex moves to the weighted average of the
/// positions its reachable peers would place it at, using updated positions
/// of vertices already visited this pass.
fn majorization_sweep(positions: &mut [Point], distances: &[Vec<u32>], weights: &[Vec<f64>]) {
    let n = positions.len();
    for i in 0..n {
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut weight_sum = 0.0;

        for j in 0..n {
            let weight = weights[i][j];
            if weight == 0.0 {
                continue;
            }
            let target = distances[i][j] as f64;

            let delta = positions[i] - positions[j];
            let length = delta.length();
            // Coincident points have no direction to push along; fall back
            // to the peer's own position.
            let (ideal_x, ideal_y) = if length > 0.0 {
                (
                    positions[j].x + target * delta.x / length,
                    positions[j].y + target * delta.y / length,
                )
            } else {
                (positions[j].x, positions[j].y)
            };

            sum_x += weight * ideal_x;
            sum_y += weight * ideal_y;
            weight_sum += weight;
        }

        if weight_sum > 0.0 {
            positions[i] = Point::new(sum_x / weight_sum, sum_y / weight_sum);
        }
    }
}

/// `Σ_{i<j} w_ij (‖x_i − x_j‖ − d_ij)²` over weighted pairs
fn stress_value(positions: &[Point], distances: &[Vec<u32>], weights: &[Vec<f64>]) -> f64 {
    let n = positions.len();
    let mut total = 0.0;
    for i in 0..n {
        for j in i + 1..n {
            let weight = weights[i][j];
            if weight == 0.0 {
                continue;
            }
            let gap = (positions[i] - positions[j]).length() - distances[i][j] as f64;
            total += weight * gap * gap;
        }
    }
    total
}

/// Unweighted BFS from every vertex over the undirected adjacency
fn all_pairs_distances(graph: &Graph) -> Vec<Vec<u32>> {
    let neighbors = graph.undirected_neighbors();
    let n = neighbors.len();
    let mut distances = vec![vec![UNREACHABLE; n]; n];

    let mut queue = std::collections::VecDeque::new();
    for source in 0..n {
        let row = &mut distances[source];
        row[source] = 0;
        queue.clear();
        queue.push_back(source);
        while let Some(v) = queue.pop_front() {
            for &w in &neighbors[v] {
                if row[w] == UNREACHABLE {
                    row[w] = row[v] + 1;
                    queue.push_back(w);
                }
            }
        }
    }

    distances
}

/// `d^-exponent` per reachable pair, zero for self and unreachable pairs
fn pair_weights(distances: &[Vec<u32>], exponent: f64) -> Vec<Vec<f64>> {
    distances
        .iter()
        .map(|row| {
            row.iter()
                .map(|&d| {
                    if d == 0 || d == UNREACHABLE {
                        0.0
                    } else {
                        (d as f64).powf(-exponent)
                    }
                })
                .collect()
        })
        .collect()
}

fn center(positions: &mut [Point]) {
    let n = positions.len() as f64;
    let mean_x = positions.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = positions.iter().map(|p| p.y).sum::<f64>() / n;
    for p in positions.iter_mut() {
        p.x -= mean_x;
        p.y -= mean_y;
    }
}
