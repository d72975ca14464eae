use crate::{Graph, LayoutEngine, LayoutError, Point, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Force-directed (Fruchterman–Reingold) layout engine
///
/// Vertices start at seeded random positions in `[-1, 1]²` and are moved by
/// pairwise forces for a fixed number of iterations; edge direction is
/// ignored. Adjacent pairs attract at long range and repel at short range,
/// non-adjacent pairs feel only the weak `d/k` pull. A `1/iteration` cooling
/// schedule clamps per-axis displacement, and the final positions are
/// recentered and rescaled so each axis spans `[-1, 1]`.
///
/// Runs in O(n² · max_iterations) with no early termination. Output is
/// deterministic for a fixed seed and parameter set.
#[derive(Debug, Clone)]
pub struct SpringLayout {
    /// Scale factor for the optimal inter-vertex distance `k = c·sqrt(4/n)`
    pub c: f64,

    /// Number of simulation iterations
    pub max_iterations: usize,

    /// Starting temperature of the cooling schedule
    pub initial_temperature: f64,

    /// Seed for the initial random placement
    pub seed: u64,
}

impl Default for SpringLayout {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iterations: 50,
            initial_temperature: 0.1,
            seed: 0,
        }
    }
}

impl LayoutEngine for SpringLayout {
    fn layout(&self, graph: &Graph) -> Result<Vec<Point>, LayoutError> {
        let n = graph.vertex_count();
        if n == 0 {
            return Ok(Vec::new());
        }
        if n == 1 {
            return Ok(vec![Point::origin()]);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut positions: Vec<Point> = (0..n)
            .map(|_| {
                Point::new(
                    rng.gen_range(-1.0..=1.0),
                    rng.gen_range(-1.0..=1.0),
                )
            })
            .collect();

        // Symmetric adjacency bitmap for the O(1) pair test in the inner loop.
        let mut adjacent = vec![false; n * n];
        for (v, w) in graph.edges() {
            adjacent[v * n + w] = true;
            adjacent[w * n + v] = true;
        }

        let k = self.c * (4.0 / n as f64).sqrt();
        debug!("spring layout: {n} vertices, k = {k}");

        for iteration in 1..=self.max_iterations {
            let temperature = self.initial_temperature / iteration as f64;

            let mut forces = vec![Vec2::zero(); n];
            for i in 0..n {
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let delta = positions[j] - positions[i];
                    let distance = delta.length();
                    if distance == 0.0 {
                        // Coincident pair: no direction, no force.
                        continue;
                    }
                    let force = if adjacent[i * n + j] {
                        distance / k - (k * k) / (distance * distance)
                    } else {
                        distance / k
                    };
                    forces[i] += delta * force;
                }
            }

            for (position, force) in positions.iter_mut().zip(&forces) {
                position.x += force.x.clamp(-temperature, temperature);
                position.y += force.y.clamp(-temperature, temperature);
            }
        }

        normalize(&mut positions);
        Ok(positions)
    }
}

/// Recenter on the mean and rescale each axis independently so the maximum
/// absolute coordinate is 1. An axis on which all values coincide is left
/// unscaled rather than divided by zero.
fn normalize(positions: &mut [Point]) {
    let n = positions.len() as f64;
    let mean_x = positions.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = positions.iter().map(|p| p.y).sum::<f64>() / n;
    for p in positions.iter_mut() {
        p.x -= mean_x;
        p.y -= mean_y;
    }

    let max_x = positions.iter().map(|p| p.x.abs()).fold(0.0, f64::max);
    let max_y = positions.iter().map(|p| p.y.abs()).fold(0.0, f64::max);
    for p in positions.iter_mut() {
        if max_x > 0.0 {
            p.x /= max_x;
        }
        if max_y > 0.0 {
            p.y /= max_y;
        }
    }
}
