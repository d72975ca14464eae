//! Layered (Sugiyama-style) layout for directed acyclic graphs
//!
//! The pipeline runs four stages: longest-path layer assignment, dummy-vertex
//! expansion so every edge spans exactly one layer, crossing minimization
//! (barycentric sweeps or an ILP-optimal ordering), and LP-based horizontal
//! coordinate assignment. The caller gets positions for the original and the
//! dummy vertices plus the expanded adjacency, so edges through dummies can
//! be drawn as multi-segment paths.

mod expand;
mod layers;
mod ordering;
mod positions;

pub use ordering::{count_crossings, OrderingStrategy};

use crate::solver::{MicroLp, Solver};
use crate::{Graph, LayoutEngine, LayoutError, NodeSizes, Point, UnitSizes, Vec2};
use expand::Expansion;
use tracing::debug;

/// Configuration for the layered DAG layout
#[derive(Debug, Clone)]
pub struct LayeredLayout<S = MicroLp> {
    /// Crossing minimization strategy
    pub ordering: OrderingStrategy,

    /// Minimum horizontal gap between neighboring vertices in a layer,
    /// measured between their boundaries
    pub xsep: f64,

    /// Vertical distance between consecutive layers
    pub ysep: f64,

    /// Solver backing the ordering ILP and the coordinate LP
    pub solver: S,
}

impl Default for LayeredLayout {
    fn default() -> Self {
        Self {
            ordering: OrderingStrategy::default(),
            xsep: 1.0,
            ysep: 1.0,
            solver: MicroLp,
        }
    }
}

impl LayeredLayout {
    /// Create a layout with the given ordering strategy and default spacing
    pub fn new(ordering: OrderingStrategy) -> Self {
        Self {
            ordering,
            ..Default::default()
        }
    }
}

impl<S: Solver> LayeredLayout<S> {
    /// Create a layout backed by a custom solver
    pub fn with_solver(solver: S) -> Self {
        Self {
            ordering: OrderingStrategy::default(),
            xsep: 1.0,
            ysep: 1.0,
            solver,
        }
    }

    /// Run the full pipeline
    ///
    /// # Errors
    /// Fails on cyclic input and on solver failures; no partial layout is
    /// ever returned.
    pub fn compute(
        &self,
        graph: &Graph,
        sizes: &impl NodeSizes,
    ) -> Result<LayeredLayoutResult, LayoutError> {
        let n = graph.vertex_count();
        if n <= 1 {
            return Ok(LayeredLayoutResult {
                positions: vec![Point::origin(); n],
                graph: graph.clone(),
                layers: vec![1; n],
                ordering: if n == 1 { vec![vec![0]] } else { Vec::new() },
                dummy_start: n,
                crossings: 0,
            });
        }

        let layer = layers::assign_layers(graph)?;
        let Expansion {
            graph: expanded,
            layer,
            dummy_start,
        } = expand::expand(graph, &layer);

        let ordering = match self.ordering {
            OrderingStrategy::Barycenter { sweeps } => {
                ordering::order_barycenter(&expanded, &layer, sweeps)
            }
            OrderingStrategy::Optimal => ordering::order_optimal(&expanded, &layer, &self.solver)?,
        };
        let crossings = ordering::count_crossings(&expanded, &ordering);
        debug!(
            "layered layout: {} layers, {} dummies, {} crossings",
            ordering.len(),
            expanded.vertex_count() - dummy_start,
            crossings
        );

        let widths: Vec<f64> = (0..expanded.vertex_count())
            .map(|v| if v < dummy_start { sizes.size(v).x } else { 0.0 })
            .collect();
        let positions = positions::assign_coordinates(
            &expanded,
            &layer,
            &ordering,
            &widths,
            dummy_start,
            self.xsep,
            self.ysep,
            &self.solver,
        )?;

        Ok(LayeredLayoutResult {
            positions,
            graph: expanded,
            layers: layer,
            ordering,
            dummy_start,
            crossings,
        })
    }

    /// Run the full pipeline with explicit per-vertex sizes
    ///
    /// # Errors
    /// Additionally to [`compute`](Self::compute), fails with
    /// [`LayoutError::ShapeMismatch`] when `sizes` does not hold exactly one
    /// entry per vertex of the input graph.
    pub fn layout_with_sizes(
        &self,
        graph: &Graph,
        sizes: &[Vec2],
    ) -> Result<LayeredLayoutResult, LayoutError> {
        if sizes.len() != graph.vertex_count() {
            return Err(LayoutError::ShapeMismatch {
                expected: graph.vertex_count(),
                actual: sizes.len(),
            });
        }
        self.compute(graph, &sizes)
    }
}

impl<S: Solver> LayoutEngine for LayeredLayout<S> {
    fn layout(&self, graph: &Graph) -> Result<Vec<Point>, LayoutError> {
        Ok(self.compute(graph, &UnitSizes)?.positions)
    }
}

/// Everything the pipeline produces
///
/// `positions` is aligned to vertex index of the expanded graph: original
/// vertices first, dummy vertices from `dummy_start` up. A renderer draws
/// each original edge by following the expanded adjacency through its dummy
/// chain.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredLayoutResult {
    /// Position per vertex, dummies included
    pub positions: Vec<Point>,

    /// The expanded graph (original plus dummy vertices)
    pub graph: Graph,

    /// Layer per vertex of the expanded graph, starting at 1
    pub layers: Vec<usize>,

    /// Left-to-right vertex order per layer, indexed by `layer - 1`;
    /// retained mostly for debugging
    pub ordering: Vec<Vec<usize>>,

    /// First dummy vertex index; everything below is an original vertex
    pub dummy_start: usize,

    /// Edge crossings implied by the chosen ordering (quality metric)
    pub crossings: usize,
}
