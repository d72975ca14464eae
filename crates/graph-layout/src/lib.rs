//! Generic graph layout algorithms
//!
//! This crate computes 2D vertex coordinates for directed graphs. Three
//! engines are provided behind the common [`LayoutEngine`] trait:
//!
//! - [`SpringLayout`]: force-directed Fruchterman–Reingold simulation
//! - [`StressMajorization`]: graph-distance-driven stress minimization
//! - [`LayeredLayout`]: Sugiyama-style hierarchical layout for DAGs, with
//!   heuristic or ILP-optimal crossing minimization and LP-based coordinate
//!   assignment
//!
//! All engines are stateless and deterministic for a fixed configuration;
//! the iterative engines take an explicit RNG seed. Rendering is out of
//! scope: the output is a position list (plus, for the layered engine, the
//! expanded graph and per-layer ordering) for an external renderer.
//!
//! # Example
//!
//! ```
//! use graph_layout::{Graph, LayoutEngine, SpringLayout};
//!
//! // A small chain: 0 -> 1 -> 2
//! let graph = Graph::from_adjacency(vec![vec![1], vec![2], vec![]]).unwrap();
//!
//! let positions = SpringLayout::default().layout(&graph).unwrap();
//! assert_eq!(positions.len(), 3);
//! ```
//!
//! Graphs can also be built from anything implementing petgraph's visitor
//! traits via [`Graph::from_petgraph`].

mod engine;
mod error;
mod geometry;
mod graph;
mod sizes;

pub mod layered;
pub mod solver;
pub mod spring;
pub mod stress;

// Re-export core types and traits
pub use engine::LayoutEngine;
pub use error::LayoutError;
pub use geometry::{Point, Vec2};
pub use graph::Graph;
pub use sizes::{NodeSizes, UnitSizes};

// Re-export the layout engines and their companion types
pub use layered::{count_crossings, LayeredLayout, LayeredLayoutResult, OrderingStrategy};
pub use solver::{MicroLp, Solver};
pub use spring::SpringLayout;
pub use stress::StressMajorization;
