//! Detector interface over petgraph graphs.

use crate::error::Result;
use petgraph::graph::UnGraph;

/// A community detector that accepts petgraph's undirected graphs.
///
/// Callers that already hold a `petgraph` graph can use a detector without
/// building a [`SparseGraph`](crate::SparseGraph) themselves. Every edge is
/// read as a unit-weight positive link.
pub trait CommunityDetection {
    /// Group the nodes of `graph`.
    ///
    /// Entry `i` of the result is the group of `NodeIndex::new(i)`. Groups
    /// are dense and numbered by first appearance.
    fn detect<N, E>(&self, graph: &UnGraph<N, E>) -> Result<Vec<usize>>;

    /// Resolution the detector optimizes at. Higher values give smaller
    /// groups.
    fn resolution(&self) -> f64;
}
