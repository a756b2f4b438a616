//! # potts
//!
//! Community detection in signed, directed, weighted networks with the
//! Constant Potts Model.
//!
//! Nodes are grouped to minimize the CPM Hamiltonian: a hierarchical greedy
//! (Louvain-style) optimizer, a refinement pass that re-detects inside each
//! group to escape local optima, and a final split into positively
//! connected components.
//!
//! ```rust
//! use potts::{CpmDetector, DetectionConfig, SparseGraph};
//!
//! // two positive pairs, kept apart by a negative edge
//! let edges = [(10, 11, 1.0), (11, 10, 1.0), (20, 21, 1.0), (21, 20, 1.0), (11, 20, -2.0)];
//! let graph = SparseGraph::from_edges(edges)?;
//!
//! let config = DetectionConfig::default().with_resolution(0.1).with_refine_count(1);
//! let groups = CpmDetector::new(config)?.detect(&graph)?;
//!
//! assert_eq!(groups, vec![0, 0, 1, 1]);
//! assert_eq!(graph.raw_id(2), 20);
//! # Ok::<(), potts::Error>(())
//! ```
//!
//! ## Layout
//!
//! - [`relation`]: edge lists with explicit sort/duplicate/normalization state
//!   and id lineage.
//! - [`graph`]: sparse row-indexed graphs and their signed split.
//! - [`community`]: the objective, optimizer pipeline and worker pool.
//! - [`io`]: edge list and partition text formats.
//! - [`partition`]: the DISCARD sentinel, renumbering and comparison metrics.

pub mod community;
pub mod config;
/// Error types used across `potts`.
pub mod error;
pub mod graph;
pub mod io;
pub mod partition;
pub mod relation;

pub use community::{CommunityDetection, Cpm, CpmDetector};
pub use config::DetectionConfig;
pub use error::{Error, Result};
pub use graph::{SignedGraph, SparseGraph};
pub use partition::{ari, nmi, DISCARD};
pub use relation::RelationList;
