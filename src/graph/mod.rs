//! Graph views over normalized relation lists.
//!
//! - [`SparseGraph`]: compressed sparse rows plus optional per-node
//!   attributes. Supports transpose, filter, decompose and fold, each of
//!   which keeps node ids traceable to the caller's raw ids.
//! - [`SignedGraph`]: a `SparseGraph` split into its positive and (optional)
//!   negative layers, each paired with its transpose. This is the form the
//!   optimizer consumes; folds and decompositions apply to each layer.
//!
//! ```text
//!          SparseGraph ─┬─ filter(0, ∞)  ─▶ positive ─┬─ forward
//!                       │                              └─ backward (transpose)
//!                       └─ filter(-∞, 0) ─▶ |negative| ┬─ forward
//!                                                      └─ backward
//! ```

mod signed;
mod sparse;

pub use signed::{Layer, SignedGraph};
pub use sparse::{SparseGraph, SIZE_ATTRIBUTE};
