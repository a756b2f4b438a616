//! Refinement: split converged groups, then let the pieces move again.
//!
//! Greedy moves get stuck when a group would only improve by shedding a
//! whole subset of its nodes at once. Refinement looks inside each group:
//!
//! 1. Decompose the graph by the current partition P (inter-group edges
//!    dropped) and detect every piece from singletons.
//! 2. A piece that splits is decomposed again by its own result; splitting
//!    continues breadth-first until pieces hold together or fall under
//!    `min_refine_nodes`. Each surviving piece becomes one group of a finer
//!    partition Q.
//! 3. Fold the graph by Q, seed detection with P's groups, and expand.
//!
//! Each wave of piece detections goes through the [`Scheduler`]; large
//! pieces run on the pool, small ones inline. Piece seeds depend only on
//! the base seed and the piece's smallest node, so the thread count never
//! changes the result.

use super::hierarchical::{expand, HierarchicalDetector};
use super::scheduler::Scheduler;
use crate::config::DetectionConfig;
use crate::error::Result;
use crate::graph::SignedGraph;
use crate::partition::{self, DISCARD};
use tracing::{debug, Span};

/// A sub-graph awaiting detection and the nodes of the refined graph it
/// stands for (ascending).
struct Piece {
    graph: SignedGraph,
    members: Vec<usize>,
}

/// Decompose-and-redetect refinement.
#[derive(Debug)]
pub struct Refiner<'a> {
    hierarchy: &'a HierarchicalDetector,
    scheduler: &'a Scheduler,
    min_refine_nodes: usize,
    parallel_edge_threshold: usize,
    span: Span,
}

impl<'a> Refiner<'a> {
    /// Create a refiner that detects with `hierarchy` and dispatches large
    /// pieces to `scheduler`.
    pub fn new(
        hierarchy: &'a HierarchicalDetector,
        scheduler: &'a Scheduler,
        config: &DetectionConfig,
    ) -> Self {
        Self {
            hierarchy,
            scheduler,
            min_refine_nodes: config.min_refine_nodes,
            parallel_edge_threshold: config.parallel_edge_threshold,
            span: Span::current(),
        }
    }

    /// Emit events inside `span`, also from worker threads.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Run up to `cycles` refine → detect cycles, stopping at a fixed point.
    pub fn run(
        &self,
        graph: &SignedGraph,
        mut partition: Vec<usize>,
        cycles: usize,
    ) -> Result<Vec<usize>> {
        for cycle in 0..cycles {
            match self.cycle(graph, &partition)? {
                Some(next) => {
                    let groups = partition::group_count(&next)?;
                    debug!(parent: &self.span, cycle, groups, "refine cycle");
                    partition = next;
                }
                None => {
                    debug!(parent: &self.span, cycle, "refinement reached a fixed point");
                    break;
                }
            }
        }
        Ok(partition)
    }

    /// One refine → detect cycle. `None` if no group split.
    pub fn cycle(&self, graph: &SignedGraph, partition: &[usize]) -> Result<Option<Vec<usize>>> {
        let Some(finer) = self.split(graph, partition)? else {
            return Ok(None);
        };

        let groups = partition::group_count(&finer)?;
        let mut seed = vec![DISCARD; groups];
        for (node, &f) in finer.iter().enumerate() {
            if f != DISCARD {
                seed[f] = partition[node];
            }
        }

        let folded = graph.fold(&finer)?;
        let coarse = self.hierarchy.detect(&folded, seed)?;
        Ok(Some(expand(&finer, &coarse)))
    }

    /// Finer partition Q nested in `partition`, or `None` if no group of
    /// `partition` splits.
    pub fn split(&self, graph: &SignedGraph, partition: &[usize]) -> Result<Option<Vec<usize>>> {
        let groups = partition::group_count(partition)?;
        let mut wave: Vec<Piece> = graph
            .decompose(partition)?
            .into_iter()
            .zip(partition::members(partition, groups))
            .map(|(graph, members)| Piece { graph, members })
            .collect();

        let mut refined = vec![DISCARD; partition.len()];
        let mut offset = 0usize;
        let mut first_wave = true;

        while !wave.is_empty() {
            let results = self.detect_wave(&wave)?;
            let mut next_wave = Vec::new();
            let mut splits = 0usize;

            for (piece, sub) in wave.into_iter().zip(results) {
                let sub = match sub {
                    Some(sub) if partition::group_count(&sub)? > 1 => sub,
                    _ => {
                        for &m in &piece.members {
                            refined[m] = offset;
                        }
                        offset += 1;
                        continue;
                    }
                };

                splits += 1;
                let parts = piece.graph.decompose(&sub)?;
                let local = partition::members(&sub, parts.len());
                for (graph, local) in parts.into_iter().zip(local) {
                    let members = local.into_iter().map(|i| piece.members[i]).collect();
                    next_wave.push(Piece { graph, members });
                }
            }

            debug!(
                parent: &self.span,
                emitted = offset,
                pending = next_wave.len(),
                splits,
                "refinement wave"
            );
            if first_wave && splits == 0 {
                return Ok(None);
            }
            first_wave = false;
            wave = next_wave;
        }

        Ok(Some(refined))
    }

    /// Detect every piece from singletons; `None` for base cases.
    fn detect_wave(&self, wave: &[Piece]) -> Result<Vec<Option<Vec<usize>>>> {
        let detect = |piece: &Piece| -> Result<Option<Vec<usize>>> {
            if piece.graph.node_count() < self.min_refine_nodes.max(2) {
                return Ok(None);
            }
            let seed = piece_seed(self.hierarchy.seed(), piece.members[0]);
            let start = partition::identity(piece.graph.node_count());
            let _entered = self.span.enter();
            self.hierarchy
                .detect_with_seed(&piece.graph, start, seed)
                .map(Some)
        };

        let threshold = self.parallel_edge_threshold;
        let (large, small): (Vec<usize>, Vec<usize>) =
            (0..wave.len()).partition(|&i| wave[i].graph.edge_count() > threshold);

        let mut results: Vec<Option<Vec<usize>>> = vec![None; wave.len()];
        if !large.is_empty() {
            let tasks = large
                .iter()
                .map(|&i| (wave[i].graph.edge_count(), &wave[i]))
                .collect();
            let done = self.scheduler.run(tasks, &detect)?;
            for (i, r) in large.into_iter().zip(done) {
                results[i] = r;
            }
        }
        for i in small {
            results[i] = detect(&wave[i])?;
        }
        Ok(results)
    }
}

/// Seed for the piece whose smallest node is `first`.
fn piece_seed(base: u64, first: usize) -> u64 {
    // splitmix64 step, so neighboring ids get unrelated streams
    let mut z = base ^ (first as u64).wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
