//! Multi-level driver: greedy pass, fold, repeat, expand.
//!
//! Like Louvain's aggregation phase, each converged level is contracted so
//! whole groups can move together on the next level. The fold partitions
//! are kept on an explicit stack and replayed in reverse to map the top
//! level's groups back onto the input nodes.

use super::cpm::Cpm;
use super::greedy::GreedyPass;
use crate::config::DetectionConfig;
use crate::error::{Error, Result};
use crate::graph::SignedGraph;
use crate::partition::{self, DISCARD};
use tracing::debug;

/// A level must shrink the node count by at least this percentage to be
/// folded.
const MIN_SHRINK_PERCENT: usize = 1;

/// Hierarchical CPM optimizer for a single graph.
#[derive(Debug, Clone)]
pub struct HierarchicalDetector {
    cpm: Cpm,
    max_levels: usize,
    max_passes: usize,
    seed: u64,
}

impl HierarchicalDetector {
    /// Create a detector from a validated configuration.
    pub fn from_config(config: &DetectionConfig) -> Result<Self> {
        Ok(Self {
            cpm: Cpm::from_config(config)?,
            max_levels: config.max_levels.max(1),
            max_passes: config.max_passes,
            seed: config.seed,
        })
    }

    /// Objective being optimized.
    pub fn cpm(&self) -> &Cpm {
        &self.cpm
    }

    /// Seed of the first level.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Optimize starting from `initial` (sparse ids allowed, DISCARD kept).
    ///
    /// Returns a dense partition of the input nodes.
    pub fn detect(&self, graph: &SignedGraph, initial: Vec<usize>) -> Result<Vec<usize>> {
        self.detect_with_seed(graph, initial, self.seed)
    }

    /// [`detect`](Self::detect) with an explicit seed.
    pub fn detect_with_seed(
        &self,
        graph: &SignedGraph,
        initial: Vec<usize>,
        seed: u64,
    ) -> Result<Vec<usize>> {
        if initial.len() != graph.node_count() {
            return Err(Error::PartitionLength {
                expected: graph.node_count(),
                found: initial.len(),
            });
        }

        let mut partition = initial;
        let mut folds: Vec<Vec<usize>> = Vec::new();
        let mut folded: Option<SignedGraph> = None;

        for level in 0..self.max_levels {
            let current = folded.as_ref().unwrap_or(graph);
            let level_seed = seed.wrapping_add(level as u64);
            let pass = GreedyPass::new(self.cpm, self.max_passes, level_seed);
            let improvement = pass.run(current, &mut partition)?;
            let nodes = current.node_count();
            let groups = partition::group_count(&partition)?;
            debug!(level, nodes, groups, improvement, "greedy level");

            if improvement <= 0.0 || level + 1 == self.max_levels {
                break;
            }
            if 100 * (nodes - groups) < MIN_SHRINK_PERCENT * nodes {
                break;
            }
            let next = current.fold(&partition)?;
            let fold = std::mem::replace(&mut partition, partition::identity(groups));
            folds.push(fold);
            folded = Some(next);
        }

        while let Some(fold) = folds.pop() {
            partition = expand(&fold, &partition);
        }
        Ok(partition)
    }
}

/// Map node-level `fold` groups to the groups `upper` assigns them.
pub(crate) fn expand(fold: &[usize], upper: &[usize]) -> Vec<usize> {
    fold.iter()
        .map(|&g| if g == DISCARD { DISCARD } else { upper[g] })
        .collect()
}
