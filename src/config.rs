//! Detection parameters.

use crate::error::{Error, Result};

/// Parameters of a CPM detection run.
///
/// ```rust
/// use potts::DetectionConfig;
///
/// let config = DetectionConfig::default()
///     .with_resolution(0.05)
///     .with_alpha(0.5)
///     .with_refine_count(2)
///     .with_threads(4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DetectionConfig {
    /// CPM resolution γ (> 0). Higher values give smaller, denser groups.
    pub resolution: f64,
    /// Weight of the positive sub-Hamiltonian, in [0, 1]; the negative one
    /// gets `1 - alpha`.
    pub alpha: f64,
    /// Number of refine → detect cycles after the first detection.
    pub refine_count: usize,
    /// Worker threads (>= 1).
    pub threads: usize,
    /// Fold budget: maximum number of greedy levels per detection.
    pub max_levels: usize,
    /// Maximum greedy passes over the nodes of one level.
    pub max_passes: usize,
    /// Sub-graphs smaller than this are never split during refinement.
    pub min_refine_nodes: usize,
    /// Refinement sub-graphs with more edges than this go to the worker pool.
    pub parallel_edge_threshold: usize,
    /// Seed for node visiting order.
    pub seed: u64,
    /// Split groups into positively connected components at the end.
    pub connected_groups: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            alpha: 0.5,
            refine_count: 0,
            threads: 1,
            max_levels: 20,
            max_passes: 100,
            min_refine_nodes: 4,
            parallel_edge_threshold: 10_000,
            seed: 42,
            connected_groups: true,
        }
    }
}

impl DetectionConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the CPM resolution.
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the positive/negative balance.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the number of refine → detect cycles.
    pub fn with_refine_count(mut self, refine_count: usize) -> Self {
        self.refine_count = refine_count;
        self
    }

    /// Set the worker count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set the fold budget.
    pub fn with_max_levels(mut self, max_levels: usize) -> Self {
        self.max_levels = max_levels;
        self
    }

    /// Set the greedy pass cap.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Set the refinement base-case size.
    pub fn with_min_refine_nodes(mut self, nodes: usize) -> Self {
        self.min_refine_nodes = nodes;
        self
    }

    /// Set the edge count above which refinement work is parallelized.
    pub fn with_parallel_edge_threshold(mut self, edges: usize) -> Self {
        self.parallel_edge_threshold = edges;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable connected co-group post-processing.
    pub fn with_connected_groups(mut self, enabled: bool) -> Self {
        self.connected_groups = enabled;
        self
    }

    /// Reject parameters outside their domain.
    pub fn validate(&self) -> Result<()> {
        if !(self.resolution > 0.0 && self.resolution.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "resolution",
                message: "must be a finite value > 0",
            });
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(Error::InvalidParameter {
                name: "alpha",
                message: "must be in [0, 1]",
            });
        }
        if self.threads == 0 {
            return Err(Error::InvalidParameter {
                name: "threads",
                message: "must be >= 1",
            });
        }
        if self.max_levels == 0 {
            return Err(Error::InvalidParameter {
                name: "max_levels",
                message: "must be >= 1",
            });
        }
        if self.max_passes == 0 {
            return Err(Error::InvalidParameter {
                name: "max_passes",
                message: "must be >= 1",
            });
        }
        Ok(())
    }
}
