//! Public entry point: the full detection pipeline.

use super::connected::connected_groups;
use super::cpm::Cpm;
use super::hierarchical::HierarchicalDetector;
use super::refine::Refiner;
use super::scheduler::Scheduler;
use super::traits::CommunityDetection;
use crate::config::DetectionConfig;
use crate::error::{Error, Result};
use crate::graph::{SignedGraph, SparseGraph};
use crate::partition;
use crate::relation::{DuplicateMode, IdMap, RelationList, SortOrder};
use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use tracing::{debug, info_span, Span};

/// Signed CPM community detection.
///
/// Pipeline: sign split → hierarchical greedy from singletons →
/// `refine_count` refine cycles → connected co-groups (optional) → dense
/// renumbering. Returned partitions are indexed by normal node id; use
/// [`SparseGraph::raw_id`] to map back.
///
/// ```rust
/// use potts::{CpmDetector, DetectionConfig, SparseGraph};
///
/// let edges = [(0, 1, 1.0), (1, 0, 1.0), (2, 3, 1.0), (3, 2, 1.0), (1, 2, -1.0), (2, 1, -1.0)];
/// let graph = SparseGraph::from_edges(edges).unwrap();
/// let detector = CpmDetector::new(DetectionConfig::default().with_resolution(0.1)).unwrap();
/// assert_eq!(detector.detect(&graph).unwrap(), vec![0, 0, 1, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct CpmDetector {
    config: DetectionConfig,
    span: Span,
}

impl CpmDetector {
    /// Create a detector; parameters are validated here, before any work.
    pub fn new(config: DetectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            span: info_span!("potts"),
        })
    }

    /// Emit all events inside `span` instead of the detector's own.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Detect groups in `graph`.
    pub fn detect(&self, graph: &SparseGraph) -> Result<Vec<usize>> {
        let scheduler = Scheduler::new(self.config.threads)?;
        self.run(graph, &scheduler)
    }

    /// Detect groups in independent graphs, spread over the worker pool.
    ///
    /// Each result equals [`detect`](Self::detect) on that graph alone.
    pub fn detect_batch(&self, graphs: &[SparseGraph]) -> Result<Vec<Vec<usize>>> {
        let scheduler = Scheduler::new(self.config.threads)?;
        let inline = Scheduler::sequential();
        let tasks = graphs.iter().map(|g| (g.edge_count(), g)).collect();
        debug!(
            parent: &self.span,
            graphs = graphs.len(),
            threads = scheduler.threads(),
            "batch"
        );
        let detect = |graph: &SparseGraph| self.run(graph, &inline);
        scheduler.run(tasks, detect)
    }

    /// CPM Hamiltonian of `partition` on `graph` under this configuration.
    pub fn hamiltonian(&self, graph: &SparseGraph, partition: &[usize]) -> Result<f64> {
        let cpm = Cpm::from_config(&self.config)?;
        cpm.hamiltonian(&SignedGraph::new(graph)?, partition)
    }

    fn run(&self, graph: &SparseGraph, scheduler: &Scheduler) -> Result<Vec<usize>> {
        let _entered = self.span.enter();
        let signed = SignedGraph::new(graph)?;
        let hierarchy = HierarchicalDetector::from_config(&self.config)?;
        debug!(
            nodes = signed.node_count(),
            edges = signed.edge_count(),
            negative = signed.negative().is_some(),
            "detect"
        );

        let start = partition::identity(signed.node_count());
        let mut result = hierarchy.detect(&signed, start)?;
        if self.config.refine_count > 0 {
            let refiner = Refiner::new(&hierarchy, scheduler, &self.config)
                .with_span(self.span.clone());
            result = refiner.run(&signed, result, self.config.refine_count)?;
        }
        if self.config.connected_groups {
            result = connected_groups(&signed, &result)?;
        }
        let groups = partition::renumber_in_place(&mut result);
        debug!(groups, "detected");
        Ok(result)
    }
}

impl Default for CpmDetector {
    fn default() -> Self {
        Self {
            config: DetectionConfig::default(),
            span: info_span!("potts"),
        }
    }
}

impl CommunityDetection for CpmDetector {
    /// Edges get weight 1 in both directions; isolated nodes are kept.
    fn detect<N, E>(&self, graph: &UnGraph<N, E>) -> Result<Vec<usize>> {
        let n = graph.node_count();
        if n == 0 {
            return Err(Error::EmptyInput);
        }

        let edges = graph.edge_references().flat_map(|e| {
            let (a, b) = (e.source().index(), e.target().index());
            [(a, b, 1.0), (b, a, 1.0)]
        });
        let mut list = RelationList::from_edges(edges);
        let _ = list.sort(SortOrder::Ascending, DuplicateMode::Aggregate);
        list.normalize_with(IdMap::identity(n), false)?;
        CpmDetector::detect(self, &SparseGraph::new(list)?)
    }

    fn resolution(&self) -> f64 {
        self.config.resolution
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn two_pairs() -> SparseGraph {
        let edges = [(0, 1, 1.0), (1, 0, 1.0), (2, 3, 1.0), (3, 2, 1.0)];
        SparseGraph::from_edges(edges).unwrap()
    }

    fn detector(config: DetectionConfig) -> CpmDetector {
        CpmDetector::new(config.with_resolution(0.1)).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected_up_front() {
        assert!(matches!(
            CpmDetector::new(DetectionConfig::default().with_alpha(2.0)),
            Err(Error::InvalidParameter { name: "alpha", .. })
        ));
    }

    #[test]
    fn test_detects_pairs() {
        let d = detector(DetectionConfig::default());
        assert_eq!(d.detect(&two_pairs()).unwrap(), vec![0, 0, 1, 1]);
        assert_eq!(d.config().resolution, 0.1);
    }

    #[test]
    fn test_single_node_graph() {
        let g = SparseGraph::from_edges([(7, 7, 1.0)]).unwrap();
        assert_eq!(CpmDetector::default().detect(&g).unwrap(), vec![0]);
    }

    #[test]
    fn test_batch_matches_single() {
        let d = detector(DetectionConfig::default().with_threads(2));
        let path = SparseGraph::from_edges([(0, 1, 1.0), (1, 2, 1.0)]).unwrap();
        let graphs = vec![two_pairs(), path];
        let batch = d.detect_batch(&graphs).unwrap();
        for (g, p) in graphs.iter().zip(batch) {
            assert_eq!(d.detect(g).unwrap(), p);
        }
    }

    #[test]
    fn test_petgraph_adapter_keeps_isolated_nodes() {
        let mut g = UnGraph::<(), ()>::new_undirected();
        let a = g.add_node(());
        let b = g.add_node(());
        let _lonely = g.add_node(());
        g.add_edge(a, b, ());
        let d = detector(DetectionConfig::default());
        let p = CommunityDetection::detect(&d, &g).unwrap();
        assert_eq!(p, vec![0, 0, 1]);
        assert_eq!(CommunityDetection::resolution(&d), 0.1);
    }

    #[test]
    fn test_petgraph_adapter_empty_graph() {
        let g = UnGraph::<(), ()>::new_undirected();
        assert!(matches!(
            CommunityDetection::detect(&CpmDetector::default(), &g),
            Err(Error::EmptyInput)
        ));
    }
}
