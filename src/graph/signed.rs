//! Signed view of a graph: positive and negative layers with transposes.

use super::sparse::SparseGraph;
use crate::error::Result;
use crate::relation::Lineage;
use std::sync::Arc;

/// One edge sign: out-edges plus the transpose for O(1) in-edge access.
#[derive(Debug, Clone)]
pub struct Layer {
    forward: SparseGraph,
    backward: SparseGraph,
}

impl Layer {
    fn new(forward: SparseGraph) -> Result<Self> {
        let backward = forward.transpose()?;
        Ok(Self { forward, backward })
    }

    /// Out-edges.
    pub fn forward(&self) -> &SparseGraph {
        &self.forward
    }

    /// In-edges (transpose of [`forward`](Self::forward)).
    pub fn backward(&self) -> &SparseGraph {
        &self.backward
    }
}

/// A graph split by edge sign.
///
/// The positive layer always exists (possibly edgeless). The negative layer
/// holds the absolute values of negative edges and is `None` when there are
/// none, which lets the optimizer skip it entirely. Both layers share one
/// node space and lineage.
///
/// Layers are folded and decomposed independently: summing a positive and a
/// negative edge into one net weight would change the objective whenever
/// `alpha != 0.5`.
#[derive(Debug, Clone)]
pub struct SignedGraph {
    positive: Layer,
    negative: Option<Layer>,
    sizes: Vec<f64>,
}

impl SignedGraph {
    /// Split `graph` into sign layers. Zero-valued edges are dropped.
    pub fn new(graph: &SparseGraph) -> Result<Self> {
        let positive = graph.filter(0.0, f64::INFINITY)?;
        let negative = graph.filter(f64::NEG_INFINITY, 0.0)?.abs_values();
        Self::from_layers(positive, Some(negative))
    }

    fn from_layers(positive: SparseGraph, negative: Option<SparseGraph>) -> Result<Self> {
        let sizes = (0..positive.node_count())
            .map(|i| positive.node_size(i))
            .collect();
        let negative = match negative.filter(|g| g.edge_count() > 0) {
            Some(g) => Some(Layer::new(g)?),
            None => None,
        };
        Ok(Self {
            positive: Layer::new(positive)?,
            negative,
            sizes,
        })
    }

    /// Positive layer.
    pub fn positive(&self) -> &Layer {
        &self.positive
    }

    /// Negative layer (absolute values), if any negative edge exists.
    pub fn negative(&self) -> Option<&Layer> {
        self.negative.as_ref()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.sizes.len()
    }

    /// Number of edges over both layers.
    pub fn edge_count(&self) -> usize {
        let negative = self.negative.as_ref().map_or(0, |l| l.forward.edge_count());
        self.positive.forward.edge_count() + negative
    }

    /// Sub-node count per node.
    pub fn sizes(&self) -> &[f64] {
        &self.sizes
    }

    /// Id lineage shared by both layers.
    pub fn lineage(&self) -> &Arc<Lineage> {
        self.positive.forward.lineage()
    }

    /// Original raw id of a node.
    pub fn raw_id(&self, node: usize) -> usize {
        self.positive.forward.raw_id(node)
    }

    /// Fold both layers by a dense partition.
    pub fn fold(&self, partition: &[usize]) -> Result<SignedGraph> {
        let positive = self.positive.forward.fold(partition)?;
        let negative = match &self.negative {
            Some(layer) => Some(layer.forward.fold(partition)?),
            None => None,
        };
        Self::from_layers(positive, negative)
    }

    /// Decompose both layers by a dense partition.
    pub fn decompose(&self, partition: &[usize]) -> Result<Vec<SignedGraph>> {
        let positive = self.positive.forward.decompose(partition)?;
        let negative: Vec<Option<SparseGraph>> = match &self.negative {
            Some(layer) => {
                let parts = layer.forward.decompose(partition)?;
                parts.into_iter().map(Some).collect()
            }
            None => vec![None; positive.len()],
        };
        positive
            .into_iter()
            .zip(negative)
            .map(|(p, n)| Self::from_layers(p, n))
            .collect()
    }
}
