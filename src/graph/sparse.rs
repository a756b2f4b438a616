//! Row-indexed adjacency over a normalized relation list.

use crate::error::{Error, Result};
use crate::partition::{self, DISCARD};
use crate::relation::{DuplicateMode, IdMap, Lineage, Normalization, RelationList, SortOrder};
use std::sync::Arc;

/// Attribute position holding the sub-node count of a (possibly folded) node.
pub const SIZE_ATTRIBUTE: usize = 0;

/// Directed weighted graph in compressed sparse row form.
///
/// Built from a [`RelationList`] that is sorted ascending, unique,
/// normalized and id-shared, so each row's `(column, value)` entries form a
/// contiguous slice of the list's arrays.
///
/// Optional per-node attribute vectors travel with the graph through
/// transpose, filter, decompose and fold. Position [`SIZE_ATTRIBUTE`] is the
/// number of original nodes a node stands for; a graph without attributes
/// treats every node as size 1.
#[derive(Debug, Clone)]
pub struct SparseGraph {
    relations: RelationList,
    lineage: Arc<Lineage>,
    /// Row `r` owns cells `offsets[r]..offsets[r + 1]`.
    offsets: Vec<usize>,
    attributes: Option<Vec<Vec<f64>>>,
}

impl SparseGraph {
    /// Wrap a prepared relation list.
    ///
    /// # Errors
    ///
    /// [`Error::Precondition`] if the list is not sorted ascending, unique,
    /// normalized and id-shared.
    pub fn new(relations: RelationList) -> Result<Self> {
        if relations.order() != Some(SortOrder::Ascending) {
            return Err(Error::Precondition("graph requires a list sorted ascending"));
        }
        if !relations.is_unique() {
            return Err(Error::Precondition("graph requires a list without duplicate cells"));
        }
        let lineage = match relations.normalization() {
            Some(norm) if relations.is_id_shared() => norm.rows().clone(),
            _ => return Err(Error::Precondition("graph requires a normalized id-shared list")),
        };

        let n = relations.row_count();
        let mut offsets = vec![0usize; n + 1];
        for &r in relations.rows() {
            offsets[r + 1] += 1;
        }
        for i in 0..n {
            offsets[i + 1] += offsets[i];
        }

        Ok(Self {
            relations,
            lineage,
            offsets,
            attributes: None,
        })
    }

    /// Sort (aggregating duplicates), normalize and wrap raw edges.
    pub fn from_edges<I: IntoIterator<Item = (usize, usize, f64)>>(edges: I) -> Result<Self> {
        let mut list = RelationList::from_edges(edges);
        let _ = list.sort(SortOrder::Ascending, DuplicateMode::Aggregate);
        list.normalize(false);
        Self::new(list)
    }

    /// Attach one attribute vector per node.
    pub fn with_attributes(mut self, attributes: Vec<Vec<f64>>) -> Result<Self> {
        if attributes.len() != self.node_count() {
            return Err(Error::Precondition("graph attributes need one vector per node"));
        }
        self.attributes = Some(attributes);
        Ok(self)
    }

    /// The backing relation list.
    pub fn relations(&self) -> &RelationList {
        &self.relations
    }

    /// Id lineage of the nodes.
    pub fn lineage(&self) -> &Arc<Lineage> {
        &self.lineage
    }

    /// Original raw id of a node.
    pub fn raw_id(&self, node: usize) -> usize {
        self.lineage().resolve(node)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of stored (directed) edges.
    pub fn edge_count(&self) -> usize {
        self.relations.len()
    }

    /// Target nodes of a row, ascending.
    pub fn neighbors(&self, row: usize) -> &[usize] {
        &self.relations.cols()[self.offsets[row]..self.offsets[row + 1]]
    }

    /// Edge values of a row, aligned with [`neighbors`](Self::neighbors).
    pub fn row_values(&self, row: usize) -> &[f64] {
        &self.relations.values()[self.offsets[row]..self.offsets[row + 1]]
    }

    /// `(target, value)` pairs of a row.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.neighbors(row)
            .iter()
            .copied()
            .zip(self.row_values(row).iter().copied())
    }

    /// Value of the edge `row -> col`, if present.
    pub fn edge_value(&self, row: usize, col: usize) -> Option<f64> {
        self.neighbors(row)
            .binary_search(&col)
            .ok()
            .map(|i| self.row_values(row)[i])
    }

    /// True if the edge `row -> col` exists.
    pub fn has_edge(&self, row: usize, col: usize) -> bool {
        self.neighbors(row).binary_search(&col).is_ok()
    }

    /// Sum of a row's values.
    pub fn out_weight(&self, row: usize) -> f64 {
        self.row_values(row).iter().sum()
    }

    /// Graph with each row's values divided by the row's total.
    ///
    /// Rows with zero total keep their values.
    pub fn transition_probabilities(&self) -> Result<SparseGraph> {
        let totals: Vec<f64> = (0..self.node_count()).map(|r| self.out_weight(r)).collect();
        let values = self
            .relations
            .iter()
            .map(|(r, _, v)| if totals[r] == 0.0 { v } else { v / totals[r] })
            .collect();
        let mut graph = self.clone();
        graph.relations = self.relations.clone().with_values(values)?;
        Ok(graph)
    }

    /// Per-node attribute vectors, if any.
    pub fn attributes(&self) -> Option<&[Vec<f64>]> {
        self.attributes.as_deref()
    }

    /// Number of original nodes `node` stands for.
    pub fn node_size(&self, node: usize) -> f64 {
        self.attributes
            .as_ref()
            .and_then(|a| a[node].get(SIZE_ATTRIBUTE).copied())
            .unwrap_or(1.0)
    }

    /// Transposed graph (in-edges become rows).
    pub fn transpose(&self) -> Result<SparseGraph> {
        let mut list = self.relations.transpose();
        let _ = list.sort(SortOrder::Ascending, DuplicateMode::Keep);
        let mut graph = SparseGraph::new(list)?;
        graph.attributes = self.attributes.clone();
        Ok(graph)
    }

    /// Keep edges with `lo < value < hi`; all nodes are kept.
    pub fn filter(&self, lo: f64, hi: f64) -> Result<SparseGraph> {
        let mut graph = SparseGraph::new(self.relations.filter(lo, hi))?;
        graph.attributes = self.attributes.clone();
        Ok(graph)
    }

    /// Same graph with absolute edge values.
    pub fn abs_values(&self) -> SparseGraph {
        let mut graph = self.clone();
        graph.relations = graph.relations.abs_values();
        graph
    }

    /// Contract each group of a dense partition into one node.
    ///
    /// Edge values between groups are summed (intra-group edges become
    /// self-loops) and attribute vectors are summed element-wise, so the
    /// size attribute of a folded node is the total size of its members.
    pub fn fold(&self, partition: &[usize]) -> Result<SparseGraph> {
        let folded = self.relations.fold(partition)?;
        let groups = folded.row_count();

        let width = self
            .attributes
            .as_ref()
            .map_or(1, |a| a.iter().map(Vec::len).max().unwrap_or(1));
        let mut attributes = vec![vec![0.0; width]; groups];
        for (node, &g) in partition.iter().enumerate() {
            if g == DISCARD {
                continue;
            }
            match &self.attributes {
                Some(a) => {
                    for (acc, v) in attributes[g].iter_mut().zip(&a[node]) {
                        *acc += v;
                    }
                }
                None => attributes[g][SIZE_ATTRIBUTE] += 1.0,
            }
        }

        SparseGraph::new(folded)?.with_attributes(attributes)
    }

    /// Split by a dense partition into one sub-graph per group.
    ///
    /// Each sub-graph holds every member of its group (including members
    /// with no internal edges) and only the edges with both endpoints in the
    /// group. Sub-graph node `i` maps one hop up to parent node
    /// `lineage().parent_id(i)` and resolves to the original raw ids.
    pub fn decompose(&self, partition: &[usize]) -> Result<Vec<SparseGraph>> {
        let lists = self.relations.decompose(partition)?;
        let groups = lists.len();
        let members = partition::members(partition, groups);
        let parent = Normalization::shared(self.lineage.clone());

        lists
            .into_iter()
            .zip(members)
            .map(|(list, members)| {
                let mut list = list.unwrap_or_else(|| RelationList::empty_derived(parent.clone()));
                let attributes = self
                    .attributes
                    .as_ref()
                    .map(|a| members.iter().map(|&m| a[m].clone()).collect::<Vec<_>>());
                list.normalize_with(IdMap::from_ordered(members), true)?;
                let graph = SparseGraph::new(list)?;
                match attributes {
                    Some(a) => graph.with_attributes(a),
                    None => Ok(graph),
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square() -> SparseGraph {
        // 0 -> 1 -> 2 -> 3 -> 0, plus 0 -> 2
        SparseGraph::from_edges([
            (0, 1, 1.0),
            (1, 2, 2.0),
            (2, 3, 3.0),
            (3, 0, 4.0),
            (0, 2, 5.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_requires_prepared_list() {
        let raw = RelationList::from_edges([(1, 0, 1.0), (0, 1, 1.0)]);
        assert!(matches!(SparseGraph::new(raw.clone()), Err(Error::Precondition(_))));

        let mut sorted = raw.clone();
        let _ = sorted.sort(SortOrder::Ascending, DuplicateMode::Aggregate);
        assert!(SparseGraph::new(sorted.clone()).is_err());

        sorted.normalize(false);
        assert!(SparseGraph::new(sorted).is_ok());

        let mut dupes = RelationList::from_edges([(0, 1, 1.0), (0, 1, 1.0)]);
        let _ = dupes.sort(SortOrder::Ascending, DuplicateMode::Keep);
        dupes.normalize(false);
        assert!(SparseGraph::new(dupes).is_err());
    }

    #[test]
    fn test_row_access() {
        let g = square();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 5);
        assert_eq!(g.neighbors(0), &[1, 2]);
        assert_eq!(g.row_values(0), &[1.0, 5.0]);
        assert!(g.has_edge(3, 0));
        assert!(!g.has_edge(0, 3));
        assert_eq!(g.edge_value(2, 3), Some(3.0));
        assert_eq!(g.out_weight(0), 6.0);
    }

    #[test]
    fn test_transpose_gives_in_edges() {
        let t = square().transpose().unwrap();
        assert_eq!(t.neighbors(2), &[0, 1]);
        assert_eq!(t.row_values(2), &[5.0, 2.0]);
        assert_eq!(t.neighbors(0), &[3]);
    }

    #[test]
    fn test_transition_probabilities_rows_sum_to_one() {
        let p = square().transition_probabilities().unwrap();
        for r in 0..p.node_count() {
            assert!((p.out_weight(r) - 1.0).abs() < 1e-12);
        }
        assert!((p.edge_value(0, 2).unwrap() - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_fold_carries_sizes() {
        let folded = square().fold(&[0, 0, 1, 1]).unwrap();
        assert_eq!(folded.node_count(), 2);
        assert_eq!(folded.node_size(0), 2.0);
        assert_eq!(folded.edge_value(0, 0), Some(1.0));
        assert_eq!(folded.edge_value(0, 1), Some(7.0));
        assert_eq!(folded.edge_value(1, 0), Some(4.0));
        assert_eq!(folded.edge_value(1, 1), Some(3.0));

        // folding again adds the carried sizes
        let again = folded.fold(&[0, 0]).unwrap();
        assert_eq!(again.node_size(0), 4.0);
        assert_eq!(again.edge_value(0, 0), Some(15.0));
    }

    #[test]
    fn test_decompose_keeps_isolated_members() {
        let g = SparseGraph::from_edges([(10, 11, 1.0), (12, 13, 1.0), (11, 12, 9.0)])
            .unwrap()
            .with_attributes(vec![vec![1.0, 0.5], vec![2.0, 0.5], vec![3.0, 0.5], vec![4.0, 0.5]])
            .unwrap();
        // groups: {10, 12} (no internal edge) and {11, 13}
        let parts = g.decompose(&[0, 1, 0, 1]).unwrap();
        assert_eq!(parts.len(), 2);

        let a = &parts[0];
        assert_eq!(a.node_count(), 2);
        assert_eq!(a.edge_count(), 0);
        assert_eq!(a.raw_id(1), 12);
        assert_eq!(a.lineage().parent_id(1), 2);
        assert_eq!(a.node_size(1), 3.0);

        let b = &parts[1];
        assert_eq!(b.edge_count(), 0);
        assert_eq!(b.raw_id(0), 11);
        assert_eq!(b.attributes().unwrap()[1], vec![4.0, 0.5]);
    }

    #[test]
    fn test_decompose_then_fold_traces_raw_ids() {
        let g = SparseGraph::from_edges([
            (100, 200, 1.0),
            (200, 300, 1.0),
            (300, 100, 1.0),
            (400, 500, 1.0),
        ])
        .unwrap();
        let parts = g.decompose(&[0, 0, 0, 1, 1]).unwrap();
        let folded = parts[0].fold(&[0, 1, 1]).unwrap();
        assert_eq!(folded.raw_id(0), 100);
        assert_eq!(folded.raw_id(1), 200);
        assert_eq!(parts[1].raw_id(1), 500);
    }

    #[test]
    fn test_filter_keeps_all_nodes() {
        let g = SparseGraph::from_edges([(0, 1, 1.0), (1, 2, -2.0)]).unwrap();
        let negative = g.filter(f64::NEG_INFINITY, 0.0).unwrap();
        assert_eq!(negative.node_count(), 3);
        assert_eq!(negative.edge_count(), 1);
        assert_eq!(negative.neighbors(0), &[] as &[usize]);
    }
}
