//! Edge lists with explicit sort / uniqueness / normalization state.

use super::id_map::{IdMap, Lineage};
use crate::error::{Error, Result};
use crate::partition::{self, DISCARD};
use std::collections::HashSet;
use std::sync::Arc;

/// Two-level sort direction (rows, then columns within a row).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Rows ascending, columns ascending within each row.
    Ascending,
    /// Rows descending, columns descending within each row.
    Descending,
}

/// What [`RelationList::sort`] does with repeated `(row, column)` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateMode {
    /// Sum colliding values in visit order.
    #[default]
    Aggregate,
    /// Keep the first-seen value.
    Remove,
    /// Leave duplicates in place.
    Keep,
}

/// Normalization state of both dimensions of a list.
///
/// For id-shared lists both lineages are the same `Arc`.
#[derive(Debug, Clone)]
pub struct Normalization {
    rows: Arc<Lineage>,
    cols: Arc<Lineage>,
}

impl Normalization {
    /// Same lineage for rows and columns.
    pub fn shared(lineage: Arc<Lineage>) -> Self {
        Self {
            rows: lineage.clone(),
            cols: lineage,
        }
    }

    /// Row lineage.
    pub fn rows(&self) -> &Arc<Lineage> {
        &self.rows
    }

    /// Column lineage.
    pub fn cols(&self) -> &Arc<Lineage> {
        &self.cols
    }

    fn swapped(&self) -> Self {
        Self {
            rows: self.cols.clone(),
            cols: self.rows.clone(),
        }
    }
}

/// An edge list: parallel `(row, column, value)` arrays plus state flags.
///
/// Instances are value-like: structural operations return new lists and
/// share id maps only through immutable `Arc`s.
#[derive(Debug, Clone)]
pub struct RelationList {
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
    order: Option<SortOrder>,
    unique: bool,
    id_shared: bool,
    normalization: Option<Normalization>,
    /// Normalization of the parent while this list still holds the parent's
    /// normal ids (set by decompose and cleared by normalize).
    derived_from: Option<Normalization>,
}

impl RelationList {
    /// Build a list from parallel arrays.
    ///
    /// `id_shared` declares that rows and columns live in one id space
    /// (node-node relations).
    pub fn new(
        rows: Vec<usize>,
        cols: Vec<usize>,
        values: Vec<f64>,
        id_shared: bool,
    ) -> Result<Self> {
        if rows.len() != cols.len() || rows.len() != values.len() {
            return Err(Error::Precondition(
                "row, column and value arrays must have equal length",
            ));
        }
        Ok(Self {
            rows,
            cols,
            values,
            order: None,
            unique: false,
            id_shared,
            normalization: None,
            derived_from: None,
        })
    }

    /// Build an id-shared list from `(row, column, value)` triples.
    pub fn from_edges<I: IntoIterator<Item = (usize, usize, f64)>>(edges: I) -> Self {
        let mut rows = Vec::new();
        let mut cols = Vec::new();
        let mut values = Vec::new();
        for (r, c, v) in edges {
            rows.push(r);
            cols.push(c);
            values.push(v);
        }
        Self {
            rows,
            cols,
            values,
            order: None,
            unique: false,
            id_shared: true,
            normalization: None,
            derived_from: None,
        }
    }

    /// An empty id-shared list derived from a parent's normalization.
    ///
    /// Stands in for a group whose members share no cells, so it can still
    /// be normalized onto the parent's lineage.
    pub fn empty_derived(parent: Normalization) -> Self {
        Self {
            rows: Vec::new(),
            cols: Vec::new(),
            values: Vec::new(),
            order: Some(SortOrder::Ascending),
            unique: true,
            id_shared: true,
            normalization: None,
            derived_from: Some(parent),
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the list has no cells.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row ids (normal ids once normalized).
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Column ids (normal ids once normalized).
    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    /// Cell values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate `(row, column, value)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows
            .iter()
            .zip(&self.cols)
            .zip(&self.values)
            .map(|((&r, &c), &v)| (r, c, v))
    }

    /// Current sort order, if sorted.
    pub fn order(&self) -> Option<SortOrder> {
        self.order
    }

    /// True if sorted in either direction.
    pub fn is_sorted(&self) -> bool {
        self.order.is_some()
    }

    /// True if no `(row, column)` pair repeats.
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// True if ids are dense normal ids.
    pub fn is_normalized(&self) -> bool {
        self.normalization.is_some()
    }

    /// True if rows and columns share one id space.
    pub fn is_id_shared(&self) -> bool {
        self.id_shared
    }

    /// Normalization state, if normalized.
    pub fn normalization(&self) -> Option<&Normalization> {
        self.normalization.as_ref()
    }

    /// Number of normalized row ids (0 if not normalized).
    pub fn row_count(&self) -> usize {
        self.normalization.as_ref().map_or(0, |n| n.rows.len())
    }

    /// Number of normalized column ids (0 if not normalized).
    pub fn col_count(&self) -> usize {
        self.normalization.as_ref().map_or(0, |n| n.cols.len())
    }

    /// Sum of all values.
    pub fn total_weight(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Stable two-level sort with explicit duplicate handling.
    ///
    /// Returns the number of duplicate `(row, column)` cells found. Sorting a
    /// list that is already sorted the same way and unique leaves it as is.
    pub fn sort(&mut self, order: SortOrder, mode: DuplicateMode) -> usize {
        if self.order == Some(order) && self.unique {
            return 0;
        }
        if self.order != Some(order) {
            let mut perm: Vec<usize> = (0..self.len()).collect();
            let (rows, cols) = (&self.rows, &self.cols);
            match order {
                SortOrder::Ascending => perm.sort_by_key(|&i| (rows[i], cols[i])),
                SortOrder::Descending => {
                    perm.sort_by(|&a, &b| (rows[b], cols[b]).cmp(&(rows[a], cols[a])))
                }
            }
            self.permute(&perm);
            self.order = Some(order);
        }

        if mode == DuplicateMode::Keep {
            let duplicates = (1..self.len())
                .filter(|&i| self.rows[i] == self.rows[i - 1] && self.cols[i] == self.cols[i - 1])
                .count();
            self.unique = duplicates == 0;
            return duplicates;
        }

        let mut duplicates = 0;
        let mut write = 0;
        for read in 0..self.len() {
            if write > 0
                && self.rows[write - 1] == self.rows[read]
                && self.cols[write - 1] == self.cols[read]
            {
                duplicates += 1;
                if mode == DuplicateMode::Aggregate {
                    self.values[write - 1] += self.values[read];
                }
                continue;
            }
            self.rows[write] = self.rows[read];
            self.cols[write] = self.cols[read];
            self.values[write] = self.values[read];
            write += 1;
        }
        self.rows.truncate(write);
        self.cols.truncate(write);
        self.values.truncate(write);
        self.unique = true;
        duplicates
    }

    /// Replace ids with dense normal ids.
    ///
    /// If this list was derived from a normalized parent and
    /// `keep_ancestor_raw_ids` is set, the new lineage chains onto the
    /// parent's, so ids resolve to the original ancestor raw ids. Otherwise
    /// the current ids become this list's raw ids. No-op if already
    /// normalized.
    pub fn normalize(&mut self, keep_ancestor_raw_ids: bool) {
        if self.normalization.is_some() {
            return;
        }
        let parent = self.derived_from.take().filter(|_| keep_ancestor_raw_ids);

        if self.id_shared {
            let raw = sorted_unique(self.rows.iter().chain(&self.cols).copied());
            remap(&mut self.rows, &raw);
            remap(&mut self.cols, &raw);
            let lineage = chain(IdMap::from_ordered(raw), parent.map(|p| p.rows));
            self.normalization = Some(Normalization::shared(Arc::new(lineage)));
        } else {
            let raw_rows = sorted_unique(self.rows.iter().copied());
            let raw_cols = sorted_unique(self.cols.iter().copied());
            remap(&mut self.rows, &raw_rows);
            remap(&mut self.cols, &raw_cols);
            let (parent_rows, parent_cols) = match parent {
                Some(p) => (Some(p.rows), Some(p.cols)),
                None => (None, None),
            };
            self.normalization = Some(Normalization {
                rows: Arc::new(chain(IdMap::from_ordered(raw_rows), parent_rows)),
                cols: Arc::new(chain(IdMap::from_ordered(raw_cols), parent_cols)),
            });
        }
    }

    /// Normalize an id-shared list against a caller-provided map, which may
    /// contain ids that appear in no cell (isolated nodes).
    ///
    /// Every row and column id must be present in `map`.
    pub fn normalize_with(&mut self, map: IdMap, keep_ancestor_raw_ids: bool) -> Result<()> {
        if !self.id_shared {
            return Err(Error::Precondition("normalize_with requires an id-shared list"));
        }
        if self.normalization.is_some() {
            return Err(Error::Precondition("list is already normalized"));
        }
        let rows = lookup_all(&self.rows, &map)?;
        let cols = lookup_all(&self.cols, &map)?;
        let parent = self.derived_from.take().filter(|_| keep_ancestor_raw_ids);

        // normalize keeps order only when the map is monotone
        let monotone = map.raw_ids().windows(2).all(|w| w[0] < w[1]);
        self.rows = rows;
        self.cols = cols;
        if !monotone {
            self.order = None;
        }
        let lineage = chain(map, parent.map(|p| p.rows));
        self.normalization = Some(Normalization::shared(Arc::new(lineage)));
        Ok(())
    }

    /// Rewrite ids back to (resolved) raw ids and drop the normalization.
    pub fn un_normalize(&mut self) {
        let Some(norm) = self.normalization.take() else {
            return;
        };
        for r in &mut self.rows {
            *r = norm.rows.resolve(*r);
        }
        for c in &mut self.cols {
            *c = norm.cols.resolve(*c);
        }
        let order = self.order.filter(|&o| self.check_order(o));
        self.order = order;
    }

    /// Raw id of a normalized row id.
    pub fn raw_row(&self, row: usize) -> Option<usize> {
        self.normalization.as_ref().map(|n| n.rows.resolve(row))
    }

    /// Raw id of a normalized column id.
    pub fn raw_col(&self, col: usize) -> Option<usize> {
        self.normalization.as_ref().map(|n| n.cols.resolve(col))
    }

    /// Transposed copy: rows and columns (and their id maps) swapped.
    pub fn transpose(&self) -> Self {
        self.clone().into_transpose()
    }

    /// Transpose without copying the arrays.
    pub fn into_transpose(mut self) -> Self {
        std::mem::swap(&mut self.rows, &mut self.cols);
        self.normalization = self.normalization.as_ref().map(Normalization::swapped);
        self.derived_from = self.derived_from.as_ref().map(Normalization::swapped);
        self.order = None;
        self
    }

    /// Split by a dense partition into one list per group.
    ///
    /// A cell is kept in group `g` only if both endpoints belong to `g`;
    /// cross-group cells are dropped. Groups without cells yield `None`.
    /// Children keep the parent's ids and remember its normalization for a
    /// later [`normalize`](Self::normalize).
    pub fn decompose(&self, partition: &[usize]) -> Result<Vec<Option<RelationList>>> {
        let norm = self.require_node_space(partition)?;
        let groups = partition::group_count(partition)?;

        let mut buckets: Vec<(Vec<usize>, Vec<usize>, Vec<f64>)> =
            vec![(Vec::new(), Vec::new(), Vec::new()); groups];
        for (r, c, v) in self.iter() {
            let g = partition[r];
            if g != DISCARD && g == partition[c] {
                let bucket = &mut buckets[g];
                bucket.0.push(r);
                bucket.1.push(c);
                bucket.2.push(v);
            }
        }

        Ok(buckets
            .into_iter()
            .map(|(rows, cols, values)| {
                if rows.is_empty() {
                    return None;
                }
                Some(RelationList {
                    rows,
                    cols,
                    values,
                    order: self.order,
                    unique: self.unique,
                    id_shared: true,
                    normalization: None,
                    derived_from: Some(norm.clone()),
                })
            })
            .collect())
    }

    /// Contract each group of a dense partition into one id, summing values.
    ///
    /// The result is sorted ascending, unique and normalized over exactly
    /// one id per group. Its lineage maps each group to its lowest-id member.
    /// Cells touching a DISCARD node are dropped.
    pub fn fold(&self, partition: &[usize]) -> Result<RelationList> {
        let norm = self.require_node_space(partition)?;
        let groups = partition::group_count(partition)?;

        let mut representative = vec![DISCARD; groups];
        for (node, &g) in partition.iter().enumerate() {
            if g != DISCARD && representative[g] == DISCARD {
                representative[g] = node;
            }
        }

        let mut folded = RelationList::from_edges(self.iter().filter_map(|(r, c, v)| {
            let (gr, gc) = (partition[r], partition[c]);
            (gr != DISCARD && gc != DISCARD).then_some((gr, gc, v))
        }));
        let _ = folded.sort(SortOrder::Ascending, DuplicateMode::Aggregate);
        let lineage = Lineage::derived(IdMap::from_ordered(representative), norm.rows.clone());
        folded.normalization = Some(Normalization::shared(Arc::new(lineage)));
        Ok(folded)
    }

    /// Insert the mirror `(b, a, v)` of every cell `(a, b, v)` that lacks one.
    ///
    /// Breaks sort order, preserves uniqueness.
    pub fn symmetrize(&mut self) {
        let mut present: HashSet<(usize, usize)> = self
            .rows
            .iter()
            .copied()
            .zip(self.cols.iter().copied())
            .collect();
        for i in 0..self.len() {
            let (r, c, v) = (self.rows[i], self.cols[i], self.values[i]);
            if present.insert((c, r)) {
                self.rows.push(c);
                self.cols.push(r);
                self.values.push(v);
            }
        }
        self.order = None;
    }

    /// Keep cells with `lo < value < hi`.
    pub fn filter(&self, lo: f64, hi: f64) -> RelationList {
        let keep: Vec<usize> = (0..self.len())
            .filter(|&i| self.values[i] > lo && self.values[i] < hi)
            .collect();
        let mut out = self.clone();
        out.permute(&keep);
        out
    }

    /// Replace all values, keeping ids and flags.
    pub fn with_values(mut self, values: Vec<f64>) -> Result<RelationList> {
        if values.len() != self.len() {
            return Err(Error::Precondition("value array must match the number of cells"));
        }
        self.values = values;
        Ok(self)
    }

    /// Apply `f` to every value.
    pub fn map_values(mut self, f: impl Fn(f64) -> f64) -> RelationList {
        for v in &mut self.values {
            *v = f(*v);
        }
        self
    }

    /// Replace every value by its absolute value.
    pub fn abs_values(self) -> RelationList {
        self.map_values(f64::abs)
    }

    fn require_node_space(&self, partition: &[usize]) -> Result<Normalization> {
        let norm = match (&self.normalization, self.id_shared) {
            (Some(norm), true) => norm.clone(),
            _ => return Err(Error::Precondition("operation requires a normalized id-shared list")),
        };
        if partition.len() != norm.rows.len() {
            return Err(Error::PartitionLength {
                expected: norm.rows.len(),
                found: partition.len(),
            });
        }
        Ok(norm)
    }

    fn permute(&mut self, perm: &[usize]) {
        self.rows = perm.iter().map(|&i| self.rows[i]).collect();
        self.cols = perm.iter().map(|&i| self.cols[i]).collect();
        self.values = perm.iter().map(|&i| self.values[i]).collect();
    }

    fn check_order(&self, order: SortOrder) -> bool {
        (1..self.len()).all(|i| {
            let prev = (self.rows[i - 1], self.cols[i - 1]);
            let cur = (self.rows[i], self.cols[i]);
            match order {
                SortOrder::Ascending => prev <= cur,
                SortOrder::Descending => prev >= cur,
            }
        })
    }
}

fn sorted_unique(ids: impl Iterator<Item = usize>) -> Vec<usize> {
    let mut raw: Vec<usize> = ids.collect();
    raw.sort_unstable();
    raw.dedup();
    raw
}

/// Replace each id by its position in the sorted, unique `raw`.
fn remap(ids: &mut [usize], raw: &[usize]) {
    for id in ids {
        *id = raw.partition_point(|&x| x < *id);
    }
}

fn lookup_all(ids: &[usize], map: &IdMap) -> Result<Vec<usize>> {
    ids.iter()
        .map(|&id| map.normal(id).ok_or(Error::UnknownNode(id)))
        .collect()
}

fn chain(map: IdMap, parent: Option<Arc<Lineage>>) -> Lineage {
    match parent {
        Some(parent) => Lineage::derived(map, parent),
        None => Lineage::root(map),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn list(edges: &[(usize, usize, f64)]) -> RelationList {
        RelationList::from_edges(edges.iter().copied())
    }

    fn normalized(edges: &[(usize, usize, f64)]) -> RelationList {
        let mut l = list(edges);
        let _ = l.sort(SortOrder::Ascending, DuplicateMode::Aggregate);
        l.normalize(false);
        l
    }

    #[test]
    fn test_new_rejects_ragged_arrays() {
        assert!(RelationList::new(vec![1, 2], vec![3], vec![1.0, 1.0], true).is_err());
    }

    #[test]
    fn test_sort_aggregates_duplicates() {
        let mut l = RelationList::new(vec![1, 1], vec![10, 10], vec![3.0, 4.0], false).unwrap();
        assert_eq!(l.sort(SortOrder::Ascending, DuplicateMode::Aggregate), 1);
        assert_eq!(l.iter().collect::<Vec<_>>(), vec![(1, 10, 7.0)]);
        assert!(l.is_unique());
    }

    #[test]
    fn test_sort_remove_keeps_first_seen() {
        let mut l = list(&[(2, 1, 5.0), (1, 1, 1.0), (2, 1, 9.0)]);
        assert_eq!(l.sort(SortOrder::Ascending, DuplicateMode::Remove), 1);
        assert_eq!(l.iter().collect::<Vec<_>>(), vec![(1, 1, 1.0), (2, 1, 5.0)]);
    }

    #[test]
    fn test_sort_keep_reports_duplicates() {
        let mut l = list(&[(0, 1, 1.0), (0, 1, 1.0)]);
        assert_eq!(l.sort(SortOrder::Ascending, DuplicateMode::Keep), 1);
        assert_eq!(l.len(), 2);
        assert!(!l.is_unique());
    }

    #[test]
    fn test_sort_descending() {
        let mut l = list(&[(0, 1, 1.0), (2, 0, 1.0), (2, 3, 1.0), (1, 1, 1.0)]);
        let _ = l.sort(SortOrder::Descending, DuplicateMode::Aggregate);
        assert_eq!(l.rows(), &[2, 2, 1, 0]);
        assert_eq!(l.cols(), &[3, 0, 1, 1]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut l = list(&[(3, 1, 1.0), (1, 2, 2.0), (1, 0, 3.0)]);
        let _ = l.sort(SortOrder::Ascending, DuplicateMode::Aggregate);
        let before = (l.rows().to_vec(), l.cols().to_vec(), l.values().to_vec());
        assert_eq!(l.sort(SortOrder::Ascending, DuplicateMode::Aggregate), 0);
        assert_eq!(before, (l.rows().to_vec(), l.cols().to_vec(), l.values().to_vec()));
    }

    #[test]
    fn test_normalize_is_dense_and_keeps_order() {
        let l = normalized(&[(100, 7, 1.0), (7, 100, 1.0), (7, 55, 2.0)]);
        assert_eq!(l.row_count(), 3);
        assert_eq!(l.rows(), &[0, 0, 2]);
        assert_eq!(l.cols(), &[1, 2, 0]);
        assert_eq!(l.order(), Some(SortOrder::Ascending));
        assert_eq!(l.raw_row(2), Some(100));
        assert_eq!(l.raw_col(1), Some(55));
    }

    #[test]
    fn test_normalize_separate_dimensions() {
        let mut l = RelationList::new(vec![5, 9], vec![5, 1000], vec![1.0, 1.0], false).unwrap();
        l.normalize(false);
        assert_eq!(l.row_count(), 2);
        assert_eq!(l.col_count(), 2);
        assert_eq!(l.cols(), &[0, 1]);
        assert_eq!(l.raw_col(1), Some(1000));
    }

    #[test]
    fn test_transpose_swaps_maps() {
        let mut l = RelationList::new(vec![5, 9], vec![70, 80], vec![1.0, 2.0], false).unwrap();
        l.normalize(false);
        let t = l.transpose();
        assert_eq!(t.rows(), l.cols());
        assert_eq!(t.cols(), l.rows());
        assert_eq!(t.raw_row(0), Some(70));
        assert_eq!(t.raw_col(1), Some(9));
        assert_eq!(t.order(), None);
    }

    #[test]
    fn test_decompose_drops_cross_edges() {
        let l = normalized(&[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 2, 4.0)]);
        let parts = l.decompose(&[0, 0, 1, 1]).unwrap();
        assert_eq!(parts.len(), 2);
        let a = parts[0].as_ref().unwrap();
        let b = parts[1].as_ref().unwrap();
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![(0, 1, 1.0)]);
        assert_eq!(b.iter().collect::<Vec<_>>(), vec![(2, 3, 1.0), (3, 2, 4.0)]);
        assert!(!b.is_normalized());
    }

    #[test]
    fn test_decompose_empty_group_is_none() {
        let l = normalized(&[(0, 1, 1.0), (1, 2, 1.0)]);
        let parts = l.decompose(&[0, 1, 0]).unwrap();
        assert!(parts[0].is_none());
        assert!(parts[1].is_none());
    }

    #[test]
    fn test_decomposed_child_traces_back_to_ancestor() {
        let l = normalized(&[(10, 20, 1.0), (30, 40, 1.0), (40, 30, 1.0)]);
        let parts = l.decompose(&[0, 0, 1, 1]).unwrap();

        let mut keep = parts[1].clone().unwrap();
        keep.normalize(true);
        assert_eq!(keep.rows(), &[0, 1]);
        assert_eq!(keep.raw_row(0), Some(30));
        assert_eq!(keep.raw_col(1), Some(40));

        let mut local = parts[1].clone().unwrap();
        local.normalize(false);
        // parent normal ids become the raw ids
        assert_eq!(local.raw_row(0), Some(2));
    }

    #[test]
    fn test_decompose_requires_dense_partition() {
        let l = normalized(&[(0, 1, 1.0)]);
        assert!(matches!(l.decompose(&[0, 2]), Err(Error::PartitionNotDense { .. })));
        assert!(matches!(l.decompose(&[0]), Err(Error::PartitionLength { .. })));
        assert!(list(&[(0, 1, 1.0)]).decompose(&[0, 0]).is_err());
    }

    #[test]
    fn test_fold_sums_within_and_between_groups() {
        let l = normalized(&[
            (0, 1, 1.0),
            (1, 0, 2.0),
            (1, 2, 3.0),
            (2, 3, 4.0),
            (3, 0, 5.0),
            (3, 3, 0.5),
        ]);
        let folded = l.fold(&[0, 0, 1, 1]).unwrap();
        assert_eq!(
            folded.iter().collect::<Vec<_>>(),
            vec![(0, 0, 3.0), (0, 1, 3.0), (1, 0, 5.0), (1, 1, 4.5)]
        );
        assert_eq!(folded.row_count(), 2);
        assert!(folded.is_sorted() && folded.is_unique());
        // representative of group 1 is node 2
        assert_eq!(folded.raw_row(1), Some(2));
    }

    #[test]
    fn test_fold_skips_discarded_nodes() {
        let l = normalized(&[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0)]);
        let folded = l.fold(&[0, DISCARD, 0]).unwrap();
        assert_eq!(folded.iter().collect::<Vec<_>>(), vec![(0, 0, 1.0)]);
    }

    #[test]
    fn test_symmetrize_inserts_missing_mirrors() {
        let mut l = list(&[(0, 1, 2.0), (1, 0, 3.0), (1, 2, 4.0), (2, 2, 1.0)]);
        l.symmetrize();
        let _ = l.sort(SortOrder::Ascending, DuplicateMode::Keep);
        assert!(l.is_unique());
        assert_eq!(
            l.iter().collect::<Vec<_>>(),
            vec![(0, 1, 2.0), (1, 0, 3.0), (1, 2, 4.0), (2, 1, 4.0), (2, 2, 1.0)]
        );
    }

    #[test]
    fn test_filter_is_strict() {
        let l = normalized(&[(0, 1, -1.0), (1, 2, 0.0), (2, 0, 2.0)]);
        let positive = l.filter(0.0, f64::INFINITY);
        let negative = l.filter(f64::NEG_INFINITY, 0.0).abs_values();
        assert_eq!(positive.iter().collect::<Vec<_>>(), vec![(2, 0, 2.0)]);
        assert_eq!(negative.iter().collect::<Vec<_>>(), vec![(0, 1, 1.0)]);
        assert_eq!(positive.row_count(), 3);
    }

    proptest! {
        #[test]
        fn normalize_round_trips(
            edges in proptest::collection::vec((0usize..500, 0usize..500, -5.0f64..5.0), 0..60),
        ) {
            let original = list(&edges);
            let mut l = original.clone();
            l.normalize(false);
            let mut ids = l.rows().iter().chain(l.cols());
            prop_assert!(ids.all(|&id| id < l.row_count()));
            l.un_normalize();
            prop_assert_eq!(l.rows(), original.rows());
            prop_assert_eq!(l.cols(), original.cols());
            prop_assert_eq!(l.values(), original.values());
        }

        #[test]
        fn fold_preserves_group_sums(
            edges in proptest::collection::vec((0usize..12, 0usize..12, 1u8..10), 1..50),
            labels in proptest::collection::vec(0usize..3, 12),
        ) {
            let weighted: Vec<_> = edges
                .iter()
                .map(|&(r, c, w)| (r, c, f64::from(w)))
                .collect();
            let l = normalized(&weighted);
            let raw: Vec<usize> = (0..l.row_count())
                .map(|i| labels[l.raw_row(i).unwrap()])
                .collect();
            let p = crate::partition::renumber(&raw);
            let folded = l.fold(&p).unwrap();
            prop_assert!((folded.total_weight() - l.total_weight()).abs() < 1e-9);

            let groups = crate::partition::group_count(&p).unwrap();
            let mut expected = vec![vec![0.0; groups]; groups];
            for (r, c, v) in l.iter() {
                expected[p[r]][p[c]] += v;
            }
            for (g, h, v) in folded.iter() {
                prop_assert!((expected[g][h] - v).abs() < 1e-9);
                expected[g][h] = 0.0;
            }
            prop_assert!(expected.iter().flatten().all(|&v| v == 0.0));
        }
    }
}
