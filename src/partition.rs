//! Partition helpers.
//!
//! A partition is a `Vec<usize>` indexed by normal node id. Each entry is a
//! group id, or [`DISCARD`] for a node that belongs to no group. Structural
//! operations (fold, decompose) require *dense* partitions whose group ids
//! cover exactly `0..G`.
//!
//! The comparison functions ([`nmi`], [`ari`], [`same_grouping`]) ignore
//! nothing: a DISCARD entry is treated as its own label, so two partitions
//! only agree perfectly if they discard the same nodes.
//!
//! # References
//!
//! - Hubert & Arabie (1985). "Comparing partitions" (ARI)
//! - Strehl & Ghosh (2002). "Cluster ensembles" (NMI)

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Marker for a node excluded from every group.
pub const DISCARD: usize = usize::MAX;

/// Every node in its own group.
pub fn identity(n: usize) -> Vec<usize> {
    (0..n).collect()
}

/// Number of groups of a dense partition.
///
/// Fails with [`Error::PartitionNotDense`] if the non-DISCARD ids are not
/// exactly `0..G`.
pub fn group_count(partition: &[usize]) -> Result<usize> {
    let mut seen: Vec<bool> = Vec::new();
    let mut distinct = 0;
    for &g in partition.iter().filter(|&&g| g != DISCARD) {
        if g >= partition.len() {
            // more ids than nodes can never be dense
            return Err(Error::PartitionNotDense {
                group: g,
                groups: partition.len(),
            });
        }
        if g >= seen.len() {
            seen.resize(g + 1, false);
        }
        if !seen[g] {
            seen[g] = true;
            distinct += 1;
        }
    }
    if distinct != seen.len() {
        let group = partition
            .iter()
            .copied()
            .filter(|&g| g != DISCARD && g >= distinct)
            .max()
            .unwrap_or(distinct);
        return Err(Error::PartitionNotDense {
            group,
            groups: distinct,
        });
    }
    Ok(distinct)
}

/// Relabel groups `0..G` in order of first appearance. DISCARD is kept.
///
/// Returns the number of groups.
pub fn renumber_in_place(partition: &mut [usize]) -> usize {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    for g in partition.iter_mut().filter(|g| **g != DISCARD) {
        let next = mapping.len();
        *g = *mapping.entry(*g).or_insert(next);
    }
    mapping.len()
}

/// Copying variant of [`renumber_in_place`].
pub fn renumber(partition: &[usize]) -> Vec<usize> {
    let mut out = partition.to_vec();
    let _ = renumber_in_place(&mut out);
    out
}

/// Members of each group of a dense partition, in ascending node order.
pub fn members(partition: &[usize], groups: usize) -> Vec<Vec<usize>> {
    let mut out = vec![Vec::new(); groups];
    for (node, &g) in partition.iter().enumerate() {
        if g != DISCARD {
            out[g].push(node);
        }
    }
    out
}

/// True if both partitions group (and discard) the same nodes, ignoring labels.
pub fn same_grouping(a: &[usize], b: &[usize]) -> bool {
    a.len() == b.len() && renumber(a) == renumber(b)
}

/// Normalized Mutual Information between two partitions, in [0, 1].
///
/// ```text
/// NMI(U, V) = 2 * I(U; V) / (H(U) + H(V))
/// ```
pub fn nmi(pred: &[usize], truth: &[usize]) -> f64 {
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }
    let n = pred.len() as f64;
    let (joint, p_pred, p_truth) = contingency(pred, truth);

    let entropy = |counts: &HashMap<usize, usize>| -> f64 {
        counts
            .values()
            .map(|&c| {
                let p = c as f64 / n;
                -p * p.ln()
            })
            .sum()
    };
    let h_pred = entropy(&p_pred);
    let h_truth = entropy(&p_truth);

    let mut mi = 0.0;
    for (&(p, t), &count) in &joint {
        let p_joint = count as f64 / n;
        let p_p = p_pred[&p] as f64 / n;
        let p_t = p_truth[&t] as f64 / n;
        mi += p_joint * (p_joint / (p_p * p_t)).ln();
    }

    let denom = h_pred + h_truth;
    if denom > 0.0 {
        2.0 * mi / denom
    } else {
        // both constant
        1.0
    }
}

/// Adjusted Rand Index between two partitions, in [-1, 1].
pub fn ari(pred: &[usize], truth: &[usize]) -> f64 {
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }
    let (joint, p_pred, p_truth) = contingency(pred, truth);

    let index: f64 = joint.values().map(|&c| comb2(c)).sum();
    let a: f64 = p_pred.values().map(|&c| comb2(c)).sum();
    let b: f64 = p_truth.values().map(|&c| comb2(c)).sum();
    let total = comb2(pred.len());
    if total == 0.0 {
        return 1.0;
    }

    let expected = a * b / total;
    let max_index = 0.5 * (a + b);
    if (max_index - expected).abs() < f64::EPSILON {
        return 1.0;
    }
    (index - expected) / (max_index - expected)
}

type Counts = HashMap<usize, usize>;
type Joint = HashMap<(usize, usize), usize>;

fn contingency(pred: &[usize], truth: &[usize]) -> (Joint, Counts, Counts) {
    let mut joint = HashMap::new();
    let mut p_pred = HashMap::new();
    let mut p_truth = HashMap::new();
    for (&p, &t) in pred.iter().zip(truth) {
        *joint.entry((p, t)).or_insert(0) += 1;
        *p_pred.entry(p).or_insert(0) += 1;
        *p_truth.entry(t).or_insert(0) += 1;
    }
    (joint, p_pred, p_truth)
}

fn comb2(n: usize) -> f64 {
    let n = n as f64;
    n * (n - 1.0) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_count_dense() {
        assert_eq!(group_count(&[0, 1, 1, 2, DISCARD]).unwrap(), 3);
        assert_eq!(group_count(&[]).unwrap(), 0);
        assert_eq!(group_count(&[DISCARD, DISCARD]).unwrap(), 0);
    }

    #[test]
    fn test_group_count_rejects_gaps() {
        let err = group_count(&[0, 2, 2]).unwrap_err();
        assert!(matches!(err, Error::PartitionNotDense { group: 2, groups: 2 }));
        assert!(group_count(&[7]).is_err());
    }

    #[test]
    fn test_renumber_first_appearance() {
        let mut p = vec![9, 9, DISCARD, 4, 9, 7];
        assert_eq!(renumber_in_place(&mut p), 3);
        assert_eq!(p, vec![0, 0, DISCARD, 1, 0, 2]);
    }

    #[test]
    fn test_same_grouping_ignores_labels() {
        assert!(same_grouping(&[0, 0, 1, 1], &[5, 5, 3, 3]));
        assert!(!same_grouping(&[0, 0, 1, 1], &[0, 1, 1, 1]));
        assert!(!same_grouping(&[0, DISCARD], &[0, 1]));
    }

    #[test]
    fn test_members() {
        let m = members(&[1, 0, 1, DISCARD], 2);
        assert_eq!(m, vec![vec![1], vec![0, 2]]);
    }

    #[test]
    fn test_perfect_agreement() {
        let a = [0, 0, 1, 1, 2, 2];
        let b = [3, 3, 4, 4, 5, 5];
        assert!((nmi(&a, &b) - 1.0).abs() < 1e-12);
        assert!((ari(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_disagreement_scores_low() {
        let pred = [0, 1, 0, 1];
        let truth = [0, 0, 1, 1];
        assert!(nmi(&pred, &truth) < 0.5);
        assert!(ari(&pred, &truth) < 0.5);
    }
}
