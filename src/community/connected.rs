//! Split groups into positively connected components.

use crate::error::{Error, Result};
use crate::graph::SignedGraph;
use crate::partition::DISCARD;
use petgraph::unionfind::UnionFind;
use std::collections::HashMap;

/// Split every group into the components formed by its internal positive
/// edges, ignoring direction.
///
/// Negative edges and edges leaving a group play no part. Components are
/// numbered by first appearance in node order; DISCARD nodes stay DISCARD.
///
/// ```rust
/// use potts::{community::connected_groups, SignedGraph, SparseGraph};
///
/// let g = SparseGraph::from_edges([(0, 1, 1.0), (2, 3, 1.0)]).unwrap();
/// let g = SignedGraph::new(&g).unwrap();
/// assert_eq!(connected_groups(&g, &[0, 0, 0, 0]).unwrap(), vec![0, 0, 1, 1]);
/// ```
pub fn connected_groups(graph: &SignedGraph, partition: &[usize]) -> Result<Vec<usize>> {
    let n = graph.node_count();
    if partition.len() != n {
        return Err(Error::PartitionLength {
            expected: n,
            found: partition.len(),
        });
    }

    let mut components = UnionFind::<usize>::new(n);
    for (r, c, _) in graph.positive().forward().relations().iter() {
        if partition[r] != DISCARD && partition[r] == partition[c] {
            let _ = components.union(r, c);
        }
    }

    let mut labels: HashMap<usize, usize> = HashMap::new();
    Ok((0..n)
        .map(|node| {
            if partition[node] == DISCARD {
                return DISCARD;
            }
            let root = components.find(node);
            let next = labels.len();
            *labels.entry(root).or_insert(next)
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::graph::SparseGraph;

    fn signed(edges: &[(usize, usize, f64)]) -> SignedGraph {
        SignedGraph::new(&SparseGraph::from_edges(edges.iter().copied()).unwrap()).unwrap()
    }

    #[test]
    fn test_splits_disjoint_edges() {
        let g = signed(&[(0, 1, 1.0), (2, 3, 1.0)]);
        let p = connected_groups(&g, &[0, 0, 0, 0]).unwrap();
        assert_eq!(p, vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_negative_edges_do_not_connect() {
        let g = signed(&[(0, 1, 1.0), (1, 2, -1.0)]);
        assert_eq!(connected_groups(&g, &[0, 0, 0]).unwrap(), vec![0, 0, 1]);
    }

    #[test]
    fn test_cross_group_edges_do_not_connect() {
        // 0 and 2 only meet through 1, which sits in another group
        let g = signed(&[(0, 1, 1.0), (1, 2, 1.0)]);
        assert_eq!(connected_groups(&g, &[0, 1, 0]).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_direction_is_ignored() {
        let g = signed(&[(1, 0, 1.0), (2, 1, 1.0)]);
        assert_eq!(connected_groups(&g, &[5, 5, 5]).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_discard_is_kept() {
        let g = signed(&[(0, 1, 1.0), (1, 2, 1.0)]);
        let p = connected_groups(&g, &[0, DISCARD, 0]).unwrap();
        assert_eq!(p, vec![0, DISCARD, 1]);
    }
}
