//! Single-level local moving.
//!
//! Each pass visits the non-discarded nodes in a seeded random order and
//! moves every node to the neighboring group with the most negative
//! [`Cpm::move_delta`]. Moves apply immediately, so later nodes in the same
//! pass see the updated groups. A node may also leave for an empty group when
//! that lowers H (a node held only by negative edges, say).
//!
//! Passes stop when a pass moves nothing, moves fewer than 1% of the nodes,
//! or the pass cap is reached.

use super::cpm::{Affinity, Cpm, Flow};
use crate::error::{Error, Result};
use crate::graph::{Layer, SignedGraph};
use crate::partition::{self, DISCARD};
use rand::prelude::*;
use tracing::trace;

/// Fraction of nodes that must move for another pass to run.
const MIN_MOVED_FRACTION: f64 = 0.01;

/// Greedy local-move optimizer for one graph level.
#[derive(Debug, Clone)]
pub struct GreedyPass {
    cpm: Cpm,
    max_passes: usize,
    seed: u64,
}

impl GreedyPass {
    /// Create a pass runner.
    pub fn new(cpm: Cpm, max_passes: usize, seed: u64) -> Self {
        Self {
            cpm,
            max_passes: max_passes.max(1),
            seed,
        }
    }

    /// Optimize `partition` in place.
    ///
    /// Group ids may be sparse on input; on return they are dense, numbered
    /// by first appearance. DISCARD nodes neither move nor count as
    /// neighbors. Returns `H_before - H_after` (zero when nothing moved).
    pub fn run(&self, graph: &SignedGraph, partition: &mut [usize]) -> Result<f64> {
        let n = graph.node_count();
        if partition.len() != n {
            return Err(Error::PartitionLength {
                expected: n,
                found: partition.len(),
            });
        }
        let _ = partition::renumber_in_place(partition);

        let sizes = graph.sizes();
        let mut group_size = vec![0.0; n];
        let mut member_count = vec![0usize; n];
        for (node, &g) in partition.iter().enumerate() {
            if g != DISCARD {
                group_size[g] += sizes[node];
                member_count[g] += 1;
            }
        }
        // free group ids; the last one is handed out first
        let mut empty: Vec<usize> = (0..n).rev().filter(|&g| member_count[g] == 0).collect();

        let mut order: Vec<usize> = (0..n).filter(|&i| partition[i] != DISCARD).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut scratch = vec![Affinity::default(); n];
        let mut touched: Vec<usize> = Vec::new();
        let mut improvement = 0.0;
        let cpm = &self.cpm;

        for pass in 0..self.max_passes {
            order.shuffle(&mut rng);
            let mut moved = 0usize;

            for &node in &order {
                let current = partition[node];
                let node_size = sizes[node];

                let mut self_loop = Affinity::default();
                accumulate(
                    graph.positive(),
                    partition,
                    node,
                    |a| &mut a.positive,
                    &mut scratch,
                    &mut touched,
                    &mut self_loop.positive,
                );
                if let Some(negative) = graph.negative() {
                    accumulate(
                        negative,
                        partition,
                        node,
                        |a| &mut a.negative,
                        &mut scratch,
                        &mut touched,
                        &mut self_loop.negative,
                    );
                }

                let here = scratch[current] + self_loop;
                let own_size = group_size[current] - node_size;
                let mut best = current;
                let mut best_delta = 0.0;
                for &g in &touched {
                    if g == current {
                        continue;
                    }
                    let there = scratch[g] + self_loop;
                    let delta = cpm.move_delta(node_size, &here, own_size, &there, group_size[g]);
                    if delta < best_delta {
                        best = g;
                        best_delta = delta;
                    }
                }
                if member_count[current] > 1 {
                    if let Some(&g) = empty.last() {
                        let delta = cpm.move_delta(node_size, &here, own_size, &self_loop, 0.0);
                        if delta < best_delta {
                            best = g;
                            best_delta = delta;
                        }
                    }
                }

                for &g in &touched {
                    scratch[g] = Affinity::default();
                }
                touched.clear();

                if best == current {
                    continue;
                }
                if member_count[best] == 0 {
                    let _ = empty.pop();
                }
                group_size[current] -= node_size;
                member_count[current] -= 1;
                if member_count[current] == 0 {
                    empty.push(current);
                }
                group_size[best] += node_size;
                member_count[best] += 1;
                partition[node] = best;
                improvement -= best_delta;
                moved += 1;
            }

            trace!(pass, moved, nodes = order.len(), improvement, "greedy pass");
            if moved == 0 || (moved as f64) < MIN_MOVED_FRACTION * order.len() as f64 {
                break;
            }
        }

        let _ = partition::renumber_in_place(partition);
        Ok(improvement)
    }
}

/// Add `node`'s flows on one layer to the scratch affinities of the groups
/// it touches. Self-loops go to `self_loop`, halved per direction, since
/// they belong to whichever group the node ends up in.
fn accumulate(
    layer: &Layer,
    partition: &[usize],
    node: usize,
    flow_of: impl Fn(&mut Affinity) -> &mut Flow,
    scratch: &mut [Affinity],
    touched: &mut Vec<usize>,
    self_loop: &mut Flow,
) {
    let mut visit = |target: usize, value: f64, outward: bool| {
        if target == node {
            if outward {
                self_loop.out += value / 2.0;
            } else {
                self_loop.into += value / 2.0;
            }
            return;
        }
        let g = partition[target];
        if g == DISCARD {
            return;
        }
        let affinity = &mut scratch[g];
        // layer values are strictly positive, so a default entry is untouched
        if *affinity == Affinity::default() {
            touched.push(g);
        }
        let flow = flow_of(affinity);
        if outward {
            flow.out += value;
        } else {
            flow.into += value;
        }
    };
    for (target, value) in layer.forward().row(node) {
        visit(target, value, true);
    }
    for (source, value) in layer.backward().row(node) {
        visit(source, value, false);
    }
}
