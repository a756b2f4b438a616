//! Least-loaded batch scheduler over a fixed worker pool.
//!
//! Tasks are weighed by edge count, not by number: a batch often holds one
//! huge component next to many tiny ones. In submission order each task goes
//! to the worker with the smallest accumulated load. A worker's tasks run
//! one after another; workers run concurrently on a dedicated rayon pool.
//! The caller blocks until every worker is done and gets results back in
//! submission order.

use crate::error::{Error, Result};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A unit of work and its weight.
#[derive(Debug)]
struct Task<T> {
    id: usize,
    load: usize,
    payload: T,
}

/// Fixed-size pool with least-loaded assignment.
#[derive(Debug)]
pub struct Scheduler {
    threads: usize,
    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
}

impl Scheduler {
    /// Create a scheduler with `threads` workers.
    ///
    /// One thread means tasks run in order on the caller's thread.
    pub fn new(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(Error::InvalidParameter {
                name: "threads",
                message: "must be >= 1",
            });
        }

        #[cfg(feature = "parallel")]
        let pool = if threads > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("potts-worker-{i}"))
                .build()
                .map_err(|e| Error::Scheduler(e.to_string()))?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            threads,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    /// A scheduler that runs everything on the caller's thread.
    pub fn sequential() -> Self {
        Self {
            threads: 1,
            #[cfg(feature = "parallel")]
            pool: None,
        }
    }

    /// Number of workers.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Run `f` over `(load, payload)` tasks; results follow task order.
    ///
    /// The first failing task's error is returned and no partial results
    /// are kept.
    pub fn run<T, R, F>(&self, tasks: Vec<(usize, T)>, f: F) -> Result<Vec<R>>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> Result<R> + Sync,
    {
        let count = tasks.len();
        let buckets = assign(tasks, self.threads);
        let loads: Vec<usize> = buckets
            .iter()
            .map(|b| b.iter().map(|t| t.load).sum())
            .collect();
        trace!(tasks = count, workers = buckets.len(), ?loads, "dispatch");

        let run_bucket = |bucket: Vec<Task<T>>| -> Result<Vec<(usize, R)>> {
            bucket
                .into_iter()
                .map(|t| f(t.payload).map(|r| (t.id, r)))
                .collect()
        };

        #[cfg(feature = "parallel")]
        let finished: Result<Vec<Vec<(usize, R)>>> = match &self.pool {
            Some(pool) => pool.install(|| buckets.into_par_iter().map(run_bucket).collect()),
            None => buckets.into_iter().map(run_bucket).collect(),
        };
        #[cfg(not(feature = "parallel"))]
        let finished: Result<Vec<Vec<(usize, R)>>> = buckets.into_iter().map(run_bucket).collect();

        let mut slots: Vec<Option<R>> = (0..count).map(|_| None).collect();
        for (id, result) in finished?.into_iter().flatten() {
            slots[id] = Some(result);
        }
        let missing = || Error::Scheduler("a task produced no result".to_string());
        slots.into_iter().map(|r| r.ok_or_else(missing)).collect()
    }
}

/// Greedy least-loaded assignment of tasks (in order) to `workers` buckets.
fn assign<T>(tasks: Vec<(usize, T)>, workers: usize) -> Vec<Vec<Task<T>>> {
    let workers = workers.clamp(1, tasks.len().max(1));
    let mut buckets: Vec<Vec<Task<T>>> = (0..workers).map(|_| Vec::new()).collect();
    let mut heap: BinaryHeap<Reverse<(usize, usize)>> =
        (0..workers).map(|w| Reverse((0, w))).collect();

    for (id, (load, payload)) in tasks.into_iter().enumerate() {
        let Some(Reverse((current, worker))) = heap.pop() else {
            break;
        };
        buckets[worker].push(Task { id, load, payload });
        heap.push(Reverse((current + load, worker)));
    }
    buckets
}
