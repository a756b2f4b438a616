//! Raw ↔ normal id maps and the lineage chain that derived structures carry.
//!
//! A [`IdMap`] assigns dense ids `0..K` to K distinct raw ids. A [`Lineage`]
//! stacks maps: each level's "raw" side is the normal id space of its parent,
//! so any node of a decomposed or folded structure resolves back to the
//! caller's original identifier by walking the chain.
//!
//! ```text
//! folded node 3 ──map──▶ parent node 17 ──map──▶ raw id 90412
//! ```
//!
//! Maps are immutable once built and shared through `Arc`; a derived
//! structure never mutates an ancestor's map.

use std::collections::HashMap;
use std::sync::Arc;

/// Bidirectional mapping between sparse raw ids and dense normal ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdMap {
    /// normal -> raw
    to_raw: Vec<usize>,
    /// raw -> normal
    to_normal: HashMap<usize, usize>,
}

impl IdMap {
    /// Build a map over the distinct values of `ids`.
    ///
    /// Normal ids follow ascending raw order, so a list sorted by raw id
    /// stays sorted after normalization.
    pub fn from_raw_ids<I: IntoIterator<Item = usize>>(ids: I) -> Self {
        let mut to_raw: Vec<usize> = ids.into_iter().collect();
        to_raw.sort_unstable();
        to_raw.dedup();
        Self::from_ordered(to_raw)
    }

    /// Build a map where `to_raw[i]` is the raw id of normal id `i`.
    ///
    /// The raw ids must be distinct.
    pub fn from_ordered(to_raw: Vec<usize>) -> Self {
        let to_normal: HashMap<usize, usize> = to_raw
            .iter()
            .enumerate()
            .map(|(normal, &raw)| (raw, normal))
            .collect();
        debug_assert_eq!(to_normal.len(), to_raw.len(), "raw ids must be distinct");
        Self { to_raw, to_normal }
    }

    /// Identity map over `0..n`.
    pub fn identity(n: usize) -> Self {
        Self::from_ordered((0..n).collect())
    }

    /// Number of mapped ids.
    pub fn len(&self) -> usize {
        self.to_raw.len()
    }

    /// True if no ids are mapped.
    pub fn is_empty(&self) -> bool {
        self.to_raw.is_empty()
    }

    /// Raw id of a normal id.
    ///
    /// # Panics
    ///
    /// Panics if `normal >= self.len()`.
    pub fn raw(&self, normal: usize) -> usize {
        self.to_raw[normal]
    }

    /// Normal id of a raw id, if mapped.
    pub fn normal(&self, raw: usize) -> Option<usize> {
        self.to_normal.get(&raw).copied()
    }

    /// All raw ids in normal order.
    pub fn raw_ids(&self) -> &[usize] {
        &self.to_raw
    }
}

/// Derivation record: an id map plus the lineage of the structure it was
/// derived from.
#[derive(Debug, Clone)]
pub struct Lineage {
    map: Arc<IdMap>,
    parent: Option<Arc<Lineage>>,
}

impl Lineage {
    /// A root lineage whose raw side is the caller's id space.
    pub fn root(map: IdMap) -> Self {
        Self {
            map: Arc::new(map),
            parent: None,
        }
    }

    /// A lineage whose raw side is `parent`'s normal id space.
    pub fn derived(map: IdMap, parent: Arc<Lineage>) -> Self {
        Self {
            map: Arc::new(map),
            parent: Some(parent),
        }
    }

    /// Number of nodes at this level.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if this level maps no nodes.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of maps in the chain (1 for a root).
    pub fn depth(&self) -> usize {
        1 + self.parent.as_ref().map_or(0, |p| p.depth())
    }

    /// One hop up: the id of `normal` in the immediate parent's space.
    pub fn parent_id(&self, normal: usize) -> usize {
        self.map.raw(normal)
    }

    /// Resolve a normal id to the original raw id at the root of the chain.
    pub fn resolve(&self, normal: usize) -> usize {
        let mut id = self.map.raw(normal);
        let mut level = self.parent.as_deref();
        while let Some(lineage) = level {
            id = lineage.map.raw(id);
            level = lineage.parent.as_deref();
        }
        id
    }

    /// Inverse of [`resolve`](Self::resolve): find the normal id at this
    /// level for an original raw id.
    pub fn lookup(&self, raw: usize) -> Option<usize> {
        match &self.parent {
            None => self.map.normal(raw),
            Some(parent) => parent.lookup(raw).and_then(|id| self.map.normal(id)),
        }
    }
}
