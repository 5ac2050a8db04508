//! Keyed directed graph arena.
//!
//! # Data layout
//!
//! Nodes and links live in two `BTreeMap` arenas keyed by stable integer
//! keys.  Each node entry carries the keys of its outgoing links, so the
//! adjacency scan in a router's inner loop is a single map lookup followed by
//! a slice walk:
//!
//! ```text
//! nodes[n].outgoing = [l0, l1, …]      links[l] = (start, end, payload)
//! ```
//!
//! A link's `end` node does **not** have to exist.  Tiles are cut along the
//! grid, so a road leaving a tile points at a node that only appears once the
//! neighbouring tile is merged.  Consumers must skip such links.
//!
//! `BTreeMap` keeps iteration deterministic, which keeps tile files and
//! extracted tiles byte-stable.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tg_core::{GeoPoint, LinkKey, NodeKey};

use crate::{GraphError, GraphResult};

// ── Payload traits ────────────────────────────────────────────────────────────

/// A node payload with a geographic position.
pub trait Positioned {
    fn position(&self) -> GeoPoint;
}

/// A link payload with a physical length.
pub trait Weighted {
    /// Length in metres.
    fn length_m(&self) -> f64;
}

impl Positioned for GeoPoint {
    #[inline]
    fn position(&self) -> GeoPoint {
        *self
    }
}

// ── Entries ───────────────────────────────────────────────────────────────────

/// A node payload plus its outgoing adjacency.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeEntry<N> {
    pub outgoing: Vec<LinkKey>,
    pub node:     N,
}

/// A directed link payload plus its endpoints.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkEntry<L> {
    pub start: NodeKey,
    pub end:   NodeKey,
    pub link:  L,
}

// ── MergeStats ────────────────────────────────────────────────────────────────

/// Outcome of folding one graph into another.
///
/// Keys are expected to be disjoint across tiles.  A key present on both
/// sides is counted as an overlap; the entry already in the target wins and
/// outgoing lists are unioned.  An overlap whose payload or endpoints differ
/// is also counted as a conflict.  Re-merging the same data overlaps without
/// conflicting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub nodes_added:    usize,
    pub links_added:    usize,
    pub node_overlaps:  usize,
    pub link_overlaps:  usize,
    pub node_conflicts: usize,
    pub link_conflicts: usize,
}

impl MergeStats {
    /// `true` if no key collided.
    pub fn is_disjoint(&self) -> bool {
        self.node_overlaps == 0 && self.link_overlaps == 0
    }

    /// `true` if some colliding key carried different data.
    pub fn has_conflicts(&self) -> bool {
        self.node_conflicts > 0 || self.link_conflicts > 0
    }
}

// ── Graph ─────────────────────────────────────────────────────────────────────

/// Directed graph with caller-chosen node and link keys.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Graph<N, L> {
    nodes: BTreeMap<NodeKey, NodeEntry<N>>,
    links: BTreeMap<LinkKey, LinkEntry<L>>,
}

impl<N, L> Graph<N, L> {
    pub fn new() -> Self {
        Self { nodes: BTreeMap::new(), links: BTreeMap::new() }
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Insert a node under `key`.
    ///
    /// # Errors
    ///
    /// [`GraphError::NodeExists`] if `key` is taken.
    pub fn add_node(&mut self, key: NodeKey, node: N) -> GraphResult<()> {
        match self.nodes.entry(key) {
            Entry::Occupied(_) => Err(GraphError::NodeExists(key)),
            Entry::Vacant(slot) => {
                slot.insert(NodeEntry { outgoing: Vec::new(), node });
                Ok(())
            }
        }
    }

    /// Insert a directed link `start → end` under `key`.
    ///
    /// `end` may be a node that is not (yet) part of this graph.
    ///
    /// # Errors
    ///
    /// [`GraphError::LinkExists`] if `key` is taken,
    /// [`GraphError::NodeNotFound`] if `start` is absent.
    pub fn add_link(&mut self, key: LinkKey, link: L, start: NodeKey, end: NodeKey) -> GraphResult<()> {
        if self.links.contains_key(&key) {
            return Err(GraphError::LinkExists(key));
        }
        let start_entry = self
            .nodes
            .get_mut(&start)
            .ok_or(GraphError::NodeNotFound(start))?;
        start_entry.outgoing.push(key);
        self.links.insert(key, LinkEntry { start, end, link });
        Ok(())
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.links.clear();
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn has_node(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(&key)
    }

    pub fn has_link(&self, key: LinkKey) -> bool {
        self.links.contains_key(&key)
    }

    pub fn node(&self, key: NodeKey) -> Option<&N> {
        self.nodes.get(&key).map(|e| &e.node)
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut N> {
        self.nodes.get_mut(&key).map(|e| &mut e.node)
    }

    pub fn link(&self, key: LinkKey) -> Option<&L> {
        self.links.get(&key).map(|e| &e.link)
    }

    pub fn link_mut(&mut self, key: LinkKey) -> Option<&mut L> {
        self.links.get_mut(&key).map(|e| &mut e.link)
    }

    pub fn link_entry(&self, key: LinkKey) -> Option<&LinkEntry<L>> {
        self.links.get(&key)
    }

    pub fn link_start(&self, key: LinkKey) -> Option<NodeKey> {
        self.links.get(&key).map(|e| e.start)
    }

    pub fn link_end(&self, key: LinkKey) -> Option<NodeKey> {
        self.links.get(&key).map(|e| e.end)
    }

    /// Outgoing link keys of `node`; empty if the node is absent.
    #[inline]
    pub fn outgoing(&self, node: NodeKey) -> &[LinkKey] {
        self.nodes
            .get(&node)
            .map(|e| e.outgoing.as_slice())
            .unwrap_or(&[])
    }

    /// Iterator over `(key, payload)` of every node, in key order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &N)> + '_ {
        self.nodes.iter().map(|(k, e)| (*k, &e.node))
    }

    /// Iterator over `(key, entry)` of every link, in key order.
    pub fn links(&self) -> impl Iterator<Item = (LinkKey, &LinkEntry<L>)> + '_ {
        self.links.iter().map(|(k, e)| (*k, e))
    }

    /// The nodes visited by a link sequence: the start of the first link,
    /// then the end of every link.  Empty for an empty route.
    ///
    /// # Errors
    ///
    /// [`GraphError::LinkNotFound`] for an unknown link key.
    pub fn nodes_on_route(&self, route: &[LinkKey]) -> GraphResult<Vec<NodeKey>> {
        let mut nodes = Vec::with_capacity(route.len() + 1);
        for (i, key) in route.iter().enumerate() {
            let entry = self.links.get(key).ok_or(GraphError::LinkNotFound(*key))?;
            if i == 0 {
                nodes.push(entry.start);
            }
            nodes.push(entry.end);
        }
        Ok(nodes)
    }
}

impl<N: Clone + PartialEq, L: Clone + PartialEq> Graph<N, L> {
    /// Fold every node and link of `other` into `self`.
    pub fn merge(&mut self, other: &Graph<N, L>) -> MergeStats {
        self.merge_where(other, |_| true)
    }

    /// Fold the nodes of `other` accepted by `keep`, plus every link that
    /// starts at one of them.
    pub fn merge_where(&mut self, other: &Graph<N, L>, keep: impl Fn(NodeKey) -> bool) -> MergeStats {
        let mut stats = MergeStats::default();

        for (key, entry) in other.nodes.iter().filter(|(k, _)| keep(**k)) {
            // A colliding link only stays reachable from this node if the
            // surviving entry actually starts here.
            let mut accepted = Vec::with_capacity(entry.outgoing.len());
            for link_key in &entry.outgoing {
                let Some(link) = other.links.get(link_key) else { continue };
                match self.links.entry(*link_key) {
                    Entry::Vacant(slot) => {
                        slot.insert(link.clone());
                        stats.links_added += 1;
                        accepted.push(*link_key);
                    }
                    Entry::Occupied(slot) => {
                        let existing = slot.get();
                        stats.link_overlaps += 1;
                        if existing.start != link.start
                            || existing.end != link.end
                            || existing.link != link.link
                        {
                            stats.link_conflicts += 1;
                        }
                        if existing.start == *key {
                            accepted.push(*link_key);
                        }
                    }
                }
            }

            match self.nodes.entry(*key) {
                Entry::Vacant(slot) => {
                    slot.insert(NodeEntry { outgoing: accepted, node: entry.node.clone() });
                    stats.nodes_added += 1;
                }
                Entry::Occupied(mut slot) => {
                    if slot.get().node != entry.node {
                        stats.node_conflicts += 1;
                    }
                    let outgoing = &mut slot.get_mut().outgoing;
                    for link in accepted {
                        if !outgoing.contains(&link) {
                            outgoing.push(link);
                        }
                    }
                    stats.node_overlaps += 1;
                }
            }
        }

        stats
    }
}

impl<N, L> Default for Graph<N, L> {
    fn default() -> Self {
        Self::new()
    }
}
