//! Graph with per-layer spatial indices, a running bounding box, and the set
//! of tiles folded into it.
//!
//! # Invariants
//!
//! - Every node is indexed in at least one layer, and every index entry
//!   refers to a node of the graph.
//! - `bounding_box` is the exact min/max of every position ever added or
//!   merged; it never shrinks until [`GeoGraph::clear`].
//! - Merging assumes disjoint key spaces across tiles.  Collisions are not
//!   fatal: they are counted in [`MergeStats`], the entry already present
//!   wins, and collisions carrying different data are logged as warnings.

use std::collections::{BTreeSet, HashSet};
use std::ops::RangeInclusive;

use tracing::{debug, warn};

use tg_core::{GeoPoint, GeoRect, LayerKey, LinkKey, NodeKey, TileId};

use crate::graph::{Graph, MergeStats, Positioned};
use crate::index::{SpatialIndex, all_layers};
use crate::{GraphError, GraphResult};

/// A [`Graph`] whose nodes are indexed by position, per layer.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoGraph<N, L> {
    graph:        Graph<N, L>,
    node_index:   SpatialIndex<NodeKey>,
    bounding_box: GeoRect,
    tile_ids:     BTreeSet<TileId>,
}

impl<N, L> GeoGraph<N, L> {
    pub fn new() -> Self {
        Self {
            graph:        Graph::new(),
            node_index:   SpatialIndex::new(),
            bounding_box: GeoRect::empty(),
            tile_ids:     BTreeSet::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// The underlying graph, for routing and iteration.
    pub fn graph(&self) -> &Graph<N, L> {
        &self.graph
    }

    pub fn node_index(&self) -> &SpatialIndex<NodeKey> {
        &self.node_index
    }

    pub fn node(&self, key: NodeKey) -> Option<&N> {
        self.graph.node(key)
    }

    pub fn link(&self, key: LinkKey) -> Option<&L> {
        self.graph.link(key)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn link_count(&self) -> usize {
        self.graph.link_count()
    }

    /// Running bounding box of everything added so far.
    pub fn bounding_box(&self) -> &GeoRect {
        &self.bounding_box
    }

    /// The bounding box padded by `margin_deg` on every side.
    pub fn frame_box(&self, margin_deg: f32) -> GeoRect {
        self.bounding_box.padded(margin_deg)
    }

    /// Tiles that contributed content: the tile of every added node plus
    /// every tile merged as a whole.
    pub fn tile_ids(&self) -> &BTreeSet<TileId> {
        &self.tile_ids
    }

    pub fn has_tile(&self, tile: TileId) -> bool {
        self.tile_ids.contains(&tile)
    }

    /// Record `tile` as folded in.  Returns `false` if it already was.
    pub fn mark_tile(&mut self, tile: TileId) -> bool {
        self.tile_ids.insert(tile)
    }

    /// Grow the bounding box without adding a node (places and areas).
    pub fn expand_bounds(&mut self, pos: GeoPoint) {
        self.bounding_box.expand(pos);
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Insert a directed link; see [`Graph::add_link`].
    pub fn add_link(&mut self, key: LinkKey, link: L, start: NodeKey, end: NodeKey) -> GraphResult<()> {
        self.graph.add_link(key, link, start, end)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Nodes of `layer` inside `rect`: sorted, deduplicated.
    pub fn region(&self, layer: LayerKey, rect: &GeoRect) -> Vec<NodeKey> {
        self.node_index.region(layer, rect)
    }

    /// Layers in which `key` is indexed.
    pub fn node_layers(&self, key: NodeKey) -> Vec<LayerKey> {
        self.node_index
            .layers_by_key(|k| *k == key)
            .remove(&key)
            .unwrap_or_default()
    }

    /// Check the dual-index invariant; see [`SpatialIndex::verify`].
    pub fn verify(&self) -> GraphResult<()> {
        self.node_index.verify()
    }

    pub fn clear(&mut self) {
        self.graph.clear();
        self.node_index.clear();
        self.bounding_box = GeoRect::empty();
        self.tile_ids.clear();
    }
}

impl<N: Positioned, L> GeoGraph<N, L> {
    /// Insert `node` under `key` and index it in `layer`.
    ///
    /// Grows the bounding box and records the node's tile.
    ///
    /// # Errors
    ///
    /// [`GraphError::NodeExists`]; nothing is indexed in that case.
    pub fn add_node(&mut self, layer: LayerKey, key: NodeKey, node: N) -> GraphResult<()> {
        let pos = node.position();
        self.graph.add_node(key, node)?;
        self.bounding_box.expand(pos);
        self.tile_ids.insert(TileId::of(pos));
        self.node_index.insert(layer, key, pos);
        Ok(())
    }

    /// Move the index entries of `key` from layer `old` to layer `new`.
    ///
    /// # Errors
    ///
    /// [`GraphError::NodeNotFound`] for an unknown node,
    /// [`GraphError::NotInLayer`] if it is not indexed in `old`.
    pub fn move_node(&mut self, old: LayerKey, new: LayerKey, key: NodeKey) -> GraphResult<()> {
        let pos = self
            .graph
            .node(key)
            .ok_or(GraphError::NodeNotFound(key))?
            .position();
        if !self.node_index.relocate(old, new, key, pos) {
            return Err(GraphError::NotInLayer { key, layer: old });
        }
        Ok(())
    }

    /// Nearest node to `point` within a `radius_deg` window.
    ///
    /// With `Some(layer)` only that layer is searched; with `None` every
    /// layer is searched and the closest per-layer winner is returned.  The
    /// window is a box, so a node in its corner can be farther than
    /// `radius_deg`; candidates are ranked by great-circle distance.
    pub fn find_next_node(&self, point: GeoPoint, radius_deg: f32, layer: Option<LayerKey>) -> Option<NodeKey> {
        match layer {
            Some(layer) => self.nearest_in_layer(point, radius_deg, layer).map(|(k, _)| k),
            None => self
                .node_index
                .layer_keys()
                .filter_map(|layer| self.nearest_in_layer(point, radius_deg, layer))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(k, _)| k),
        }
    }

    fn nearest_in_layer(&self, point: GeoPoint, radius_deg: f32, layer: LayerKey) -> Option<(NodeKey, f64)> {
        let window = GeoRect::around(point, radius_deg);
        self.region(layer, &window)
            .into_iter()
            .filter_map(|key| {
                let node = self.graph.node(key)?;
                Some((key, point.distance_m(node.position())))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

impl<N: Positioned + Clone + PartialEq, L: Clone + PartialEq> GeoGraph<N, L> {
    /// Fold another instance (a tile) into this one: nodes, links, indices,
    /// bounding box, and tile set.
    ///
    /// Keys of `other` are assumed not to collide with keys already present.
    /// Colliding nodes keep their current payload and index entries.
    pub fn merge_tile(&mut self, other: &GeoGraph<N, L>) -> MergeStats {
        let graph = &self.graph;
        self.node_index
            .merge_where(&other.node_index, all_layers(), |k| !graph.has_node(*k));
        let stats = self.graph.merge(&other.graph);

        self.bounding_box.union(&other.bounding_box);
        self.tile_ids.extend(other.tile_ids.iter().copied());

        log_merge("tile", &stats);
        stats
    }

    /// Fold only the layers of `other` inside `layers`: the nodes indexed
    /// there and the links leaving them.
    ///
    /// A partial merge does not record tiles, so a later full merge of the
    /// same tile still brings in the remaining layers.
    pub fn merge_layers(&mut self, layers: RangeInclusive<LayerKey>, other: &GeoGraph<N, L>) -> MergeStats {
        let selected: HashSet<NodeKey> = other
            .node_index
            .layers_by_key(|_| true)
            .into_iter()
            .filter(|(_, in_layers)| in_layers.iter().any(|l| layers.contains(l)))
            .map(|(key, _)| key)
            .collect();

        let graph = &self.graph;
        self.node_index
            .merge_where(&other.node_index, layers, |k| !graph.has_node(*k));
        let stats = self.graph.merge_where(&other.graph, |k| selected.contains(&k));

        for key in &selected {
            if let Some(node) = other.graph.node(*key) {
                self.bounding_box.expand(node.position());
            }
        }

        log_merge("layers", &stats);
        stats
    }

    /// Fold the layers of `other` up to and including `max_layer`.
    pub fn merge_layer(&mut self, max_layer: LayerKey, other: &GeoGraph<N, L>) -> MergeStats {
        self.merge_layers(LayerKey(i16::MIN)..=max_layer, other)
    }

    /// Copy of the nodes located in `tile`, indexed in their original layers,
    /// plus the links leaving them.
    pub fn extract_tile(&self, tile: TileId) -> GeoGraph<N, L> {
        let mut out = GeoGraph::new();
        let in_tile = |key: &NodeKey| {
            self.graph
                .node(*key)
                .is_some_and(|n| TileId::of(n.position()) == tile)
        };

        for (key, layers) in self.node_index.layers_by_key(in_tile) {
            let Some(node) = self.graph.node(key) else { continue };
            let pos = node.position();
            for layer in layers {
                out.node_index.insert(layer, key, pos);
            }
            out.bounding_box.expand(pos);
        }
        let keep: HashSet<NodeKey> = out
            .node_index
            .layers_by_key(|_| true)
            .into_keys()
            .collect();
        out.graph.merge_where(&self.graph, |k| keep.contains(&k));
        out.tile_ids.insert(tile);
        out
    }
}

impl<N, L> Default for GeoGraph<N, L> {
    fn default() -> Self {
        Self::new()
    }
}

fn log_merge(what: &str, stats: &MergeStats) {
    if stats.has_conflicts() {
        warn!(
            what,
            node_conflicts = stats.node_conflicts,
            link_conflicts = stats.link_conflicts,
            "conflicting keys while merging; existing entries kept"
        );
    }
    debug!(
        what,
        nodes = stats.nodes_added,
        links = stats.links_added,
        node_overlaps = stats.node_overlaps,
        link_overlaps = stats.link_overlaps,
        "merged"
    );
}
