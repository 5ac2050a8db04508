//! The map: a geo-indexed road graph plus places and areas, each with its own
//! per-layer dual-axis index.
//!
//! # Tile merging
//!
//! A map is assembled from tiles.  [`OpenStreetMap::merge_osm_tile`] loads a
//! tile file into a scratch map and folds it in; a tile already in
//! [`tile_ids`](OpenStreetMap::tile_ids) is skipped, so loading is
//! idempotent.  [`OpenStreetMap::merge_osm_layer`] folds only a layer range
//! and leaves the tile unmarked, so a later full load still happens.
//!
//! Keys are assumed disjoint across tiles.  A key met twice keeps its first
//! entry; the collision is counted in [`TileMergeStats`].

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tg_core::{AreaKey, GeoPoint, GeoRect, LayerKey, LinkKey, NodeKey, PlaceKey, TileId};
use tg_routing::{CostPolicy, RouteResult, Router};
use tg_spatial::{GeoGraph, Graph, MergeStats, SpatialIndex, all_layers};

use crate::model::{Area, OsmLink, OsmNode, OsmPlace};
use crate::{MapError, MapResult, tile_file_name};

// ── TileMergeStats ────────────────────────────────────────────────────────────

/// Outcome of folding one map into another.
///
/// As with [`MergeStats`], an overlap is a key present on both sides and a
/// conflict is an overlap whose payload differs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileMergeStats {
    pub graph:           MergeStats,
    pub places_added:    usize,
    pub areas_added:     usize,
    pub place_overlaps:  usize,
    pub area_overlaps:   usize,
    pub place_conflicts: usize,
    pub area_conflicts:  usize,
}

impl TileMergeStats {
    /// `true` if no key of any entity family collided.
    pub fn is_disjoint(&self) -> bool {
        self.graph.is_disjoint() && self.place_overlaps == 0 && self.area_overlaps == 0
    }

    pub fn has_conflicts(&self) -> bool {
        self.graph.has_conflicts() || self.place_conflicts > 0 || self.area_conflicts > 0
    }
}

// ── OpenStreetMap ─────────────────────────────────────────────────────────────

/// Road graph, places and areas of a set of tiles.
///
/// Field order is the tile file payload order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OpenStreetMap {
    geo:         GeoGraph<OsmNode, OsmLink>,
    place_index: SpatialIndex<PlaceKey>,
    places:      BTreeMap<PlaceKey, OsmPlace>,
    area_index:  SpatialIndex<AreaKey>,
    areas:       BTreeMap<AreaKey, Area>,
}

impl OpenStreetMap {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Add a routing node in `layer`.
    pub fn add_node(&mut self, layer: LayerKey, key: NodeKey, node: OsmNode) -> MapResult<()> {
        Ok(self.geo.add_node(layer, key, node)?)
    }

    /// Add a directed link; `end` may lie in a tile not loaded yet.
    pub fn add_link(&mut self, key: LinkKey, link: OsmLink, start: NodeKey, end: NodeKey) -> MapResult<()> {
        Ok(self.geo.add_link(key, link, start, end)?)
    }

    /// Add a place in `layer` and grow the bounding box.
    ///
    /// # Errors
    ///
    /// [`MapError::PlaceExists`] if `key` is taken.
    pub fn add_place(&mut self, key: PlaceKey, layer: LayerKey, place: OsmPlace) -> MapResult<()> {
        let pos = place.pos;
        match self.places.entry(key) {
            Entry::Occupied(_) => return Err(MapError::PlaceExists(key)),
            Entry::Vacant(slot) => {
                slot.insert(place);
            }
        }
        self.place_index.insert(layer, key, pos);
        self.geo.expand_bounds(pos);
        Ok(())
    }

    /// Add an area in `layer`, indexing every vertex, and grow the bounding
    /// box.
    ///
    /// # Errors
    ///
    /// [`MapError::AreaExists`] if `key` is taken, [`MapError::EmptyArea`]
    /// for a polygon without points.
    pub fn add_area(&mut self, key: AreaKey, layer: LayerKey, area: Area) -> MapResult<()> {
        if area.is_empty() {
            return Err(MapError::EmptyArea(key));
        }
        if self.areas.contains_key(&key) {
            return Err(MapError::AreaExists(key));
        }
        for p in &area.points {
            self.area_index.insert(layer, key, *p);
            self.geo.expand_bounds(*p);
        }
        self.areas.insert(key, area);
        Ok(())
    }

    /// Move a node's index entries from layer `old` to layer `new`.
    pub fn move_node(&mut self, old: LayerKey, new: LayerKey, key: NodeKey) -> MapResult<()> {
        Ok(self.geo.move_node(old, new, key)?)
    }

    pub fn clear(&mut self) {
        self.geo.clear();
        self.place_index.clear();
        self.places.clear();
        self.area_index.clear();
        self.areas.clear();
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn geo(&self) -> &GeoGraph<OsmNode, OsmLink> {
        &self.geo
    }

    pub fn graph(&self) -> &Graph<OsmNode, OsmLink> {
        self.geo.graph()
    }

    pub fn node(&self, key: NodeKey) -> Option<&OsmNode> {
        self.geo.node(key)
    }

    pub fn link(&self, key: LinkKey) -> Option<&OsmLink> {
        self.geo.link(key)
    }

    pub fn place(&self, key: PlaceKey) -> Option<&OsmPlace> {
        self.places.get(&key)
    }

    pub fn area(&self, key: AreaKey) -> Option<&Area> {
        self.areas.get(&key)
    }

    pub fn has_area(&self, key: AreaKey) -> bool {
        self.areas.contains_key(&key)
    }

    pub fn node_count(&self) -> usize {
        self.geo.node_count()
    }

    pub fn link_count(&self) -> usize {
        self.geo.link_count()
    }

    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    pub fn bounding_box(&self) -> &GeoRect {
        self.geo.bounding_box()
    }

    pub fn frame_box(&self, margin_deg: f32) -> GeoRect {
        self.geo.frame_box(margin_deg)
    }

    pub fn tile_ids(&self) -> &BTreeSet<TileId> {
        self.geo.tile_ids()
    }

    /// Tiles owning any entity: the node tiles of [`tile_ids`](Self::tile_ids)
    /// plus the tiles of every place and of every area's first vertex.
    pub fn content_tiles(&self) -> BTreeSet<TileId> {
        let mut tiles = self.tile_ids().clone();
        tiles.extend(self.places.values().map(|p| TileId::of(p.pos)));
        tiles.extend(self.areas.values().filter_map(Area::tile));
        tiles
    }

    pub fn place_index(&self) -> &SpatialIndex<PlaceKey> {
        &self.place_index
    }

    pub fn area_index(&self) -> &SpatialIndex<AreaKey> {
        &self.area_index
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Nodes of `layer` inside `rect`.
    pub fn region(&self, layer: LayerKey, rect: &GeoRect) -> Vec<NodeKey> {
        self.geo.region(layer, rect)
    }

    /// Places of `layer` inside `rect`.
    pub fn places(&self, layer: LayerKey, rect: &GeoRect) -> Vec<PlaceKey> {
        self.place_index.region(layer, rect)
    }

    /// Areas of `layer` with a vertex longitude and a vertex latitude inside
    /// `rect`.  The two may belong to different vertices.
    pub fn areas(&self, layer: LayerKey, rect: &GeoRect) -> Vec<AreaKey> {
        self.area_index.region(layer, rect)
    }

    pub fn find_next_node(&self, point: GeoPoint, radius_deg: f32, layer: Option<LayerKey>) -> Option<NodeKey> {
        self.geo.find_next_node(point, radius_deg, layer)
    }

    /// Route over the loaded road graph.
    pub fn route<R, C>(&self, router: &R, from: NodeKey, to: NodeKey, cost: &C) -> Option<RouteResult>
    where
        R: Router<OsmNode, OsmLink, C>,
        C: CostPolicy<OsmNode, OsmLink>,
    {
        router.route(self.geo.graph(), from, to, cost)
    }

    // ── Tiles ─────────────────────────────────────────────────────────────

    /// Copy of everything owned by `tile`: nodes located in it with their
    /// outgoing links, places located in it, and areas whose first vertex is
    /// in it.  Every entity keeps its layers.
    pub fn extract_tile(&self, tile: TileId) -> OpenStreetMap {
        let mut out = OpenStreetMap { geo: self.geo.extract_tile(tile), ..Self::default() };

        let owned_places = self
            .place_index
            .layers_by_key(|k| self.places.get(k).is_some_and(|p| TileId::of(p.pos) == tile));
        for (key, layers) in owned_places {
            let Some(place) = self.places.get(&key) else { continue };
            for layer in layers {
                out.place_index.insert(layer, key, place.pos);
            }
            out.geo.expand_bounds(place.pos);
            out.places.insert(key, place.clone());
        }

        let owned_areas = self
            .area_index
            .layers_by_key(|k| self.areas.get(k).is_some_and(|a| a.in_tile(tile)));
        for (key, layers) in owned_areas {
            let Some(area) = self.areas.get(&key) else { continue };
            for layer in layers {
                for p in &area.points {
                    out.area_index.insert(layer, key, *p);
                }
            }
            for p in &area.points {
                out.geo.expand_bounds(*p);
            }
            out.areas.insert(key, area.clone());
        }

        out
    }

    /// Fold another map (a tile) into this one.
    pub fn merge_tile(&mut self, other: &OpenStreetMap) -> TileMergeStats {
        self.merge_range(all_layers(), other, true)
    }

    /// Fold only the layers of `other` inside `layers`.  Tiles are not
    /// marked as merged.
    pub fn merge_layers(&mut self, layers: RangeInclusive<LayerKey>, other: &OpenStreetMap) -> TileMergeStats {
        self.merge_range(layers, other, false)
    }

    /// Fold the layers of `other` up to and including `max_layer`.
    pub fn merge_layer(&mut self, max_layer: LayerKey, other: &OpenStreetMap) -> TileMergeStats {
        self.merge_layers(LayerKey(i16::MIN)..=max_layer, other)
    }

    /// Load `tile` from `dir` and fold it in.
    ///
    /// Returns `Ok(false)` without touching the disk if the tile is already
    /// merged.  The decoded tile is left in `scratch`.
    pub fn merge_osm_tile(&mut self, tile: TileId, dir: &Path, scratch: &mut OpenStreetMap) -> MapResult<bool> {
        if self.geo.has_tile(tile) {
            return Ok(false);
        }
        *scratch = OpenStreetMap::load(&tile_file_name(dir, tile))?;

        let stats = self.merge_tile(scratch);
        self.geo.mark_tile(tile);
        info!(
            %tile,
            nodes = stats.graph.nodes_added,
            links = stats.graph.links_added,
            places = stats.places_added,
            areas = stats.areas_added,
            "tile merged"
        );
        Ok(true)
    }

    /// Load `tile` from `dir` and fold in only the layers inside `layers`.
    ///
    /// A tile already fully merged is skipped.  The tile is not marked, so a
    /// later [`merge_osm_tile`](Self::merge_osm_tile) still loads the rest.
    pub fn merge_osm_layer(
        &mut self,
        layers:  RangeInclusive<LayerKey>,
        tile:    TileId,
        dir:     &Path,
        scratch: &mut OpenStreetMap,
    ) -> MapResult<bool> {
        if self.geo.has_tile(tile) {
            return Ok(false);
        }
        *scratch = OpenStreetMap::load(&tile_file_name(dir, tile))?;

        let stats = self.merge_layers(layers.clone(), scratch);
        info!(
            %tile,
            layers = ?layers,
            nodes = stats.graph.nodes_added,
            places = stats.places_added,
            areas = stats.areas_added,
            "tile layers merged"
        );
        Ok(true)
    }

    fn merge_range(&mut self, layers: RangeInclusive<LayerKey>, other: &OpenStreetMap, whole: bool) -> TileMergeStats {
        let graph = if whole {
            self.geo.merge_tile(&other.geo)
        } else {
            self.geo.merge_layers(layers.clone(), &other.geo)
        };
        let mut stats = TileMergeStats { graph, ..TileMergeStats::default() };

        // Places.
        let selected = other.place_index.layers_by_key(|_| true);
        let places = &self.places;
        self.place_index
            .merge_where(&other.place_index, layers.clone(), |k| !places.contains_key(k));
        for (key, in_layers) in selected {
            if !in_layers.iter().any(|l| layers.contains(l)) {
                continue;
            }
            let Some(place) = other.places.get(&key) else { continue };
            match self.places.entry(key) {
                Entry::Occupied(slot) => {
                    stats.place_overlaps += 1;
                    if slot.get() != place {
                        stats.place_conflicts += 1;
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(place.clone());
                    stats.places_added += 1;
                }
            }
            self.geo.expand_bounds(place.pos);
        }

        // Areas.
        let selected = other.area_index.layers_by_key(|_| true);
        let areas = &self.areas;
        self.area_index
            .merge_where(&other.area_index, layers.clone(), |k| !areas.contains_key(k));
        for (key, in_layers) in selected {
            if !in_layers.iter().any(|l| layers.contains(l)) {
                continue;
            }
            let Some(area) = other.areas.get(&key) else { continue };
            match self.areas.entry(key) {
                Entry::Occupied(slot) => {
                    stats.area_overlaps += 1;
                    if slot.get() != area {
                        stats.area_conflicts += 1;
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(area.clone());
                    stats.areas_added += 1;
                }
            }
            for p in &area.points {
                self.geo.expand_bounds(*p);
            }
        }

        if stats.place_conflicts > 0 || stats.area_conflicts > 0 {
            warn!(
                place_conflicts = stats.place_conflicts,
                area_conflicts = stats.area_conflicts,
                "conflicting places or areas while merging; existing entries kept"
            );
        }
        stats
    }

    /// Check the dual-axis invariant of all three indices.
    pub fn verify(&self) -> MapResult<()> {
        self.geo.verify()?;
        self.place_index.verify()?;
        self.area_index.verify()?;
        Ok(())
    }
}
