//! Incremental tile loading driven by a [`MapConfig`].
//!
//! A [`TileLoader`] owns the decode buffer and remembers which tiles it has
//! loaded at a reduced level of detail, so asking for the same region twice
//! touches the disk once.

use std::collections::BTreeMap;

use tracing::{debug, info};

use tg_core::{GeoPoint, GeoRect, LayerKey, NodeKey, TileId};

use crate::{MapConfig, MapResult, OpenStreetMap, tile_file_name};

pub struct TileLoader {
    config:  MapConfig,
    scratch: OpenStreetMap,
    /// Tiles merged up to a layer ceiling only, with that ceiling.
    partial: BTreeMap<TileId, LayerKey>,
}

impl TileLoader {
    pub fn new(config: MapConfig) -> Self {
        Self { config, scratch: OpenStreetMap::new(), partial: BTreeMap::new() }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// `true` if `tile` was merged at a reduced level of detail only.
    pub fn is_partial(&self, tile: TileId) -> bool {
        self.partial.contains_key(&tile)
    }

    /// Merge `tile` into `map` at the configured level of detail.
    ///
    /// Returns `Ok(false)` if nothing was read: the tile is already merged at
    /// this level, or it has no file.
    pub fn load_tile(&mut self, map: &mut OpenStreetMap, tile: TileId) -> MapResult<bool> {
        match self.config.max_layer_key() {
            None => self.load_full(map, tile),
            Some(max) => {
                if map.tile_ids().contains(&tile) || self.partial.get(&tile).is_some_and(|&m| m >= max) {
                    return Ok(false);
                }
                if !self.has_file(tile) {
                    return Ok(false);
                }
                let dir = self.config.tiles_path.clone();
                let loaded = map.merge_osm_layer(LayerKey(i16::MIN)..=max, tile, &dir, &mut self.scratch)?;
                if loaded {
                    self.partial.insert(tile, max);
                }
                Ok(loaded)
            }
        }
    }

    /// Merge every layer of `tile`, regardless of the configured ceiling.
    pub fn load_full(&mut self, map: &mut OpenStreetMap, tile: TileId) -> MapResult<bool> {
        if map.tile_ids().contains(&tile) || !self.has_file(tile) {
            return Ok(false);
        }
        let dir = self.config.tiles_path.clone();
        let loaded = map.merge_osm_tile(tile, &dir, &mut self.scratch)?;
        self.partial.remove(&tile);
        Ok(loaded)
    }

    /// Merge every tile intersecting `rect`.  Returns the number of tiles
    /// read.
    pub fn load_region(&mut self, map: &mut OpenStreetMap, rect: &GeoRect) -> MapResult<usize> {
        let mut loaded = 0;
        for tile in TileId::covering(rect) {
            if self.load_tile(map, tile)? {
                loaded += 1;
            }
        }
        if loaded > 0 {
            info!(loaded, nodes = map.node_count(), "region loaded");
        }
        Ok(loaded)
    }

    /// Merge the configured preload tiles.
    pub fn preload(&mut self, map: &mut OpenStreetMap) -> MapResult<usize> {
        let mut loaded = 0;
        for tile in self.config.preload_tiles()? {
            if self.load_tile(map, tile)? {
                loaded += 1;
            }
        }
        Ok(loaded)
    }

    /// Load the tiles around `point`, then return the nearest node within
    /// the configured search radius.
    pub fn nearest_node(&mut self, map: &mut OpenStreetMap, point: GeoPoint) -> MapResult<Option<NodeKey>> {
        let radius = self.config.search_radius_deg;
        self.load_region(map, &GeoRect::around(point, radius))?;
        Ok(map.find_next_node(point, radius, None))
    }

    fn has_file(&self, tile: TileId) -> bool {
        let path = tile_file_name(&self.config.tiles_path, tile);
        let exists = path.is_file();
        if !exists {
            debug!(%tile, path = %path.display(), "no tile file; skipped");
        }
        exists
    }
}
