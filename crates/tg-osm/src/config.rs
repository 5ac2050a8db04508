//! Map loading configuration, read from TOML.
//!
//! ```toml
//! tiles_path        = "/srv/tiles"
//! search_radius_deg = 0.02
//! max_layer         = 6        # roads up to `Unclassified` only
//! preload           = [156870, 156871]
//! ```
//!
//! Every field is optional; missing fields take their [`Default`] value.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use tg_core::{LayerKey, TileId};

use crate::MapResult;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Directory holding `<tile>.bin` files.
    pub tiles_path:        PathBuf,
    /// Half-width of the square searched by nearest-node lookups.
    pub search_radius_deg: f32,
    /// Level-of-detail ceiling; `None` loads every layer.
    pub max_layer:         Option<i16>,
    /// Raw tile ids loaded up front.
    pub preload:           Vec<u32>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tiles_path:        PathBuf::from("tiles"),
            search_radius_deg: 0.01,
            max_layer:         None,
            preload:           Vec::new(),
        }
    }
}

impl MapConfig {
    pub fn from_toml_str(text: &str) -> MapResult<MapConfig> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> MapResult<MapConfig> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn max_layer_key(&self) -> Option<LayerKey> {
        self.max_layer.map(LayerKey)
    }

    /// The preload list as validated tile ids.
    ///
    /// # Errors
    ///
    /// [`MapError::Core`](crate::MapError::Core) for a number outside the
    /// tile grid.
    pub fn preload_tiles(&self) -> MapResult<Vec<TileId>> {
        let mut tiles = Vec::with_capacity(self.preload.len());
        for &raw in &self.preload {
            tiles.push(TileId::checked(raw)?);
        }
        Ok(tiles)
    }
}
