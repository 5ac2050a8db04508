//! `tg-osm` — the OpenStreetMap layer of the `tilegraph` map engine.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`model`]  | `OsmNode`, `OsmLink`, `LinkType`, `OsmPlace`, `PlaceType`, `Area` |
//! | [`map`]    | `OpenStreetMap`: road graph + places + areas, tile merging    |
//! | [`codec`]  | Tile file format: magic, version, bincode body                |
//! | [`config`] | `MapConfig`, read from TOML                                   |
//! | [`loader`] | `TileLoader`: region and level-of-detail loading              |
//! | [`cost`]   | `TravelTimeCost`                                              |
//! | [`error`]  | `MapError`, `MapResult<T>`                                    |
//!
//! ```text
//! let mut loader = TileLoader::new(MapConfig::load(path)?);
//! let mut map = OpenStreetMap::new();
//! loader.load_region(&mut map, &area_of_interest)?;
//! let route = map.route(&AstarRouter, from, to, &TravelTimeCost);
//! ```

pub mod codec;
pub mod config;
pub mod cost;
pub mod error;
pub mod loader;
pub mod map;
pub mod model;

#[cfg(test)]
mod tests;

pub use codec::{FORMAT_VERSION, OSM_MAGIC, tile_file_name};
pub use config::MapConfig;
pub use cost::{TravelTimeCost, WALKING_SPEED_MPS};
pub use error::{MapError, MapResult};
pub use loader::TileLoader;
pub use map::{OpenStreetMap, TileMergeStats};
pub use model::{Area, LinkType, OsmLink, OsmNode, OsmPlace, PlaceType};
