//! `tg-core` — foundational types for the `tilegraph` map engine.
//!
//! This crate is a dependency of every other `tg-*` crate.  It
//! has no `tg-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `NodeKey`, `LinkKey`, `PlaceKey`, `AreaKey`, `LayerKey`, `TileId` |
//! | [`geo`]     | `GeoPoint`, `GeoRect`, haversine distance                 |
//! | [`tile`]    | 0.5° tile grid: `TileId::of`, `bounds`, `covering`        |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required by the tile codec in `tg-osm`.                    |

pub mod error;
pub mod geo;
pub mod ids;
pub mod tile;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{GeoPoint, GeoRect};
pub use ids::{AreaKey, LayerKey, LinkKey, NodeKey, PlaceKey, TileId};
