//! `tg-spatial` — keyed graph arena, dual-axis layer indices, and the
//! geo-indexed graph built from both.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`graph`]    | `Graph<N, L>`, `Positioned`, `Weighted`, `MergeStats`      |
//! | [`index`]    | `PositionValue`, `Layer`, `SpatialIndex`                   |
//! | [`geograph`] | `GeoGraph<N, L>`: graph + node index + bbox + tile set     |
//! | [`error`]    | `GraphError`, `GraphResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on graphs and indices.     |

pub mod error;
pub mod geograph;
pub mod graph;
pub mod index;


pub use error::{GraphError, GraphResult};
pub use geograph::GeoGraph;
pub use graph::{Graph, LinkEntry, MergeStats, NodeEntry, Positioned, Weighted};
pub use index::{Layer, PositionValue, SpatialIndex, all_layers};
