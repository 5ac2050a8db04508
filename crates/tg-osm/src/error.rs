//! Map-subsystem error type.

use thiserror::Error;

use tg_core::{AreaKey, CoreError, PlaceKey};
use tg_spatial::GraphError;

/// Errors produced by `tg-osm`.
#[derive(Debug, Error)]
pub enum MapError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("place {0} already exists")]
    PlaceExists(PlaceKey),

    #[error("area {0} already exists")]
    AreaExists(AreaKey),

    #[error("area {0} has no points")]
    EmptyArea(AreaKey),

    #[error("not a tile file: magic {found:#010x}, expected {expected:#010x}")]
    BadMagic { expected: u32, found: u32 },

    #[error("tile format version {found}, expected {expected}")]
    VersionMismatch { expected: u16, found: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tile codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type MapResult<T> = Result<T, MapError>;
