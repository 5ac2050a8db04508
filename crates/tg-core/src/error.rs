//! Core error type.
//!
//! Sub-crates define their own error enums; `CoreError` only covers the
//! checked constructors in this crate.

use thiserror::Error;

/// Errors produced by `tg-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("coordinate ({lon}, {lat}) is outside the WGS-84 range")]
    InvalidCoordinate { lon: f32, lat: f32 },

    #[error("tile number {0} is outside the 0.5° grid")]
    InvalidTile(u32),
}

/// Shorthand result type for `tg-core`.
pub type CoreResult<T> = Result<T, CoreError>;
