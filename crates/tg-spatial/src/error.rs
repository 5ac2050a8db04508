//! Spatial-subsystem error type.

use thiserror::Error;

use tg_core::{LayerKey, LinkKey, NodeKey};

/// Errors produced by `tg-spatial`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node {0} already exists")]
    NodeExists(NodeKey),

    #[error("link {0} already exists")]
    LinkExists(LinkKey),

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeKey),

    #[error("link {0} not found in graph")]
    LinkNotFound(LinkKey),

    #[error("node {key} is not indexed in layer {layer}")]
    NotInLayer { key: NodeKey, layer: LayerKey },

    #[error("layer {layer} index mismatch: {lon} longitude vs {lat} latitude entries")]
    IndexMismatch { layer: LayerKey, lon: usize, lat: usize },
}

pub type GraphResult<T> = Result<T, GraphError>;
