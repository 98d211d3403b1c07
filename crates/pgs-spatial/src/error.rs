//! Spatial-subsystem error type.

use thiserror::Error;

use pgs_core::NodeId;

/// Errors produced by `pgs-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("map parse error: {0}")]
    Parse(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
