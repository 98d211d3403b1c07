//! Guidance error type.

use thiserror::Error;

use pgs_core::SpotId;
use pgs_spatial::SpatialError;

/// Errors from the guidance service.  "No spot" and "no path" are not
/// errors; they are `Ok(None)`.
#[derive(Debug, Error)]
pub enum GuidanceError {
    /// The strategy returned a spot the world's spot index does not know, or
    /// knows at a different address.  Shared state is corrupt.
    #[error("{0} is missing from the spot index")]
    IncoherentSpotIndex(SpotId),

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

pub type GuidanceResult<T> = Result<T, GuidanceError>;
