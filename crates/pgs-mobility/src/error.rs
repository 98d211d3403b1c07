use thiserror::Error;

use pgs_spatial::SpatialError;
use pgs_world::WorldError;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("the street network has no streets to place a car on")]
    EmptyNetwork,

    #[error(transparent)]
    World(#[from] WorldError),

    #[error("routing failed: {0}")]
    Routing(#[from] SpatialError),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
