use thiserror::Error;

use pgs_guidance::GuidanceError;
use pgs_mobility::MobilityError;
use pgs_world::WorldError;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error(transparent)]
    Mobility(#[from] MobilityError),

    #[error(transparent)]
    Guidance(#[from] GuidanceError),

    #[error(transparent)]
    World(#[from] WorldError),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
