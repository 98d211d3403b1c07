//! World-model error type.

use thiserror::Error;

use pgs_core::{AgentId, EdgeId, SpotId};

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("world configuration error: {0}")]
    Config(String),

    #[error("car count underflow on {0}")]
    CarCountUnderflow(EdgeId),

    #[error("{spot} is not held by {agent}")]
    SpotNotHeld { spot: SpotId, agent: AgentId },
}

pub type WorldResult<T> = Result<T, WorldError>;
