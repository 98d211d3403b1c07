use thiserror::Error;

use pgs_behavior::BehaviorError;
use pgs_core::{AgentId, CoreError};
use pgs_mobility::MobilityError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("could not place {agent}: {source}")]
    Spawn {
        agent:  AgentId,
        #[source]
        source: MobilityError,
    },

    /// A car's transition hit an invariant violation.  The run stops.
    #[error("{agent}: {source}")]
    Agent {
        agent:  AgentId,
        #[source]
        source: BehaviorError,
    },
}

pub type SimResult<T> = Result<T, SimError>;
