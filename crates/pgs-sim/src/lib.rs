//! `pgs-sim` — the per-car state machine and the tick loop that drives it.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Transitions — every car runs one CarAgent::on_tick against the shared
//!                   world (parallel with the `parallel` feature).  Cars
//!                   contend only through per-street locks and the guidance
//!                   service's critical section.
//!   ② Events      — Parked / DestinationReached / PathingFailed / LeftSpot
//!                   events are handed to the observer in ascending AgentId
//!                   order.
//!   ③ Snapshot    — every `output_interval_ticks`, world diagnostics go to
//!                   the observer.
//! ```
//!
//! # Car states
//!
//! | State           | One tick does                                           |
//! |-----------------|---------------------------------------------------------|
//! | `Driving`       | advance along the route, or switch to `Parking` at the destination |
//! | `Parking`       | behavior-specific spot search                           |
//! | `Parked`        | count the dwell timer down, leave and plan a new trip at zero |
//! | `PathingFailed` | respawn on a random street and plan a new trip          |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs car transitions on Rayon's thread pool (default). |
//! | `serde`    | Serde derives on `FleetConfig`.                        |

pub mod agent;
pub mod builder;
pub mod error;
pub mod fleet;
pub mod observer;
pub mod sim;


pub use agent::{CarAgent, CarEvent, CarEventKind};
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use fleet::FleetConfig;
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
