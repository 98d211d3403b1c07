//! `pgs-core` — foundational types for the parking guidance simulator.
//!
//! This crate is a dependency of every other `pgs-*` crate.  It has no
//! `pgs-*` dependencies and only `rand` and `thiserror` externally, plus
//! optional `serde`.
//!
//! # What lives here
//!
//! | Module    | Contents                                                |
//! |-----------|---------------------------------------------------------|
//! | [`ids`]   | `AgentId`, `NodeId`, `EdgeId`, `SpotId`                 |
//! | [`geo`]   | `GeoPoint`, haversine distance                          |
//! | [`time`]  | `Tick`, `SimClock`, `SimConfig`                         |
//! | [`rng`]   | `AgentRng` (per-agent), `SimRng` (global)               |
//! | [`units`] | km/h ↔ m/s conversion, safe-speed model                 |
//! | [`error`] | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;
pub mod units;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{AgentId, EdgeId, NodeId, SpotId};
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, SimConfig, Tick};
