//! `pgs-world` — the shared world model.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`config`] | `WorldConfig` — spot density, initial free rate, lengths      |
//! | [`spot`]   | `ParkingSpot`, `SpotState`, `SpotLocation`                    |
//! | [`street`] | `Street` — per-street lock around car count and spots         |
//! | [`world`]  | `World` — streets, spot index, diagnostic counters, mutators  |
//! | [`weight`] | `CongestionWeight` — cover-duration edge weight               |
//! | [`error`]  | `WorldError`, `WorldResult<T>`                                |
//!
//! # Locking model
//!
//! Every street owns one `Mutex` guarding its car count and its spot list.
//! All street and spot mutation goes through `World` methods that take
//! exactly one street lock, do O(spots-on-street) work and release it.  No
//! method ever holds two street locks at once, so there is no lock order to
//! get wrong.
//!
//! World-wide counters (free spots, park events) are atomics updated while
//! the owning street's lock is held, so they move together with the spot
//! state they summarise.

pub mod config;
pub mod error;
pub mod spot;
pub mod street;
pub mod weight;
pub mod world;

#[cfg(test)]
mod tests;

pub use config::WorldConfig;
pub use error::{WorldError, WorldResult};
pub use spot::{ParkingSpot, SpotLocation, SpotState};
pub use street::{Street, StreetState};
pub use weight::CongestionWeight;
pub use world::{World, WorldStats};
