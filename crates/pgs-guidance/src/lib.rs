//! `pgs-guidance` — parking strategies and the guidance service.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`strategy`] | `ParkingStrategy` trait, `NearestParkingStrategy` (BFS)   |
//! | [`service`]  | `ParkingGuidanceService`, `Guidance`                      |
//! | [`error`]    | `GuidanceError`, `GuidanceResult<T>`                      |
//!
//! # Atomicity
//!
//! The service holds one process-wide mutex across strategy search, path
//! search and reservation, so two guided cars can never be handed the same
//! spot.  Street locks are still taken one at a time inside that section;
//! the guidance mutex is always acquired first and never while a street
//! lock is held, so the two levels cannot deadlock.

pub mod error;
pub mod service;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use error::{GuidanceError, GuidanceResult};
pub use service::{Guidance, ParkingGuidanceService};
pub use strategy::{NearestParkingStrategy, ParkingStrategy};
