//! `pgs-mobility` — car records and movement on streets.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`position`] | `StreetPosition` — street + distance from its source       |
//! | [`car`]      | `Car`, `CarStatus`, `Step` — routes, movement, parking     |
//! | [`metrics`]  | `TripMetrics` accumulators, `Kpis` snapshot                |
//! | [`error`]    | `MobilityError`, `MobilityResult<T>`                       |
//!
//! # Movement model
//!
//! A car always stands on exactly one street, counted in that street's car
//! count while it drives.  Each tick it advances by the street's current
//! safe speed times the tick length.  Passing the street end moves it onto
//! the next street of its route, carrying the overshoot; with no route left
//! it stops at the street end.

pub mod car;
pub mod error;
pub mod metrics;
pub mod position;


pub use car::{Car, CarStatus, Step};
pub use error::{MobilityError, MobilityResult};
pub use metrics::{Kpis, TripMetrics};
pub use position::StreetPosition;
