//! `pgs-behavior` — what each kind of car does when it is time to park.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`context`]  | `TickContext<'a>`: shared world and guidance for one tick  |
//! | [`model`]    | `CarBehavior` trait, `SeekOutcome`                          |
//! | [`behavior`] | `Behavior` (cruiser or parker), `ParkerProfile`              |
//! | [`error`]    | `BehaviorError`, `BehaviorResult<T>`                        |
//!
//! # Behaviors
//!
//! | Constant                   | Parks | Guided | Honours reservations |
//! |----------------------------|-------|--------|----------------------|
//! | `Behavior::CRUISER`        | no    | -      | -                    |
//! | `Behavior::LOCAL_PARKER`   | yes   | no     | yes                  |
//! | `Behavior::GUIDED_PARKER`  | yes   | yes    | yes                  |
//! | `Behavior::ROGUE_PARKER`   | yes   | no     | no                   |
//!
//! Behaviors are stateless and shared by every car of the same kind; all
//! per-car state lives in the [`Car`](pgs_mobility::Car).

pub mod behavior;
pub mod context;
pub mod error;
pub mod model;


pub use behavior::{Behavior, ParkerProfile};
pub use context::TickContext;
pub use error::{BehaviorError, BehaviorResult};
pub use model::{CarBehavior, SeekOutcome};
