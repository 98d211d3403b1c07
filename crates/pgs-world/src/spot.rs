//! Parking spots and their lifecycle.
//!
//! ```text
//!            reserve              claim
//!   Free ─────────────▶ Reserved ───────▶ Occupied ──┐
//!    ▲ │                  │                          │
//!    │ └──── park ────────┼─────────────▶────────────┤
//!    │                    └─ cancel ─▶ Free          │
//!    └──────────────────── release ──────────────────┘
//! ```
//!
//! A rogue parker may also take a `Reserved` spot directly, which the
//! reservation holder discovers when it tries to claim it.

use pgs_core::{AgentId, EdgeId, SpotId};

/// Occupancy of one spot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpotState {
    Free,
    /// Held by the guidance service on behalf of a guided car.
    Reserved { by: AgentId },
    /// A car stands here.  `None` is background traffic that never leaves.
    Occupied { by: Option<AgentId> },
}

impl SpotState {
    /// `true` unless the spot is free; a reservation counts as occupied.
    #[inline]
    pub fn occupied(self) -> bool {
        !matches!(self, SpotState::Free)
    }

    #[inline]
    pub fn reserved(self) -> bool {
        matches!(self, SpotState::Reserved { .. })
    }

    /// The simulated car holding the spot, if any.
    pub fn holder(self) -> Option<AgentId> {
        match self {
            SpotState::Free => None,
            SpotState::Reserved { by } => Some(by),
            SpotState::Occupied { by } => by,
        }
    }
}

/// A parking spot on one street.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParkingSpot {
    pub id: SpotId,
    /// Position within the street's spot list (ascending distance).
    pub index: u32,
    pub distance_from_source_m: f64,
    pub length_m: f64,
    pub state: SpotState,
}

/// Immutable address of a spot: which street, which slot, how far along.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpotLocation {
    pub spot: SpotId,
    pub edge: EdgeId,
    pub index: usize,
    pub distance_from_source_m: f64,
}

impl ParkingSpot {
    pub(crate) fn location(&self, edge: EdgeId) -> SpotLocation {
        SpotLocation {
            spot: self.id,
            edge,
            index: self.index as usize,
            distance_from_source_m: self.distance_from_source_m,
        }
    }
}
