//! Where a car is.

use std::fmt;

use pgs_core::EdgeId;
use pgs_world::World;

/// A point on a street, measured from the street's source node.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreetPosition {
    pub edge: EdgeId,
    pub offset_m: f64,
}

impl StreetPosition {
    #[inline]
    pub fn new(edge: EdgeId, offset_m: f64) -> Self {
        Self { edge, offset_m }
    }

    /// Metres left to the street's target node.
    pub fn remaining_m(&self, world: &World) -> f64 {
        (world.street(self.edge).length_m - self.offset_m).max(0.0)
    }

    /// `true` once the position has reached the street's target node.
    pub fn at_street_end(&self, world: &World) -> bool {
        self.offset_m >= world.street(self.edge).length_m
    }
}

impl fmt::Display for StreetPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:.1}m", self.edge, self.offset_m)
    }
}
