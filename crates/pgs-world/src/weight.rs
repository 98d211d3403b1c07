//! Congestion-aware edge weight.

use pgs_core::EdgeId;
use pgs_spatial::{EdgeWeight, StreetNetwork};

use crate::World;

/// Costs each street by its current cover duration in seconds, so paths
/// avoid streets that are slow right now.
///
/// Reads each street's car count under its lock at the moment Dijkstra
/// relaxes that street; it is a snapshot, not a consistent cut.
#[derive(Copy, Clone)]
pub struct CongestionWeight<'w>(pub &'w World);

impl EdgeWeight for CongestionWeight<'_> {
    #[inline]
    fn cost(&self, _network: &StreetNetwork, edge: EdgeId) -> f64 {
        self.0.street(edge).current_cover_duration_secs()
    }
}
