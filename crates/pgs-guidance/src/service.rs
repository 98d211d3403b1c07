//! The parking guidance service.

use std::sync::Mutex;

use log::{debug, warn};

use pgs_core::{AgentId, EdgeId, NodeId, SpotId};
use pgs_spatial::ShortestPaths;
use pgs_world::{CongestionWeight, SpotLocation, World};

use crate::{GuidanceError, GuidanceResult, NearestParkingStrategy, ParkingStrategy};

/// A reserved spot and the route to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Guidance {
    /// Streets to drive, starting with the car's current street and ending
    /// with the street that owns `spot`.
    pub route: Vec<EdgeId>,
    pub spot: SpotLocation,
}

/// Finds a spot with a [`ParkingStrategy`], routes to it by congestion and
/// reserves it, all inside one critical section.
pub struct ParkingGuidanceService {
    strategy: Box<dyn ParkingStrategy>,
    critical: Mutex<()>,
}

impl ParkingGuidanceService {
    pub fn new(strategy: Box<dyn ParkingStrategy>) -> Self {
        Self { strategy, critical: Mutex::new(()) }
    }

    /// Request a spot near `destination` for a car at `offset_m` on
    /// `current`.
    ///
    /// Returns `Ok(None)` when no free spot exists in the destination's
    /// component or no path leads to it; nothing is reserved in that case.
    /// If a local parker takes the chosen spot between search and
    /// reservation, the search is repeated.  A strategy that offers a spot
    /// it already offered and lost gets no further retries: the request
    /// ends with `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`GuidanceError::IncoherentSpotIndex`] if the strategy returns a spot
    /// the world's index does not place where the strategy found it.
    pub fn request_guidance(
        &self,
        world: &World,
        agent: AgentId,
        current: EdgeId,
        offset_m: f64,
        destination: NodeId,
    ) -> GuidanceResult<Option<Guidance>> {
        let _guard = self.critical.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let network = world.network();
        let mut tree: Option<ShortestPaths> = None;
        let mut lost: Vec<SpotId> = Vec::new();

        loop {
            let Some(candidate) = self.strategy.find_spot(world, destination) else {
                debug!("{agent}: no free spot near {destination}");
                return Ok(None);
            };
            if lost.contains(&candidate.spot) {
                warn!("{agent}: strategy offered {} again after it was taken", candidate.spot);
                return Ok(None);
            }
            let indexed = world
                .locate_spot(candidate.spot)
                .filter(|loc| *loc == candidate)
                .ok_or(GuidanceError::IncoherentSpotIndex(candidate.spot))?;

            let route = if indexed.edge == current && indexed.distance_from_source_m >= offset_m {
                vec![current]
            } else {
                if tree.is_none() {
                    let weight = CongestionWeight(world);
                    tree = Some(ShortestPaths::compute(network, network.target(current), &weight)?);
                }
                let Some(path) = tree
                    .as_ref()
                    .and_then(|t| t.path_to(network, network.source(indexed.edge)))
                else {
                    debug!("{agent}: {} is unreachable from {current}", indexed.spot);
                    return Ok(None);
                };
                let mut route = Vec::with_capacity(path.edges.len() + 2);
                route.push(current);
                route.extend(path.edges);
                route.push(indexed.edge);
                route
            };

            if world.reserve_spot(indexed, agent) {
                debug!(
                    "{agent}: reserved {} on {} ({} streets)",
                    indexed.spot,
                    indexed.edge,
                    route.len()
                );
                return Ok(Some(Guidance { route, spot: indexed }));
            }
            warn!("{agent}: {} was taken before it could be reserved, searching again", indexed.spot);
            lost.push(indexed.spot);
        }
    }
}

impl Default for ParkingGuidanceService {
    fn default() -> Self {
        Self::new(Box::new(NearestParkingStrategy))
    }
}
