//! The `World`: streets, the spot index and every shared-state mutator.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use log::{debug, info};
use rand::Rng;
use rustc_hash::FxHashMap;

use pgs_core::{AgentId, EdgeId, NodeId, SimRng, SpotId};
use pgs_spatial::StreetNetwork;

use crate::{
    ParkingSpot, SpotLocation, SpotState, Street, WorldConfig, WorldError, WorldResult,
};

// ── WorldStats ────────────────────────────────────────────────────────────────

/// Point-in-time diagnostic counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldStats {
    pub total_spots: u64,
    pub initially_free_spots: u64,
    pub free_spots: i64,
    pub park_events: u64,
}

// ── World ─────────────────────────────────────────────────────────────────────

/// Street network plus all shared mutable simulation state.
///
/// `World` is `Sync`: cars on different threads call its mutators through
/// `&World`, and each mutator serialises on the one street it touches.
pub struct World {
    network: StreetNetwork,
    streets: Vec<Street>,
    spot_index: FxHashMap<SpotId, SpotLocation>,

    total_spots: u64,
    initially_free_spots: u64,
    free_spots: AtomicI64,
    park_events: AtomicU64,
}

impl World {
    /// Build the world: validate inputs, then generate spots on every named
    /// street.
    ///
    /// A named street of length `L` gets `floor(floor(L / spot_len) * density)`
    /// spots, evenly spaced from the source.  Each starts free with
    /// probability `initial_free_rate`; the rest are held by background
    /// traffic.
    pub fn new(network: StreetNetwork, config: WorldConfig) -> WorldResult<Self> {
        config.validate()?;
        for e in 0..network.edge_count() {
            let (len, kmh) = (network.edge_length_m[e], network.edge_speed_limit_kmh[e]);
            if !(len.is_finite() && len > 0.0) {
                return Err(WorldError::Config(format!("street {e} has invalid length {len}")));
            }
            if !(kmh.is_finite() && kmh > 0.0) {
                return Err(WorldError::Config(format!("street {e} has invalid speed limit {kmh}")));
            }
        }

        let mut rng = SimRng::new(config.seed);
        let mut streets = Vec::with_capacity(network.edge_count());
        let mut spot_index = FxHashMap::default();
        let mut next_spot = 0u32;
        let mut initially_free = 0u64;

        for e in 0..network.edge_count() {
            let edge = EdgeId(e as u32);
            let length_m = network.edge_length_m[e];

            let count = if network.edge_tags[e].has_name() {
                let max_spots = (length_m / config.spot_length_m).floor();
                (max_spots * config.parking_density).floor() as usize
            } else {
                0
            };
            let spacing = if count > 0 {
                (length_m - count as f64 * config.spot_length_m) / count as f64
            } else {
                0.0
            };

            let spots: Vec<ParkingSpot> = (0..count)
                .map(|i| {
                    let free = rng.unit() < config.initial_free_rate;
                    if free {
                        initially_free += 1;
                    }
                    let spot = ParkingSpot {
                        id: SpotId(next_spot),
                        index: i as u32,
                        distance_from_source_m: i as f64 * (config.spot_length_m + spacing),
                        length_m: config.spot_length_m,
                        state: if free { SpotState::Free } else { SpotState::Occupied { by: None } },
                    };
                    next_spot += 1;
                    spot_index.insert(spot.id, spot.location(edge));
                    spot
                })
                .collect();

            streets.push(Street::new(
                edge,
                length_m,
                network.edge_speed_limit_kmh[e],
                config.car_length_m,
                spacing,
                spots,
            ));
        }

        info!(
            "world: {} nodes, {} streets, {} spots ({} initially free)",
            network.node_count(),
            network.edge_count(),
            next_spot,
            initially_free
        );

        Ok(Self {
            network,
            streets,
            spot_index,
            total_spots: next_spot as u64,
            initially_free_spots: initially_free,
            free_spots: AtomicI64::new(initially_free as i64),
            park_events: AtomicU64::new(0),
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn network(&self) -> &StreetNetwork {
        &self.network
    }

    #[inline]
    pub fn street(&self, edge: EdgeId) -> &Street {
        &self.streets[edge.index()]
    }

    pub fn streets(&self) -> &[Street] {
        &self.streets
    }

    /// Where a spot lives, or `None` if the id is not in the index.
    #[inline]
    pub fn locate_spot(&self, spot: SpotId) -> Option<SpotLocation> {
        self.spot_index.get(&spot).copied()
    }

    pub fn spot_state(&self, loc: SpotLocation) -> SpotState {
        self.street(loc.edge).lock().spots[loc.index].state
    }

    // ── Car count ─────────────────────────────────────────────────────────

    pub fn increment_car_count(&self, edge: EdgeId) {
        self.street(edge).lock().car_count += 1;
    }

    /// # Errors
    ///
    /// [`WorldError::CarCountUnderflow`] if the street is already empty.
    pub fn decrement_car_count(&self, edge: EdgeId) -> WorldResult<()> {
        let mut state = self.street(edge).lock();
        state.car_count = state
            .car_count
            .checked_sub(1)
            .ok_or(WorldError::CarCountUnderflow(edge))?;
        Ok(())
    }

    /// Move one car from `from` to `to`, taking each street's lock in turn.
    pub fn move_car(&self, from: EdgeId, to: EdgeId) -> WorldResult<()> {
        self.decrement_car_count(from)?;
        self.increment_car_count(to);
        Ok(())
    }

    /// Sum of driving cars over all streets.  Advisory while cars move.
    pub fn total_car_count(&self) -> u64 {
        self.streets.iter().map(|s| s.car_count() as u64).sum()
    }

    // ── Diagnostics ───────────────────────────────────────────────────────

    /// Free spots counted street by street.  Advisory: streets are locked one
    /// at a time, so the total may mix moments while cars are moving.
    pub fn free_spot_count(&self) -> usize {
        self.streets.iter().map(Street::free_spot_count).sum()
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            total_spots: self.total_spots,
            initially_free_spots: self.initially_free_spots,
            free_spots: self.free_spots.load(Ordering::Relaxed),
            park_events: self.park_events.load(Ordering::Relaxed),
        }
    }

    // ── Random picks ──────────────────────────────────────────────────────

    /// A uniformly random free spot.  Start-up only: scans every street.
    pub fn random_unoccupied_spot<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<SpotLocation> {
        let free: Vec<SpotLocation> = self
            .streets
            .iter()
            .flat_map(|street| {
                street
                    .lock()
                    .spots
                    .iter()
                    .filter(|s| s.state == SpotState::Free)
                    .map(|s| s.location(street.id))
                    .collect::<Vec<_>>()
            })
            .collect();
        if free.is_empty() {
            return None;
        }
        Some(free[rng.gen_range(0..free.len())])
    }

    pub fn random_street<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<EdgeId> {
        let n = self.streets.len();
        (n > 0).then(|| EdgeId(rng.gen_range(0..n) as u32))
    }

    pub fn random_node<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<NodeId> {
        let n = self.network.node_count();
        (n > 0).then(|| NodeId(rng.gen_range(0..n) as u32))
    }

    // ── Spot mutators ─────────────────────────────────────────────────────

    /// First free spot on `edge` by distance from the source.
    pub fn first_free_spot(&self, edge: EdgeId) -> Option<SpotLocation> {
        self.street(edge)
            .lock()
            .spots
            .iter()
            .find(|s| s.state == SpotState::Free)
            .map(|s| s.location(edge))
    }

    /// Scan the spots passed between `from_m` and `to_m` on `edge` and park
    /// `agent` in the eligible one nearest to `to_m`, all under the street's
    /// lock.  A parked car leaves the street's car count.
    ///
    /// With `respect_reservations == false` a spot reserved for another car
    /// is eligible too.
    pub fn try_park_locally(
        &self,
        edge: EdgeId,
        from_m: f64,
        to_m: f64,
        agent: AgentId,
        respect_reservations: bool,
    ) -> WorldResult<Option<SpotLocation>> {
        let mut state = self.street(edge).lock();
        let chosen = state
            .spots
            .iter()
            .rev()
            .filter(|s| s.distance_from_source_m >= from_m && s.distance_from_source_m <= to_m)
            .find(|s| match s.state {
                SpotState::Free => true,
                SpotState::Reserved { .. } => !respect_reservations,
                SpotState::Occupied { .. } => false,
            })
            .map(|s| s.index as usize);
        let Some(index) = chosen else {
            return Ok(None);
        };

        state.car_count = state
            .car_count
            .checked_sub(1)
            .ok_or(WorldError::CarCountUnderflow(edge))?;
        let spot = &mut state.spots[index];
        if let SpotState::Reserved { by } = spot.state {
            debug!("{agent} takes {} reserved by {by}", spot.id);
        } else {
            self.free_spots.fetch_sub(1, Ordering::Relaxed);
        }
        spot.state = SpotState::Occupied { by: Some(agent) };
        self.park_events.fetch_add(1, Ordering::Relaxed);
        Ok(Some(spot.location(edge)))
    }

    /// Reserve a free spot for `agent`.  Returns `false` if it is not free.
    pub fn reserve_spot(&self, loc: SpotLocation, agent: AgentId) -> bool {
        let mut state = self.street(loc.edge).lock();
        let spot = &mut state.spots[loc.index];
        if spot.state != SpotState::Free {
            return false;
        }
        spot.state = SpotState::Reserved { by: agent };
        self.free_spots.fetch_sub(1, Ordering::Relaxed);
        true
    }

    /// Turn `agent`'s reservation into occupation.  `Ok(false)` means the
    /// reservation was lost to another car.
    pub fn claim_reserved(&self, loc: SpotLocation, agent: AgentId) -> WorldResult<bool> {
        let mut state = self.street(loc.edge).lock();
        if state.spots[loc.index].state != (SpotState::Reserved { by: agent }) {
            return Ok(false);
        }
        state.car_count = state
            .car_count
            .checked_sub(1)
            .ok_or(WorldError::CarCountUnderflow(loc.edge))?;
        state.spots[loc.index].state = SpotState::Occupied { by: Some(agent) };
        self.park_events.fetch_add(1, Ordering::Relaxed);
        Ok(true)
    }

    /// Drop `agent`'s reservation.  Returns `false` if it no longer held one.
    pub fn cancel_reservation(&self, loc: SpotLocation, agent: AgentId) -> bool {
        let mut state = self.street(loc.edge).lock();
        let spot = &mut state.spots[loc.index];
        if spot.state != (SpotState::Reserved { by: agent }) {
            return false;
        }
        spot.state = SpotState::Free;
        self.free_spots.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Free the spot `agent` stands on and put the car back into traffic on
    /// that street.
    ///
    /// # Errors
    ///
    /// [`WorldError::SpotNotHeld`] if `agent` does not occupy the spot.
    pub fn release_spot(&self, loc: SpotLocation, agent: AgentId) -> WorldResult<()> {
        let mut state = self.street(loc.edge).lock();
        if state.spots[loc.index].state != (SpotState::Occupied { by: Some(agent) }) {
            return Err(WorldError::SpotNotHeld { spot: loc.spot, agent });
        }
        state.spots[loc.index].state = SpotState::Free;
        state.car_count += 1;
        self.free_spots.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Put a car that starts the run parked onto a free spot.  It never
    /// entered traffic, so the car count is untouched.
    pub fn place_parked_car(&self, loc: SpotLocation, agent: AgentId) -> bool {
        let mut state = self.street(loc.edge).lock();
        let spot = &mut state.spots[loc.index];
        if spot.state != SpotState::Free {
            return false;
        }
        spot.state = SpotState::Occupied { by: Some(agent) };
        self.free_spots.fetch_sub(1, Ordering::Relaxed);
        true
    }
}
