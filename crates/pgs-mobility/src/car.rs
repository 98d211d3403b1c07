//! The car record and its movement operations.

use std::collections::VecDeque;
use std::fmt;

use log::trace;

use pgs_core::{AgentId, AgentRng, EdgeId, NodeId};
use pgs_spatial::{ShortestPaths, SpeedLimitWeight};
use pgs_world::{SpotLocation, World};

use crate::{Kpis, MobilityError, MobilityResult, StreetPosition, TripMetrics};

/// Lifecycle state of a car.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CarStatus {
    Driving,
    Parking,
    Parked,
    PathingFailed,
}

impl fmt::Display for CarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CarStatus::Driving => "driving",
            CarStatus::Parking => "parking",
            CarStatus::Parked => "parked",
            CarStatus::PathingFailed => "pathing-failed",
        };
        f.write_str(s)
    }
}

/// What one movement step covered: the segment `from_m..=to_m` on `edge`.
///
/// After a street change `edge` is the new street, `from_m` is 0 and
/// `crossed` names the street that was left.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Step {
    pub edge: EdgeId,
    pub from_m: f64,
    pub to_m: f64,
    pub crossed: Option<EdgeId>,
}

/// One simulated car.
#[derive(Clone, Debug)]
pub struct Car {
    pub id: AgentId,
    pub position: StreetPosition,
    /// Streets still to drive after the current one.
    pub route: VecDeque<EdgeId>,
    pub destination: NodeId,
    pub status: CarStatus,
    pub occupied_spot: Option<SpotLocation>,
    /// Spot the guidance service reserved for this car.  A rogue parker may
    /// take it in the meantime; the car then still names the spot here
    /// until it arrives and its claim fails.
    pub reserved_spot: Option<SpotLocation>,
    pub park_ticks_remaining: u32,
    pub metrics: TripMetrics,
}

impl Car {
    /// Place a new car at a random offset on a random street and count it
    /// there.  The car has no destination until [`plan_route`](Self::plan_route).
    pub fn spawn(id: AgentId, world: &World, rng: &mut AgentRng) -> MobilityResult<Self> {
        let position = random_position(world, rng)?;
        world.increment_car_count(position.edge);
        Ok(Self {
            id,
            position,
            route: VecDeque::new(),
            destination: NodeId::INVALID,
            status: CarStatus::Driving,
            occupied_spot: None,
            reserved_spot: None,
            park_ticks_remaining: 0,
            metrics: TripMetrics::default(),
        })
    }

    /// A car that starts the run standing on `spot`.  The caller has already
    /// placed it there in the world.
    pub fn parked_at(id: AgentId, spot: SpotLocation, dwell_ticks: u32) -> Self {
        Self {
            id,
            position: StreetPosition::new(spot.edge, spot.distance_from_source_m),
            route: VecDeque::new(),
            destination: NodeId::INVALID,
            status: CarStatus::Parked,
            occupied_spot: Some(spot),
            reserved_spot: None,
            park_ticks_remaining: dwell_ticks,
            metrics: TripMetrics::default(),
        }
    }

    /// Plan the fastest-road route to `destination`, starting at the node the
    /// car reaches next.  Returns `false` (and clears the route) when the
    /// destination is unreachable.
    pub fn plan_route(&mut self, world: &World, destination: NodeId) -> MobilityResult<bool> {
        let network = world.network();
        let from = network.target(self.position.edge);
        self.destination = destination;
        let tree = ShortestPaths::compute(network, from, &SpeedLimitWeight)?;
        match tree.path_to(network, destination) {
            Some(route) => {
                self.metrics.planned_distance_m =
                    self.position.remaining_m(world) + route.length_m(network);
                self.route = route.edges.into();
                Ok(true)
            }
            None => {
                self.route.clear();
                Ok(false)
            }
        }
    }

    /// `true` at the end of the street that ends in the destination with no
    /// route left.
    pub fn destination_reached(&self, world: &World) -> bool {
        self.route.is_empty()
            && world.network().target(self.position.edge) == self.destination
            && self.position.at_street_end(world)
    }

    /// Drive for `tick_secs` at the current street's safe speed.
    ///
    /// Overshooting the street end moves the car onto the next route street
    /// (one street per tick at most); with no route left it stops at the end.
    pub fn advance(&mut self, world: &World, tick_secs: f64) -> MobilityResult<Step> {
        let old = self.position.edge;
        let street = world.street(old);
        let speed = street.current_max_speed_ms();
        let from_m = self.position.offset_m;
        let target_m = from_m + speed * tick_secs;

        if target_m >= street.length_m {
            if let Some(next) = self.route.pop_front() {
                self.metrics.sample_speed(speed, street.speed_limit_ms);
                world.move_car(old, next)?;
                let to_m = (target_m - street.length_m).min(world.street(next).length_m);
                self.metrics.distance_travelled_m += (street.length_m - from_m).max(0.0) + to_m;
                self.position = StreetPosition::new(next, to_m);
                trace!("{}: {old} -> {}", self.id, self.position);
                return Ok(Step { edge: next, from_m: 0.0, to_m, crossed: Some(old) });
            }
        }

        let to_m = target_m.min(street.length_m);
        self.metrics.distance_travelled_m += (to_m - from_m).max(0.0);
        self.position.offset_m = to_m;
        trace!("{}: {} at {:.2} m/s", self.id, self.position, speed);
        Ok(Step { edge: old, from_m, to_m, crossed: None })
    }

    /// Teleport to a random street, keeping the world's car counts right.
    pub fn respawn(&mut self, world: &World, rng: &mut AgentRng) -> MobilityResult<()> {
        let next = random_position(world, rng)?;
        world.move_car(self.position.edge, next.edge)?;
        self.position = next;
        self.route.clear();
        Ok(())
    }

    /// Record that the world parked this car on `spot`.
    pub fn park_at(&mut self, spot: SpotLocation, dwell_ticks: u32) {
        self.position = StreetPosition::new(spot.edge, spot.distance_from_source_m);
        self.occupied_spot = Some(spot);
        self.reserved_spot = None;
        self.route.clear();
        self.park_ticks_remaining = dwell_ticks;
        self.status = CarStatus::Parked;
    }

    /// Free the occupied spot, rejoin traffic and start a fresh trip.
    pub fn leave_spot(&mut self, world: &World) -> MobilityResult<()> {
        if let Some(spot) = self.occupied_spot.take() {
            world.release_spot(spot, self.id)?;
        }
        self.metrics.reset();
        self.status = CarStatus::Driving;
        Ok(())
    }

    /// Drop an outstanding reservation, if the car still holds one.
    pub fn cancel_reservation(&mut self, world: &World) {
        if let Some(spot) = self.reserved_spot.take() {
            world.cancel_reservation(spot, self.id);
        }
    }

    /// Remaining distance from the current position to the destination
    /// along the fastest-road route, or `None` when unreachable.
    pub fn distance_to_destination(&self, world: &World) -> MobilityResult<Option<f64>> {
        let network = world.network();
        if !network.contains_node(self.destination) {
            return Ok(None);
        }
        let from = network.target(self.position.edge);
        let tree = ShortestPaths::compute(network, from, &SpeedLimitWeight)?;
        Ok(tree
            .path_to(network, self.destination)
            .map(|route| self.position.remaining_m(world) + route.length_m(network)))
    }

    pub fn kpis(&self, world: &World) -> MobilityResult<Kpis> {
        let dist = self.distance_to_destination(world)?.unwrap_or(0.0);
        Ok(Kpis::from_metrics(&self.metrics, dist))
    }
}

fn random_position(world: &World, rng: &mut AgentRng) -> MobilityResult<StreetPosition> {
    let edge = world.random_street(rng.inner()).ok_or(MobilityError::EmptyNetwork)?;
    let offset_m = rng.unit() * world.street(edge).length_m;
    Ok(StreetPosition::new(edge, offset_m))
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[car {} {} {}]", self.id.0, self.status, self.position)
    }
}
