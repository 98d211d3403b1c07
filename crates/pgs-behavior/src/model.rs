//! The `CarBehavior` capability trait.

use log::debug;

use pgs_core::AgentRng;
use pgs_mobility::Car;
use pgs_world::SpotLocation;

use crate::{BehaviorResult, TickContext};

/// Result of one tick spent looking for a spot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SeekOutcome {
    /// Still looking; stay in `Parking`.
    Searching,
    /// Parked on this spot.
    Parked(SpotLocation),
    /// Gave up on parking and started a new trip.
    Resumed,
    /// No path or no guidance; the car must respawn.
    Failed,
}

/// Per-kind decisions the car state machine delegates.
///
/// Implementations are stateless and shared across threads.  Every hook
/// gets the car it acts for, the tick's shared context and that car's RNG.
pub trait CarBehavior: Send + Sync {
    /// Short name for logs and output rows.
    fn label(&self) -> &'static str;

    /// `false` for cars that never look for a spot.  Their trips are
    /// reported when they reach the destination instead of when they park.
    fn parks(&self) -> bool {
        true
    }

    /// Pick a random destination and plan a route to it.  `Ok(false)` means
    /// the destination is unreachable.
    fn plan_trip(&self, car: &mut Car, ctx: &TickContext<'_>, rng: &mut AgentRng) -> BehaviorResult<bool> {
        let Some(destination) = ctx.world.random_node(rng.inner()) else {
            return Ok(false);
        };
        let found = car.plan_route(ctx.world, destination)?;
        if !found {
            debug!("{car}: no path to {destination}");
        }
        Ok(found)
    }

    /// One tick of the `Parking` state.
    fn seek_parking(
        &self,
        car: &mut Car,
        ctx: &TickContext<'_>,
        rng: &mut AgentRng,
    ) -> BehaviorResult<SeekOutcome>;

    /// One tick of the `Parked` state.  Counts the dwell timer down and
    /// leaves the spot when it has run out; returns `true` while the car
    /// stays.
    fn stay_parked(&self, car: &mut Car, ctx: &TickContext<'_>) -> BehaviorResult<bool> {
        if car.park_ticks_remaining == 0 {
            car.leave_spot(ctx.world)?;
            debug!("{car}: left its spot");
            return Ok(false);
        }
        car.park_ticks_remaining -= 1;
        Ok(true)
    }
}
