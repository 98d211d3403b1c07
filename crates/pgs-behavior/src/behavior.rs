//! The concrete car kinds.

use std::fmt;

use log::{debug, trace};

use pgs_core::{AgentRng, EdgeId};
use pgs_mobility::{Car, Step};
use pgs_world::SpotLocation;

use crate::{BehaviorResult, CarBehavior, SeekOutcome, TickContext};

/// How a parking car looks for its spot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParkerProfile {
    /// Ask the guidance service for a reserved spot instead of scanning.
    pub guided: bool,
    /// Skip spots reserved for other cars while scanning.
    pub respect_reservations: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Behavior {
    /// Drives from destination to destination and never parks.
    Cruiser,
    Parker(ParkerProfile),
}

impl Behavior {
    pub const CRUISER: Self = Behavior::Cruiser;
    pub const LOCAL_PARKER: Self =
        Behavior::Parker(ParkerProfile { guided: false, respect_reservations: true });
    pub const GUIDED_PARKER: Self =
        Behavior::Parker(ParkerProfile { guided: true, respect_reservations: true });
    pub const ROGUE_PARKER: Self =
        Behavior::Parker(ParkerProfile { guided: false, respect_reservations: false });
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl CarBehavior for Behavior {
    fn label(&self) -> &'static str {
        match *self {
            Behavior::Cruiser => "cruiser",
            Behavior::Parker(ParkerProfile { guided: true, .. }) => "guided-parker",
            Behavior::Parker(ParkerProfile { respect_reservations: false, .. }) => "rogue-parker",
            Behavior::Parker(_) => "local-parker",
        }
    }

    fn parks(&self) -> bool {
        matches!(self, Behavior::Parker(_))
    }

    fn seek_parking(
        &self,
        car: &mut Car,
        ctx: &TickContext<'_>,
        rng: &mut AgentRng,
    ) -> BehaviorResult<SeekOutcome> {
        match *self {
            Behavior::Cruiser => {
                if self.plan_trip(car, ctx, rng)? {
                    Ok(SeekOutcome::Resumed)
                } else {
                    Ok(SeekOutcome::Failed)
                }
            }
            Behavior::Parker(profile) if profile.guided => seek_guided(car, ctx, rng),
            Behavior::Parker(profile) => seek_locally(car, ctx, rng, profile.respect_reservations),
        }
    }
}

// ── Local search ──────────────────────────────────────────────────────────────

/// Drive one tick, picking a random next street at dead ends of the route,
/// and take the nearest eligible spot passed on the way.
fn seek_locally(
    car: &mut Car,
    ctx: &TickContext<'_>,
    rng: &mut AgentRng,
    respect_reservations: bool,
) -> BehaviorResult<SeekOutcome> {
    if car.route.is_empty() && car.position.at_street_end(ctx.world) {
        match random_next_street(car, ctx, rng) {
            Some(next) => car.route.push_back(next),
            None => {
                debug!("{car}: dead end while searching");
                return Ok(SeekOutcome::Failed);
            }
        }
    }
    let step = car.advance(ctx.world, ctx.tick_secs())?;
    park_on_step(car, ctx, rng, step, respect_reservations)
}

fn random_next_street(car: &Car, ctx: &TickContext<'_>, rng: &mut AgentRng) -> Option<EdgeId> {
    let network = ctx.world.network();
    let outs: Vec<EdgeId> = network.out_edges(network.target(car.position.edge)).collect();
    rng.choose(&outs).copied()
}

fn park_on_step(
    car: &mut Car,
    ctx: &TickContext<'_>,
    rng: &mut AgentRng,
    step: Step,
    respect_reservations: bool,
) -> BehaviorResult<SeekOutcome> {
    let found =
        ctx.world.try_park_locally(step.edge, step.from_m, step.to_m, car.id, respect_reservations)?;
    match found {
        Some(spot) => {
            car.park_at(spot, dwell(ctx, rng));
            debug!("{car}: parked on {} after scanning", spot.spot);
            Ok(SeekOutcome::Parked(spot))
        }
        None => Ok(SeekOutcome::Searching),
    }
}

fn dwell(ctx: &TickContext<'_>, rng: &mut AgentRng) -> u32 {
    rng.gen_range(0..=ctx.max_dwell_ticks)
}

// ── Guided search ─────────────────────────────────────────────────────────────

fn seek_guided(
    car: &mut Car,
    ctx: &TickContext<'_>,
    rng: &mut AgentRng,
) -> BehaviorResult<SeekOutcome> {
    let spot = match car.reserved_spot {
        Some(spot) => spot,
        None => {
            let guidance = ctx.guidance.request_guidance(
                ctx.world,
                car.id,
                car.position.edge,
                car.position.offset_m,
                car.destination,
            )?;
            let Some(guidance) = guidance else {
                debug!("{car}: no guidance available");
                return Ok(SeekOutcome::Failed);
            };
            car.reserved_spot = Some(guidance.spot);
            car.route = guidance.route.into_iter().skip(1).collect();
            guidance.spot
        }
    };

    let step = car.advance(ctx.world, ctx.tick_secs())?;
    if !reached(car, &step, spot) {
        return Ok(SeekOutcome::Searching);
    }
    if ctx.world.claim_reserved(spot, car.id)? {
        car.park_at(spot, dwell(ctx, rng));
        debug!("{car}: parked on reserved {}", spot.spot);
        return Ok(SeekOutcome::Parked(spot));
    }

    trace!("{car}: reservation on {} was lost", spot.spot);
    car.reserved_spot = None;
    park_on_step(car, ctx, rng, step, true)
}

fn reached(car: &Car, step: &Step, spot: SpotLocation) -> bool {
    car.route.is_empty() && step.edge == spot.edge && step.to_m >= spot.distance_from_source_m
}
