//! One car plus its behavior: the per-tick state machine.

use log::debug;

use pgs_behavior::{Behavior, BehaviorResult, CarBehavior, SeekOutcome, TickContext};
use pgs_core::{AgentId, AgentRng};
use pgs_mobility::{Car, CarStatus, Kpis};
use pgs_world::SpotLocation;

/// Something a car did this tick that a metric sink may want to record.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CarEvent {
    pub agent:    AgentId,
    /// [`CarBehavior::label`] of the car.
    pub behavior: &'static str,
    pub kind:     CarEventKind,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CarEventKind {
    /// A parker took `spot`; `kpis` describe the trip that ended there.
    Parked { spot: SpotLocation, kpis: Kpis },
    /// A cruiser arrived at its destination.
    DestinationReached { kpis: Kpis },
    /// No path, or no guidance: the car respawns next tick.
    PathingFailed,
    /// The dwell timer ran out and the car rejoined traffic.
    LeftSpot,
}

/// A car, the behavior that drives it and its private RNG stream.
pub struct CarAgent<B: CarBehavior = Behavior> {
    pub car:      Car,
    pub behavior: B,
    pub rng:      AgentRng,
}

impl<B: CarBehavior> CarAgent<B> {
    pub fn new(car: Car, behavior: B, rng: AgentRng) -> Self {
        Self { car, behavior, rng }
    }

    #[inline]
    pub fn id(&self) -> AgentId {
        self.car.id
    }

    /// Run one state transition.
    ///
    /// Expected failures (no path, no guidance) become `PathingFailed`; only
    /// broken world invariants are returned as errors.
    pub fn on_tick(&mut self, ctx: &TickContext<'_>) -> BehaviorResult<Vec<CarEventKind>> {
        let Self { car, behavior, rng } = self;
        let mut events = Vec::new();

        match car.status {
            CarStatus::PathingFailed => {
                car.cancel_reservation(ctx.world);
                car.respawn(ctx.world, rng)?;
                if behavior.plan_trip(car, ctx, rng)? {
                    car.status = CarStatus::Driving;
                    debug!("{car}: respawned, heading for {}", car.destination);
                } else {
                    events.push(CarEventKind::PathingFailed);
                }
            }

            CarStatus::Driving => {
                if car.destination_reached(ctx.world) {
                    car.status = CarStatus::Parking;
                    debug!("{car}: reached {}", car.destination);
                    if !behavior.parks() {
                        events.push(CarEventKind::DestinationReached { kpis: car.kpis(ctx.world)? });
                        car.metrics.reset();
                    }
                } else {
                    car.advance(ctx.world, ctx.tick_secs())?;
                }
            }

            CarStatus::Parking => {
                if behavior.parks() {
                    car.metrics.parking_ticks += 1;
                }
                match behavior.seek_parking(car, ctx, rng)? {
                    SeekOutcome::Searching => {}
                    SeekOutcome::Parked(spot) => {
                        events.push(CarEventKind::Parked { spot, kpis: car.kpis(ctx.world)? });
                    }
                    SeekOutcome::Resumed => car.status = CarStatus::Driving,
                    SeekOutcome::Failed => fail(car, &mut events),
                }
            }

            CarStatus::Parked => {
                if !behavior.stay_parked(car, ctx)? {
                    events.push(CarEventKind::LeftSpot);
                    if !behavior.plan_trip(car, ctx, rng)? {
                        fail(car, &mut events);
                    }
                }
            }
        }
        Ok(events)
    }
}

fn fail(car: &mut Car, events: &mut Vec<CarEventKind>) {
    car.status = CarStatus::PathingFailed;
    events.push(CarEventKind::PathingFailed);
    debug!("{car}: pathing failed");
}
