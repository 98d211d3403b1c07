//! Fluent builder for constructing a [`Sim`] from a fleet description.

use log::{info, warn};

use pgs_behavior::{Behavior, BehaviorResult, CarBehavior, TickContext};
use pgs_core::{AgentId, AgentRng, SimConfig, SimRng, Tick};
use pgs_guidance::ParkingGuidanceService;
use pgs_mobility::{Car, CarStatus};
use pgs_world::World;

use crate::{CarAgent, FleetConfig, Sim, SimError, SimResult};

/// Salt for the RNG that picks pre-parked spots, so it does not replay the
/// per-car streams.
const PRE_PARK_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Fluent builder for [`Sim`].
///
/// # Optional inputs (have defaults)
///
/// | Method         | Default                                   |
/// |----------------|-------------------------------------------|
/// | `.fleet(f)`    | `FleetConfig::default()`                  |
/// | `.guidance(g)` | `ParkingGuidanceService::default()` (nearest spot) |
///
/// # Example
///
/// ```rust,ignore
/// let world = World::new(network, WorldConfig::default())?;
/// let mut sim = SimBuilder::new(config, world)
///     .fleet(FleetConfig { guided_parkers: 200, ..FleetConfig::default() })
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:   SimConfig,
    world:    World,
    fleet:    FleetConfig,
    guidance: Option<ParkingGuidanceService>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, world: World) -> Self {
        Self { config, world, fleet: FleetConfig::default(), guidance: None }
    }

    pub fn fleet(mut self, fleet: FleetConfig) -> Self {
        self.fleet = fleet;
        self
    }

    /// Use a guidance service with a custom parking strategy.
    pub fn guidance(mut self, guidance: ParkingGuidanceService) -> Self {
        self.guidance = Some(guidance);
        self
    }

    /// Validate inputs, spawn the fleet, plan every driving car's first trip
    /// and park the pre-parked cars.
    ///
    /// A driving car whose first destination is unreachable starts in
    /// `PathingFailed` and respawns on tick 0.
    pub fn build(self) -> SimResult<Sim<Behavior>> {
        self.config.validate()?;
        let Self { config, world, fleet, guidance } = self;
        if fleet.driving() > 0 && world.network().edge_count() == 0 {
            return Err(SimError::Config(format!(
                "{} driving cars need at least one street",
                fleet.driving()
            )));
        }
        let guidance = guidance.unwrap_or_default();

        let mut agents = Vec::with_capacity(fleet.total());
        {
            let ctx = TickContext::new(
                Tick::ZERO,
                config.tick_duration_secs,
                &world,
                &guidance,
                fleet.max_dwell_ticks,
            );
            for (i, behavior) in fleet.driving_behaviors().enumerate() {
                let id = AgentId(i as u32);
                let mut rng = AgentRng::new(config.seed, id);
                let mut car = Car::spawn(id, &world, &mut rng)
                    .map_err(|source| SimError::Spawn { agent: id, source })?;
                first_trip(&behavior, &mut car, &ctx, &mut rng)
                    .map_err(|source| SimError::Agent { agent: id, source })?;
                agents.push(CarAgent::new(car, behavior, rng));
            }
        }

        let mut placer = SimRng::new(config.seed ^ PRE_PARK_SALT);
        let mut pre_parked = 0;
        for _ in 0..fleet.pre_parked {
            let id = AgentId(agents.len() as u32);
            let Some(spot) = world.random_unoccupied_spot(placer.inner()) else {
                warn!("no free spot left for pre-parked cars; placed {pre_parked} of {}", fleet.pre_parked);
                break;
            };
            if !world.place_parked_car(spot, id) {
                continue;
            }
            let mut rng = AgentRng::new(config.seed, id);
            let dwell = rng.gen_range(0..=fleet.max_dwell_ticks);
            agents.push(CarAgent::new(Car::parked_at(id, spot, dwell), Behavior::LOCAL_PARKER, rng));
            pre_parked += 1;
        }

        info!(
            "fleet: {} cruisers, {} local, {} guided, {} rogue, {} pre-parked",
            fleet.cruisers, fleet.local_parkers, fleet.guided_parkers, fleet.rogue_parkers, pre_parked
        );
        Ok(Sim::new(config, world, guidance, agents, fleet.max_dwell_ticks))
    }
}

fn first_trip(
    behavior: &Behavior,
    car: &mut Car,
    ctx: &TickContext<'_>,
    rng: &mut AgentRng,
) -> BehaviorResult<()> {
    if !behavior.plan_trip(car, ctx, rng)? {
        car.status = CarStatus::PathingFailed;
    }
    Ok(())
}
