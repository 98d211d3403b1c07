//! The `Sim` struct and its tick loop.

use std::sync::atomic::{AtomicBool, Ordering};

use log::info;

use pgs_behavior::{Behavior, CarBehavior, TickContext};
use pgs_core::{SimClock, SimConfig, Tick};
use pgs_guidance::ParkingGuidanceService;
use pgs_mobility::CarStatus;
use pgs_world::World;

use crate::{CarAgent, CarEvent, SimError, SimObserver, SimResult};

/// The simulation runner: the tick source for every car.
///
/// Each tick every car runs one [`CarAgent::on_tick`] against the shared
/// world.  With the `parallel` feature the transitions run concurrently on
/// Rayon; cars only meet through the world's per-street locks and the
/// guidance service's critical section, so no ordering between cars is
/// implied.  Events are buffered and reported in ascending agent order once
/// every car has finished the tick.
///
/// Create via [`SimBuilder`][crate::SimBuilder], or [`Sim::new`] with
/// hand-made agents.
pub struct Sim<B: CarBehavior = Behavior> {
    pub config: SimConfig,

    pub clock: SimClock,

    /// Streets, spots and diagnostic counters shared by all cars.
    pub world: World,

    pub guidance: ParkingGuidanceService,

    /// Indexed by `AgentId`.
    pub agents: Vec<CarAgent<B>>,

    /// Upper bound of the random dwell time handed to behaviors.
    pub max_dwell_ticks: u32,
}

impl<B: CarBehavior> Sim<B> {
    pub fn new(
        config: SimConfig,
        world: World,
        guidance: ParkingGuidanceService,
        agents: Vec<CarAgent<B>>,
        max_dwell_ticks: u32,
    ) -> Self {
        Self {
            clock: config.make_clock(),
            config,
            world,
            guidance,
            agents,
            max_dwell_ticks,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer)?;
        }
        self.finish(observer);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Deliver ticks until `stop` is set, ignoring `end_tick`.
    ///
    /// The flag is checked between ticks, so a tick in progress always
    /// completes and no street or spot is left half-updated.
    pub fn run_until<O: SimObserver>(&mut self, stop: &AtomicBool, observer: &mut O) -> SimResult<()> {
        while !stop.load(Ordering::Acquire) {
            self.step(observer)?;
        }
        self.finish(observer);
        Ok(())
    }

    /// Cars currently in `status`.
    pub fn count_status(&self, status: CarStatus) -> usize {
        self.agents.iter().filter(|a| a.car.status == status).count()
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);

        let events = self.process_tick(now)?;
        for event in &events {
            observer.on_car_event(now, event);
        }
        observer.on_tick_end(now, events.len());

        if self.config.output_interval_ticks > 0
            && now.0 % self.config.output_interval_ticks == 0
        {
            observer.on_snapshot(now, &self.world.stats());
        }

        self.clock.advance();
        Ok(())
    }

    fn process_tick(&mut self, now: Tick) -> SimResult<Vec<CarEvent>> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let ctx = TickContext::new(
            now,
            self.config.tick_duration_secs,
            &self.world,
            &self.guidance,
            self.max_dwell_ticks,
        );
        let agents = &mut self.agents;

        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = agents
            .iter_mut()
            .map(|agent| (agent.id(), agent.behavior.label(), agent.on_tick(&ctx)))
            .collect();

        #[cfg(feature = "parallel")]
        let results: Vec<_> = {
            use rayon::prelude::*;

            agents
                .par_iter_mut()
                .map(|agent| (agent.id(), agent.behavior.label(), agent.on_tick(&ctx)))
                .collect()
        };

        // Results are in agent order, so the first error reported is that of
        // the lowest failing agent regardless of thread timing.
        let mut events = Vec::new();
        for (agent, behavior, result) in results {
            let kinds = result.map_err(|source| SimError::Agent { agent, source })?;
            events.extend(kinds.into_iter().map(|kind| CarEvent { agent, behavior, kind }));
        }
        Ok(events)
    }

    fn finish<O: SimObserver>(&mut self, observer: &mut O) {
        let stats = self.world.stats();
        info!(
            "{}: {} park events, {}/{} spots free, {} cars parked",
            self.clock,
            stats.park_events,
            stats.free_spots,
            stats.total_spots,
            self.count_status(CarStatus::Parked)
        );
        observer.on_sim_end(self.clock.current_tick);
    }
}
