//! Shared state handed to every behavior callback.

use pgs_core::Tick;
use pgs_guidance::ParkingGuidanceService;
use pgs_world::World;

/// Everything a behavior may touch besides its own car, for one tick.
///
/// Built once per tick by pgs-sim and shared across all worker threads.
/// The world is mutated only through its own locking methods.
#[derive(Copy, Clone)]
pub struct TickContext<'a> {
    pub tick: Tick,
    /// Simulated seconds per tick.
    pub tick_duration_secs: u32,
    pub world: &'a World,
    pub guidance: &'a ParkingGuidanceService,
    /// Upper bound (inclusive) of the random dwell time after parking.
    pub max_dwell_ticks: u32,
}

impl<'a> TickContext<'a> {
    #[inline]
    pub fn new(
        tick: Tick,
        tick_duration_secs: u32,
        world: &'a World,
        guidance: &'a ParkingGuidanceService,
        max_dwell_ticks: u32,
    ) -> Self {
        Self { tick, tick_duration_secs, world, guidance, max_dwell_ticks }
    }

    #[inline]
    pub fn tick_secs(&self) -> f64 {
        self.tick_duration_secs as f64
    }
}
