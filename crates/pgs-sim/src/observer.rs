//! Simulation observer trait, the metric sink of a run.

use pgs_core::Tick;
use pgs_world::WorldStats;

use crate::CarEvent;

/// Callbacks invoked by [`Sim`][crate::Sim] at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: park counter
///
/// ```rust,ignore
/// struct ParkCounter(usize);
///
/// impl SimObserver for ParkCounter {
///     fn on_car_event(&mut self, _tick: Tick, event: &CarEvent) {
///         if matches!(event.kind, CarEventKind::Parked { .. }) {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any car moves.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per car event, after every car has finished the tick,
    /// in ascending agent order.
    fn on_car_event(&mut self, _tick: Tick, _event: &CarEvent) {}

    /// Called at the end of each tick with the number of events it produced.
    fn on_tick_end(&mut self, _tick: Tick, _events: usize) {}

    /// Called every `config.output_interval_ticks` ticks with the world's
    /// diagnostic counters.
    fn on_snapshot(&mut self, _tick: Tick, _stats: &WorldStats) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
