//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use pgs_core::{SimConfig, Tick};
use pgs_mobility::Kpis;
use pgs_sim::{CarEvent, CarEventKind, SimObserver};
use pgs_world::WorldStats;

use crate::row::{KpiRow, WorldSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes car KPIs and world summaries to any
/// [`OutputWriter`].
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value.  After `sim.run()` returns, check for errors
/// with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:             W,
    tick_duration_secs: u32,
    pathing_failures:   u64,
    last_error:         Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            tick_duration_secs: config.tick_duration_secs,
            pathing_failures:   0,
            last_error:         None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn pathing_failures(&self) -> u64 {
        self.pathing_failures
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn write_kpis(&mut self, tick: Tick, event: &CarEvent, name: &'static str, kpis: &Kpis) {
        let rows: Vec<KpiRow> = kpis
            .entries()
            .into_iter()
            .map(|(metric, value)| KpiRow {
                tick: tick.0,
                agent_id: event.agent.0,
                behavior: event.behavior,
                event: name,
                metric,
                value,
            })
            .collect();
        let result = self.writer.write_kpis(&rows);
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_car_event(&mut self, tick: Tick, event: &CarEvent) {
        match &event.kind {
            CarEventKind::Parked { kpis, .. } => self.write_kpis(tick, event, "parked", kpis),
            CarEventKind::DestinationReached { kpis } => {
                self.write_kpis(tick, event, "destination_reached", kpis)
            }
            CarEventKind::PathingFailed => self.pathing_failures += 1,
            CarEventKind::LeftSpot => {}
        }
    }

    fn on_snapshot(&mut self, tick: Tick, stats: &WorldStats) {
        let row = WorldSummaryRow {
            tick:                 tick.0,
            elapsed_secs:         tick.0 * self.tick_duration_secs as u64,
            total_spots:          stats.total_spots,
            initially_free_spots: stats.initially_free_spots,
            free_spots:           stats.free_spots,
            park_events:          stats.park_events,
            pathing_failures:     self.pathing_failures,
        };
        let result = self.writer.write_world_summary(&row);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
