//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `car_kpis.csv`
//! - `world_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{KpiRow, OutputResult, WorldSummaryRow};

pub struct CsvWriter {
    kpis:      Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the two CSV files in it and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut kpis = Writer::from_path(dir.join("car_kpis.csv"))?;
        kpis.write_record(["tick", "agent_id", "behavior", "event", "metric", "value"])?;

        let mut summaries = Writer::from_path(dir.join("world_summaries.csv"))?;
        summaries.write_record([
            "tick",
            "elapsed_secs",
            "total_spots",
            "initially_free_spots",
            "free_spots",
            "park_events",
            "pathing_failures",
        ])?;

        Ok(Self { kpis, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_kpis(&mut self, rows: &[KpiRow]) -> OutputResult<()> {
        for row in rows {
            self.kpis.write_record(&[
                row.tick.to_string(),
                row.agent_id.to_string(),
                row.behavior.to_owned(),
                row.event.to_owned(),
                row.metric.to_owned(),
                row.value.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_world_summary(&mut self, row: &WorldSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.elapsed_secs.to_string(),
            row.total_spots.to_string(),
            row.initially_free_spots.to_string(),
            row.free_spots.to_string(),
            row.park_events.to_string(),
            row.pathing_failures.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.kpis.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
