//! The `OutputWriter` trait implemented by backend writers.

use crate::{KpiRow, OutputResult, WorldSummaryRow};

/// Errors are returned to [`SimOutputObserver`][crate::SimOutputObserver],
/// which keeps the first one for [`take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    fn write_kpis(&mut self, rows: &[KpiRow]) -> OutputResult<()>;

    fn write_world_summary(&mut self, row: &WorldSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
