//! Plain data row types written by output backends.

/// One named KPI value of one car at the moment it was published.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KpiRow {
    pub tick:     u64,
    pub agent_id: u32,
    pub behavior: &'static str,
    /// `"parked"` or `"destination_reached"`.
    pub event:    &'static str,
    pub metric:   &'static str,
    pub value:    f64,
}

/// World diagnostics at one snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldSummaryRow {
    pub tick:                 u64,
    pub elapsed_secs:         u64,
    pub total_spots:          u64,
    pub initially_free_spots: u64,
    pub free_spots:           i64,
    pub park_events:          u64,
    /// Pathing failures observed since the start of the run.
    pub pathing_failures:     u64,
}
