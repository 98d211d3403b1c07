//! Fleet composition.

use pgs_behavior::Behavior;

/// How many cars of each kind take part in a run.
///
/// Driving cars get ids first, in the order cruisers, local parkers, guided
/// parkers, rogue parkers; pre-parked cars follow and behave as local
/// parkers once they leave their spot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FleetConfig {
    pub cruisers:        usize,
    pub local_parkers:   usize,
    pub guided_parkers:  usize,
    pub rogue_parkers:   usize,
    /// Cars standing on random free spots at tick 0.
    pub pre_parked:      usize,
    /// Upper bound (inclusive) of the random dwell time, in ticks.
    pub max_dwell_ticks: u32,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            cruisers:        0,
            local_parkers:   50,
            guided_parkers:  50,
            rogue_parkers:   0,
            pre_parked:      0,
            max_dwell_ticks: 500,
        }
    }
}

impl FleetConfig {
    /// Cars that start in traffic.
    pub fn driving(&self) -> usize {
        self.cruisers + self.local_parkers + self.guided_parkers + self.rogue_parkers
    }

    pub fn total(&self) -> usize {
        self.driving() + self.pre_parked
    }

    /// Behaviors of the driving cars, in id order.
    pub fn driving_behaviors(&self) -> impl Iterator<Item = Behavior> {
        [
            (Behavior::CRUISER, self.cruisers),
            (Behavior::LOCAL_PARKER, self.local_parkers),
            (Behavior::GUIDED_PARKER, self.guided_parkers),
            (Behavior::ROGUE_PARKER, self.rogue_parkers),
        ]
        .into_iter()
        .flat_map(|(behavior, n)| std::iter::repeat_n(behavior, n))
    }
}
