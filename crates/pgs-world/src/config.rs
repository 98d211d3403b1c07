//! World construction parameters.

use crate::{WorldError, WorldResult};

/// Parameters that shape spot generation and the congestion model.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Fraction of the kerb on a named street that is parking, `0..=1`.
    pub parking_density: f64,

    /// Probability that a generated spot starts free.  The remaining spots
    /// are held by background traffic for the whole run.
    pub initial_free_rate: f64,

    /// Length of one parking spot in metres.
    pub spot_length_m: f64,

    /// Average car length in metres, used by the congestion speed model.
    pub car_length_m: f64,

    /// Seed for initial spot occupancy.
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            parking_density:   0.5,
            initial_free_rate: 0.01,
            spot_length_m:     5.0,
            car_length_m:      5.0,
            seed:              42,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> WorldResult<()> {
        if !(0.0..=1.0).contains(&self.parking_density) {
            return Err(WorldError::Config(format!(
                "parking_density must be in [0, 1], got {}",
                self.parking_density
            )));
        }
        if !(0.0..=1.0).contains(&self.initial_free_rate) {
            return Err(WorldError::Config(format!(
                "initial_free_rate must be in [0, 1], got {}",
                self.initial_free_rate
            )));
        }
        for (name, value) in [("spot_length_m", self.spot_length_m), ("car_length_m", self.car_length_m)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(WorldError::Config(format!("{name} must be positive, got {value}")));
            }
        }
        Ok(())
    }
}
