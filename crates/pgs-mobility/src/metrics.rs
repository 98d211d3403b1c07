//! Per-trip accumulators and the KPI snapshot cars publish.

/// Grams of CO2 per kilometre driven.
pub const CO2_G_PER_KM: f64 = 131.0;

/// Litres of fuel per 100 km driven.
pub const FUEL_L_PER_100KM: f64 = 6.5;

/// Accumulated over one trip; reset when a car leaves a parking spot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TripMetrics {
    pub distance_travelled_m: f64,
    /// Shortest-path distance to the destination when the trip was planned.
    pub planned_distance_m: f64,
    speed_reduction_sum: f64,
    speed_reduction_samples: u32,
    /// Ticks spent in the `Parking` state.
    pub parking_ticks: u64,
}

impl TripMetrics {
    /// Record how much slower than its limit a street was running.
    pub fn sample_speed(&mut self, current_ms: f64, limit_ms: f64) {
        if limit_ms > 0.0 {
            self.speed_reduction_sum += 100.0 - current_ms / limit_ms * 100.0;
            self.speed_reduction_samples += 1;
        }
    }

    /// Mean speed reduction in percent over all samples, 0 without samples.
    pub fn mean_speed_reduction(&self) -> f64 {
        if self.speed_reduction_samples == 0 {
            0.0
        } else {
            self.speed_reduction_sum / self.speed_reduction_samples as f64
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Named values a car publishes when it parks or reaches its destination.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Kpis {
    pub distance_travelled_m: f64,
    /// Remaining distance to the destination, 0 if it is unreachable.
    pub dist_from_dest_m: f64,
    /// Distance driven over the planned distance, 0 if nothing was planned.
    pub travel_to_destination_ratio: f64,
    pub speed_reduction_pct: f64,
    pub parking_emissions_g: f64,
    pub fuel_consumption_l: f64,
    pub time_spent_parking_ticks: u64,
}

impl Kpis {
    pub fn from_metrics(metrics: &TripMetrics, dist_from_dest_m: f64) -> Self {
        let km = metrics.distance_travelled_m / 1_000.0;
        let ratio = if metrics.planned_distance_m > 0.0 {
            metrics.distance_travelled_m / metrics.planned_distance_m
        } else {
            0.0
        };
        Self {
            distance_travelled_m: metrics.distance_travelled_m,
            dist_from_dest_m,
            travel_to_destination_ratio: ratio,
            speed_reduction_pct: metrics.mean_speed_reduction(),
            parking_emissions_g: km * CO2_G_PER_KM,
            fuel_consumption_l: km * FUEL_L_PER_100KM / 100.0,
            time_spent_parking_ticks: metrics.parking_ticks,
        }
    }

    /// The KPI map under its published names.
    pub fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("distanceTravelled", self.distance_travelled_m),
            ("distFromDest", self.dist_from_dest_m),
            ("travelDistanceToDestinationDistanceRatio", self.travel_to_destination_ratio),
            ("speedReduction", self.speed_reduction_pct),
            ("parkingEmissions", self.parking_emissions_g),
            ("fuelConsumption", self.fuel_consumption_l),
            ("timeSpentParking", self.time_spent_parking_ticks as f64),
        ]
    }
}
