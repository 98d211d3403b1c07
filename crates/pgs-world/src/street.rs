//! Per-street resource: car count, spots and the congestion speed model.

use std::sync::{Mutex, MutexGuard};

use pgs_core::units::{kmh_to_ms, safe_speed_ms};
use pgs_core::EdgeId;

use crate::ParkingSpot;

/// State guarded by a street's lock.
#[derive(Debug)]
pub struct StreetState {
    /// Cars currently driving on the street (parked cars are not counted).
    pub car_count: u32,
    /// Fixed-size spot list, ascending by distance from the street source.
    pub spots: Vec<ParkingSpot>,
}

/// One directed street and its lock.
///
/// Immutable attributes are plain fields; the mutable part sits behind
/// [`Street::lock`].
#[derive(Debug)]
pub struct Street {
    pub id: EdgeId,
    pub length_m: f64,
    pub speed_limit_kmh: f64,
    pub speed_limit_ms: f64,
    /// Cars that fit bumper to bumper.
    pub capacity: u32,
    /// Gap between consecutive spots; 0 when the street has none.
    pub spot_spacing_m: f64,
    pub spot_count: usize,
    car_length_m: f64,
    state: Mutex<StreetState>,
}

impl Street {
    pub(crate) fn new(
        id: EdgeId,
        length_m: f64,
        speed_limit_kmh: f64,
        car_length_m: f64,
        spot_spacing_m: f64,
        spots: Vec<ParkingSpot>,
    ) -> Self {
        Self {
            id,
            length_m,
            speed_limit_kmh,
            speed_limit_ms: kmh_to_ms(speed_limit_kmh),
            capacity: (length_m / car_length_m).floor() as u32,
            spot_spacing_m,
            spot_count: spots.len(),
            car_length_m,
            state: Mutex::new(StreetState { car_count: 0, spots }),
        }
    }

    /// Acquire this street's lock.
    ///
    /// A panic while the lock was held cannot leave the state torn (every
    /// critical section writes plain fields), so poisoning is ignored.
    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, StreetState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn car_count(&self) -> u32 {
        self.lock().car_count
    }

    /// Fastest safe speed in m/s with the street's current traffic.
    pub fn current_max_speed_ms(&self) -> f64 {
        let cars = self.car_count();
        self.max_speed_for(cars)
    }

    /// Speed model for a given car count:
    /// `min(limit, safe_speed((length - n * car_length) / n))`, or the limit
    /// on an empty street.
    pub fn max_speed_for(&self, car_count: u32) -> f64 {
        if car_count == 0 {
            return self.speed_limit_ms;
        }
        let n = car_count as f64;
        let free_length = self.length_m - n * self.car_length_m;
        self.speed_limit_ms.min(safe_speed_ms(free_length / n))
    }

    /// Seconds to traverse the street at its current speed.
    pub fn current_cover_duration_secs(&self) -> f64 {
        self.length_m / self.current_max_speed_ms()
    }

    pub fn free_spot_count(&self) -> usize {
        self.lock().spots.iter().filter(|s| !s.state.occupied()).count()
    }

    /// Copy of the spot list, for diagnostics and tests.
    pub fn spots_snapshot(&self) -> Vec<ParkingSpot> {
        self.lock().spots.clone()
    }
}
