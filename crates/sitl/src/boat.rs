//! Kinematic sailing boat.
//!
//! The boat turns at a rate proportional to the rudder command and sails at
//! the polar speed for its current angle to the wind. GPS fixes carry
//! Gaussian noise from a seeded RNG so runs are reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sailnav::controller::SensorState;
use sailnav::navigation::geo::{wrap_180, wrap_360};
use sailnav::polar::{PolarData, PolarTable};
use sailnav::{GeoPoint, WindReading};

/// Simulated boat state.
pub struct BoatModel {
    position: GeoPoint,
    heading_deg: f64,
    speed_mps: f64,
    wind: WindReading,
    polar: PolarData,
    max_turn_rate_dps: f64,
    gps_noise_m: f64,
    rng: StdRng,
}

impl BoatModel {
    /// Create a boat at rest.
    ///
    /// `wind.heading_deg` is the compass heading the air moves toward.
    pub fn new(
        position: GeoPoint,
        heading_deg: f64,
        wind: WindReading,
        max_turn_rate_dps: f64,
        gps_noise_m: f64,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            position,
            heading_deg: wrap_360(heading_deg),
            speed_mps: 0.0,
            wind,
            polar: PolarData::default(),
            max_turn_rate_dps,
            gps_noise_m,
            rng,
        }
    }

    /// Angle off the bow the wind comes from, in (-180, 180].
    pub fn true_wind_angle(&self) -> f64 {
        wrap_180(self.wind.heading_deg + 180.0 - self.heading_deg)
    }

    /// Sensor samples the controller sees this tick.
    pub fn sense(&mut self, dt_ms: u32) -> SensorState {
        let north = self.gaussian_noise(self.gps_noise_m);
        let east = self.gaussian_noise(self.gps_noise_m);
        let fix = self.position.destination(0.0, north).destination(90.0, east);

        SensorState {
            gps: Some(fix),
            wind: Some(self.wind),
            true_wind: Some(WindReading::new(self.true_wind_angle(), self.wind.speed_mps)),
            heading_deg: self.heading_deg,
            dt_ms,
        }
    }

    /// Integrate one time step with the given rudder command.
    pub fn step(&mut self, rudder: f64, dt_s: f64) {
        let rudder = rudder.clamp(-1.0, 1.0);
        self.heading_deg = wrap_360(self.heading_deg + rudder * self.max_turn_rate_dps * dt_s);
        self.speed_mps = self.wind.speed_mps * self.polar.lookup(self.true_wind_angle()).speed_ratio;
        self.position = self.position.destination(self.heading_deg, self.speed_mps * dt_s);
    }

    /// Generate Gaussian noise using Box-Muller transform.
    fn gaussian_noise(&mut self, stddev: f64) -> f64 {
        if stddev == 0.0 {
            return 0.0;
        }
        let u1: f64 = self.rng.gen::<f64>().max(f64::EPSILON);
        let u2: f64 = self.rng.gen();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        z * stddev
    }

    /// True position.
    pub fn position(&self) -> GeoPoint {
        self.position
    }

    /// Compass heading in degrees.
    pub fn heading(&self) -> f64 {
        self.heading_deg
    }

    /// Speed through the water in m/s.
    pub fn speed(&self) -> f64 {
        self.speed_mps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: GeoPoint = GeoPoint::new(35.0, 139.0);

    #[test]
    fn head_to_wind_boat_does_not_move() {
        // Air moving south, bow north: wind straight on the nose
        let mut boat = BoatModel::new(ORIGIN, 0.0, WindReading::new(180.0, 5.0), 30.0, 0.0, Some(1));
        assert!(boat.true_wind_angle().abs() < 1e-9);
        boat.step(0.0, 1.0);
        assert!(boat.speed() < 1e-9);
        assert!(ORIGIN.distance_heading_to(&boat.position()).distance_m < 1e-6);
    }

    #[test]
    fn beam_reach_uses_polar_speed() {
        let mut boat = BoatModel::new(ORIGIN, 0.0, WindReading::new(90.0, 4.0), 30.0, 0.0, Some(1));
        assert!((boat.true_wind_angle() + 90.0).abs() < 1e-9);
        boat.step(0.0, 2.0);
        assert!((boat.speed() - 4.0 * 0.85).abs() < 1e-9);
        let moved = ORIGIN.distance_heading_to(&boat.position());
        assert!((moved.distance_m - 6.8).abs() < 1e-3);
    }

    #[test]
    fn rudder_turns_boat() {
        let mut boat = BoatModel::new(ORIGIN, 350.0, WindReading::new(90.0, 4.0), 30.0, 0.0, Some(1));
        boat.step(0.5, 2.0);
        assert!((boat.heading() - 20.0).abs() < 1e-9);
        boat.step(-2.0, 1.0);
        assert!((boat.heading() - 350.0).abs() < 1e-9);
    }

    #[test]
    fn noise_is_seeded() {
        let wind = WindReading::new(90.0, 4.0);
        let mut a = BoatModel::new(ORIGIN, 0.0, wind, 30.0, 2.0, Some(42));
        let mut b = BoatModel::new(ORIGIN, 0.0, wind, 30.0, 2.0, Some(42));
        for _ in 0..5 {
            assert_eq!(a.sense(1000).gps, b.sense(1000).gps);
        }
        let fix = a.sense(1000).gps.unwrap();
        assert!(ORIGIN.distance_heading_to(&fix).distance_m > 0.0);
    }
}
