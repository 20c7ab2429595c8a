//! Rudder and sail command mapping

use crate::navigation::geo::wrap_180;
use crate::polar::PolarTable;
use libm::{fabs, sin};

/// Largest scaled steering angle before saturation (degrees)
const MAX_STEER_ANGLE_DEG: f64 = 90.0;

/// Rudder mapping configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HelmConfig {
    /// Turn-rate scalar for small heading errors
    pub low_rate: f64,
    /// Turn-rate scalar for large heading errors
    pub high_rate: f64,
    /// Heading error above which `high_rate` applies (degrees)
    pub switch_angle_deg: f64,
}

impl Default for HelmConfig {
    fn default() -> Self {
        Self {
            low_rate: 1.2,
            high_rate: 2.0,
            switch_angle_deg: 45.0,
        }
    }
}

/// Maps steering targets to actuator commands
#[derive(Debug)]
pub struct Helm {
    config: HelmConfig,
}

impl Helm {
    /// Create a helm with the given rudder mapping
    pub fn new(config: HelmConfig) -> Self {
        Self { config }
    }

    /// Rudder command in [-1, 1] for a heading relative to the bow
    ///
    /// The angle is normalized to (-180, 180], scaled by the turn-rate
    /// scalar, saturated at 90 degrees and passed through a sine. A NaN
    /// input yields a centred rudder.
    pub fn rudder(&self, relative_heading_deg: f64) -> f64 {
        let angle = wrap_180(relative_heading_deg);
        let rate = if fabs(angle) > self.config.switch_angle_deg {
            self.config.high_rate
        } else {
            self.config.low_rate
        };
        let steer = (angle * rate).clamp(-MAX_STEER_ANGLE_DEG, MAX_STEER_ANGLE_DEG);
        sanitize_output(sin(steer.to_radians()), -1.0, 1.0, 0.0)
    }

    /// Sail trim for a true wind angle, straight from the polar table
    pub fn sail<P: PolarTable + ?Sized>(&self, polar: &P, true_wind_heading_deg: f64) -> f64 {
        polar.lookup(true_wind_heading_deg).sail_trim
    }
}

/// Replace NaN/Inf with `default`, clamp everything else
fn sanitize_output(value: f64, min: f64, max: f64, default: f64) -> f64 {
    if value.is_nan() || value.is_infinite() {
        default
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polar::PolarData;

    fn helm() -> Helm {
        Helm::new(HelmConfig::default())
    }

    // ========== Rudder ==========

    #[test]
    fn test_rudder_centred() {
        assert!(helm().rudder(0.0).abs() < 1e-12);
    }

    #[test]
    fn test_rudder_low_rate_region() {
        // 30 deg * 1.2 = 36 deg
        let expected = 36.0_f64.to_radians().sin();
        assert!((helm().rudder(30.0) - expected).abs() < 1e-9);
        assert!((helm().rudder(-30.0) + expected).abs() < 1e-9);
    }

    #[test]
    fn test_rudder_high_rate_region() {
        // 40 deg stays on the low rate, 46 deg jumps to the high rate and saturates
        let low = helm().rudder(40.0);
        assert!((low - 48.0_f64.to_radians().sin()).abs() < 1e-9);
        assert!((helm().rudder(46.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rudder_saturates() {
        assert!((helm().rudder(170.0) - 1.0).abs() < 1e-12);
        assert!((helm().rudder(-170.0) + 1.0).abs() < 1e-12);
        // Beyond 180 the angle wraps to the other side before saturating:
        // 200 is -160, -200 is 160
        assert!((helm().rudder(200.0) + 1.0).abs() < 1e-12);
        assert!((helm().rudder(-200.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rudder_bounded() {
        for i in -720..=720 {
            let r = helm().rudder(i as f64 * 0.5);
            assert!((-1.0..=1.0).contains(&r), "rudder {} for {}", r, i);
        }
    }

    #[test]
    fn test_rudder_nan_is_centred() {
        assert_eq!(helm().rudder(f64::NAN), 0.0);
    }

    // ========== Sail ==========

    #[test]
    fn test_sail_delegates_to_polar() {
        let polar = PolarData::default();
        let h = helm();
        assert!((h.sail(&polar, 90.0) - polar.lookup(90.0).sail_trim).abs() < 1e-12);
        assert!((h.sail(&polar, -135.0) - polar.lookup(135.0).sail_trim).abs() < 1e-12);
    }
}
