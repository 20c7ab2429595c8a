//! Sensor-derived value types
//!
//! - `WindReading`: Wind direction and strength
//! - `VelocityEstimate`: Speed and course derived from consecutive fixes

/// Wind direction and strength
///
/// The absolute wind handed to the controller is the compass heading of the
/// wind vector; the true wind is measured relative to the bow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindReading {
    /// Heading in degrees
    pub heading_deg: f64,
    /// Wind speed in m/s
    pub speed_mps: f64,
}

impl WindReading {
    /// Create a new wind reading
    pub const fn new(heading_deg: f64, speed_mps: f64) -> Self {
        Self {
            heading_deg,
            speed_mps,
        }
    }

    /// True when both fields are finite numbers
    pub fn is_finite(&self) -> bool {
        self.heading_deg.is_finite() && self.speed_mps.is_finite()
    }
}

impl Default for WindReading {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// Velocity derived from two accepted position fixes
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VelocityEstimate {
    /// Speed over ground in m/s
    pub speed_mps: f64,
    /// Course over ground in degrees (0-360, true north)
    pub direction_deg: f64,
}

impl VelocityEstimate {
    /// Create a new velocity estimate
    pub const fn new(speed_mps: f64, direction_deg: f64) -> Self {
        Self {
            speed_mps,
            direction_deg,
        }
    }
}
