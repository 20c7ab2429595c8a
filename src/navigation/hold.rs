//! Last-valid sensor holds
//!
//! A dropped or garbled sample is replaced by the last good one so a single
//! bad read never reaches the decision logic. Each vehicle owns its own
//! `SensorHold` and lends it to the controller every tick. A hold stays
//! empty until its sensor has produced one plausible sample.

use super::geo::GeoPoint;
use super::types::WindReading;
use libm::fabs;

/// Samples that can be checked for plausibility before being held
pub trait Plausible: Copy {
    /// True when the sample may replace the held value
    fn is_plausible(&self) -> bool;
}

impl Plausible for GeoPoint {
    fn is_plausible(&self) -> bool {
        self.is_finite() && fabs(self.latitude) <= 90.0 && fabs(self.longitude) <= 180.0
    }
}

impl Plausible for WindReading {
    fn is_plausible(&self) -> bool {
        self.is_finite() && self.speed_mps >= 0.0
    }
}

/// Holds the last plausible sample of one sensor
///
/// Empty until the first plausible sample arrives.
#[derive(Clone, Copy, Debug)]
pub struct LastValid<T: Plausible> {
    last: Option<T>,
}

impl<T: Plausible> LastValid<T> {
    /// Create an empty hold
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Return `sample` if it is present and plausible, otherwise the held value
    ///
    /// `None` only while no plausible sample has ever been seen.
    pub fn check(&mut self, sample: Option<T>) -> Option<T> {
        if let Some(value) = sample.filter(T::is_plausible) {
            self.last = Some(value);
        }
        self.last
    }

    /// The currently held value
    pub fn last(&self) -> Option<T> {
        self.last
    }

    /// True once a plausible sample has been held
    pub fn has_sample(&self) -> bool {
        self.last.is_some()
    }
}

impl<T: Plausible> Default for LastValid<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-vehicle holds for every sensor the controller reads
#[derive(Clone, Copy, Debug)]
pub struct SensorHold {
    /// Position fix hold
    pub gps: LastValid<GeoPoint>,
    /// Absolute wind hold
    pub wind: LastValid<WindReading>,
    /// True wind (relative to the bow) hold
    pub true_wind: LastValid<WindReading>,
}

impl SensorHold {
    /// Create empty holds
    pub fn new() -> Self {
        Self {
            gps: LastValid::new(),
            wind: LastValid::new(),
            true_wind: LastValid::new(),
        }
    }
}

impl Default for SensorHold {
    fn default() -> Self {
        Self::new()
    }
}
