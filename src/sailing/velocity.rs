//! GPS-derived velocity outlier filter
//!
//! Velocity is computed from the last accepted fix and the newest one. Time
//! spent rejecting samples keeps accumulating, so the next candidate is
//! measured over the whole gap instead of a single tick.

use crate::navigation::{GeoPoint, VelocityEstimate};
use libm::fabs;

/// Velocity filter configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VelocityFilterConfig {
    /// Candidate speeds below this are always accepted (m/s)
    pub min_okay_speed_mps: f64,
    /// Maximum plausible acceleration (m/s^2)
    pub max_acceleration_mps2: f64,
    /// Consecutive rejections after which the next sample is forced through
    pub max_ignores: u32,
}

impl Default for VelocityFilterConfig {
    fn default() -> Self {
        Self {
            min_okay_speed_mps: 0.5,
            max_acceleration_mps2: 2.0,
            max_ignores: 5,
        }
    }
}

/// Result of feeding one fix to the filter
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VelocityUpdate {
    /// Sample accepted; the estimate is now the filter's baseline
    Accepted(VelocityEstimate),
    /// Sample rejected; the caller must skip steering for this tick
    Rejected,
}

impl VelocityUpdate {
    /// The accepted estimate, if any
    pub fn estimate(&self) -> Option<VelocityEstimate> {
        match self {
            VelocityUpdate::Accepted(v) => Some(*v),
            VelocityUpdate::Rejected => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Baseline {
    fix: GeoPoint,
    velocity: VelocityEstimate,
}

/// Rejects implausible velocity samples
#[derive(Debug)]
pub struct VelocityFilter {
    config: VelocityFilterConfig,
    baseline: Option<Baseline>,
    elapsed_ms: u64,
    rejections: u32,
}

impl VelocityFilter {
    /// Create a filter with no baseline
    pub fn new(config: VelocityFilterConfig) -> Self {
        Self {
            config,
            baseline: None,
            elapsed_ms: 0,
            rejections: 0,
        }
    }

    /// Feed a new fix taken `elapsed_ms` after the previous call
    pub fn update(&mut self, fix: GeoPoint, elapsed_ms: u32) -> VelocityUpdate {
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms as u64);

        let Some(baseline) = self.baseline else {
            return self.accept(fix, VelocityEstimate::default());
        };

        if self.elapsed_ms == 0 {
            // No time has passed since the baseline; speed is undefined.
            return VelocityUpdate::Rejected;
        }

        let elapsed_s = self.elapsed_ms as f64 / 1000.0;
        let dh = baseline.fix.distance_heading_to(&fix);
        let candidate = VelocityEstimate::new(dh.distance_m / elapsed_s, dh.heading_deg);
        let acceleration = fabs(candidate.speed_mps - baseline.velocity.speed_mps) / elapsed_s;

        if candidate.speed_mps < self.config.min_okay_speed_mps
            || acceleration < self.config.max_acceleration_mps2
        {
            return self.accept(fix, candidate);
        }

        if self.rejections >= self.config.max_ignores {
            crate::log_warn!(
                "Forcing velocity sample after {} rejections, speed={}",
                self.rejections,
                candidate.speed_mps
            );
            return self.accept(fix, candidate);
        }

        self.rejections += 1;
        crate::log_debug!(
            "Velocity sample rejected, accel={} rejections={}",
            acceleration,
            self.rejections
        );
        VelocityUpdate::Rejected
    }

    /// Last accepted velocity, `None` before the first fix
    pub fn velocity(&self) -> Option<VelocityEstimate> {
        self.baseline.map(|b| b.velocity)
    }

    /// Consecutive rejections since the last accepted sample
    pub fn rejections(&self) -> u32 {
        self.rejections
    }

    fn accept(&mut self, fix: GeoPoint, velocity: VelocityEstimate) -> VelocityUpdate {
        self.baseline = Some(Baseline { fix, velocity });
        self.elapsed_ms = 0;
        self.rejections = 0;
        VelocityUpdate::Accepted(velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: GeoPoint = GeoPoint::new(-36.8094, 174.7506);

    fn filter() -> VelocityFilter {
        VelocityFilter::new(VelocityFilterConfig::default())
    }

    // ========== Bootstrap ==========

    #[test]
    fn test_first_fix_is_accepted_with_zero_velocity() {
        let mut f = filter();
        let update = f.update(START, 1000);
        assert_eq!(update, VelocityUpdate::Accepted(VelocityEstimate::new(0.0, 0.0)));
        assert_eq!(f.velocity(), Some(VelocityEstimate::new(0.0, 0.0)));
    }

    #[test]
    fn test_zero_elapsed_time_is_rejected_without_counting() {
        let mut f = filter();
        f.update(START, 1000);
        assert_eq!(f.update(START.destination(0.0, 5.0), 0), VelocityUpdate::Rejected);
        assert_eq!(f.rejections(), 0);
    }

    // ========== Plausible Samples ==========

    #[test]
    fn test_smooth_track_is_accepted_with_analytic_velocity() {
        let mut f = filter();
        f.update(START, 1000);

        // Accelerate gently: 1.0, 1.5, 2.0, 2.5 m/s heading 045
        let mut position = START;
        for speed in [1.0, 1.5, 2.0, 2.5] {
            let next = position.destination(45.0, speed);
            let update = f.update(next, 1000);
            let v = update.estimate().expect("sample should be accepted");
            assert!((v.speed_mps - speed).abs() < 1e-3, "speed {}", v.speed_mps);
            assert!((v.direction_deg - 45.0).abs() < 0.01, "direction {}", v.direction_deg);
            position = next;
        }
    }

    #[test]
    fn test_low_speed_always_accepted() {
        let mut f = VelocityFilter::new(VelocityFilterConfig {
            max_acceleration_mps2: 0.0,
            ..VelocityFilterConfig::default()
        });
        f.update(START, 1000);
        let update = f.update(START.destination(90.0, 0.3), 1000);
        assert!(update.estimate().is_some());
    }

    // ========== Outlier Rejection ==========

    #[test]
    fn test_jump_is_rejected_and_baseline_widens() {
        let mut f = filter();
        f.update(START, 1000);

        // 1 km in one second is implausible
        let far = START.destination(0.0, 1000.0);
        assert_eq!(f.update(far, 1000), VelocityUpdate::Rejected);
        assert_eq!(f.rejections(), 1);

        // A sensible fix two seconds after the baseline is measured over both ticks
        let near = START.destination(0.0, 2.0);
        let v = f.update(near, 1000).estimate().expect("accepted");
        assert!((v.speed_mps - 1.0).abs() < 1e-3, "speed {}", v.speed_mps);
        assert_eq!(f.rejections(), 0);
    }

    #[test]
    fn test_forced_acceptance_after_max_ignores() {
        let config = VelocityFilterConfig::default();
        let mut f = VelocityFilter::new(config);
        f.update(START, 1000);

        // Each fix is a further kilometer away, always implausible
        for i in 1..=config.max_ignores {
            let fix = START.destination(0.0, 1000.0 * i as f64);
            assert_eq!(f.update(fix, 1000), VelocityUpdate::Rejected, "sample {}", i);
        }
        assert_eq!(f.rejections(), config.max_ignores);

        let last = START.destination(0.0, 1000.0 * (config.max_ignores + 1) as f64);
        let update = f.update(last, 1000);
        assert!(update.estimate().is_some(), "sample {} must be forced", config.max_ignores + 1);
        assert_eq!(f.rejections(), 0);
    }
}
