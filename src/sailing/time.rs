//! Race clock and finish projection
//!
//! On every waypoint arrival the projector compares the speed still needed
//! to finish inside the time limit with the average speed achieved so far.
//! When the route cannot be completed in time the boat cuts to the finish.

/// Course distances of a waypoint
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LegProgress {
    /// Course distance sailed from the start to this waypoint (meters)
    pub course_dist_m: f64,
    /// Course distance from this waypoint to the finish (meters)
    pub dist_to_finish_m: f64,
}

/// Tracks race time against an optional limit
#[derive(Debug)]
pub struct TimeProjector {
    elapsed_s: f64,
    time_limit_s: Option<f64>,
    buffer_m: f64,
    waypoint_count: u32,
}

impl TimeProjector {
    /// Create a projector; `None` means the race has no time limit
    pub fn new(time_limit_s: Option<f64>, buffer_m: f64) -> Self {
        Self {
            elapsed_s: 0.0,
            time_limit_s,
            buffer_m,
            waypoint_count: 0,
        }
    }

    /// Advance the race clock
    pub fn inc_time(&mut self, dt_ms: u32) {
        self.elapsed_s += dt_ms as f64 / 1000.0;
    }

    /// Decide on a waypoint arrival whether to cut to the finishing leg
    ///
    /// Always false without a time limit; always true once time has run out.
    pub fn head_to_finish(&mut self, progress: &LegProgress) -> bool {
        self.waypoint_count += 1;

        let Some(limit) = self.time_limit_s else {
            return false;
        };

        let remaining_s = limit - self.elapsed_s;
        if remaining_s <= 0.0 {
            return true;
        }
        if self.elapsed_s <= 0.0 {
            return false;
        }

        let average_mps = progress.course_dist_m / self.elapsed_s;
        let required_mps = (progress.dist_to_finish_m + self.buffer_m) / remaining_s;
        crate::log_debug!(
            "Finish projection: required={} average={} remaining={}",
            required_mps,
            average_mps,
            remaining_s
        );
        required_mps >= average_mps
    }

    /// Seconds since the race started
    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    /// Number of waypoint arrivals evaluated
    pub fn waypoint_count(&self) -> u32 {
        self.waypoint_count
    }
}
