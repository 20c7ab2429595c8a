//! Sailing mode classification
//!
//! The angle between the wind and the course to the current waypoint falls
//! into one of six bands. Bands next to a threshold are uncertain: they only
//! set the mode when there is no previous one, which keeps the mode from
//! flapping while the boat sails along a threshold.

use crate::navigation::geo::wrap_180;
use libm::fabs;

/// Point of sail relative to the course to the waypoint
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SailingMode {
    /// Waypoint lies upwind; the boat must beat toward it
    ForeWind,
    /// Waypoint can be reached directly on a reach
    SideWind,
    /// Waypoint lies downwind; the boat gybes toward it
    AftWind,
}

impl SailingMode {
    /// Short name for log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            SailingMode::ForeWind => "fore-wind",
            SailingMode::SideWind => "side-wind",
            SailingMode::AftWind => "aft-wind",
        }
    }

    /// The tacking mode, if this point of sail needs one
    pub fn tacking(&self) -> Option<TackingMode> {
        match self {
            SailingMode::ForeWind => Some(TackingMode::ForeWind),
            SailingMode::SideWind => None,
            SailingMode::AftWind => Some(TackingMode::AftWind),
        }
    }
}

/// Points of sail that zig-zag toward the waypoint
///
/// Side-wind legs sail straight and have no laylines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TackingMode {
    /// Beating upwind
    ForeWind,
    /// Running downwind
    AftWind,
}

impl TackingMode {
    /// Sign applied to the tack offset: `+1` beating, `-1` running
    pub fn sign(&self) -> f64 {
        match self {
            TackingMode::ForeWind => 1.0,
            TackingMode::AftWind => -1.0,
        }
    }

    /// Short name for log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            TackingMode::ForeWind => "fore-wind",
            TackingMode::AftWind => "aft-wind",
        }
    }
}

/// Classification confidence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Certainty {
    /// Far enough from any threshold to override the previous mode
    Certain,
    /// Inside a hysteresis band; only used when there is no previous mode
    Uncertain,
}

/// Band thresholds in degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeThresholds {
    /// Boundary between fore-wind and side-wind
    pub side_wind_deg: f64,
    /// Boundary between side-wind and aft-wind
    pub aft_wind_deg: f64,
    /// Half-width of the hysteresis band around each boundary
    pub change_angle_deg: f64,
}

impl Default for ModeThresholds {
    fn default() -> Self {
        Self {
            side_wind_deg: 60.0,
            aft_wind_deg: 120.0,
            change_angle_deg: 15.0,
        }
    }
}

impl ModeThresholds {
    /// True when all six bands are ordered and reachable inside [0, 180]
    pub fn is_consistent(&self) -> bool {
        let t = self;
        t.change_angle_deg >= 0.0
            && t.side_wind_deg - t.change_angle_deg >= 0.0
            && t.side_wind_deg + t.change_angle_deg <= t.aft_wind_deg - t.change_angle_deg
            && t.aft_wind_deg + t.change_angle_deg <= 180.0
    }
}

/// Map a wind/course difference angle onto its band
pub fn classify_band(diff_angle_deg: f64, t: &ModeThresholds) -> (SailingMode, Certainty) {
    let side = t.side_wind_deg;
    let aft = t.aft_wind_deg;
    let band = t.change_angle_deg;

    if diff_angle_deg <= side - band {
        (SailingMode::ForeWind, Certainty::Certain)
    } else if diff_angle_deg <= side {
        (SailingMode::ForeWind, Certainty::Uncertain)
    } else if diff_angle_deg <= side + band {
        (SailingMode::SideWind, Certainty::Uncertain)
    } else if diff_angle_deg <= aft - band {
        (SailingMode::SideWind, Certainty::Certain)
    } else if diff_angle_deg <= aft {
        (SailingMode::SideWind, Certainty::Uncertain)
    } else if diff_angle_deg <= aft + band {
        (SailingMode::AftWind, Certainty::Uncertain)
    } else {
        (SailingMode::AftWind, Certainty::Certain)
    }
}

/// Pure hysteresis step: the mode for `diff_angle_deg` given the previous mode
///
/// Returns `None` only for a NaN angle with no previous mode to fall back on.
pub fn resolve_mode(
    diff_angle_deg: f64,
    last: Option<SailingMode>,
    t: &ModeThresholds,
) -> Option<SailingMode> {
    if diff_angle_deg.is_nan() {
        return last;
    }
    match (classify_band(diff_angle_deg, t), last) {
        ((mode, Certainty::Certain), _) => Some(mode),
        ((mode, Certainty::Uncertain), None) => Some(mode),
        ((_, Certainty::Uncertain), Some(previous)) => Some(previous),
    }
}

/// Absolute angle in [0, 180] between the wind's downwind direction and the course
pub fn wind_diff_angle(heading_to_waypoint_deg: f64, wind_heading_deg: f64) -> f64 {
    let wind_toward = wrap_180(wind_heading_deg - 180.0);
    fabs(wrap_180(wind_toward - heading_to_waypoint_deg))
}

/// Stateful classifier remembering the last mode
#[derive(Debug)]
pub struct SailingModeClassifier {
    thresholds: ModeThresholds,
    last_mode: Option<SailingMode>,
}

impl SailingModeClassifier {
    /// Create a classifier with no mode memory
    pub fn new(thresholds: ModeThresholds) -> Self {
        Self {
            thresholds,
            last_mode: None,
        }
    }

    /// Classify the current geometry
    ///
    /// A NaN angle is logged and the previous mode retained.
    pub fn classify(
        &mut self,
        heading_to_waypoint_deg: f64,
        wind_heading_deg: f64,
    ) -> Option<SailingMode> {
        let diff = wind_diff_angle(heading_to_waypoint_deg, wind_heading_deg);
        if diff.is_nan() {
            crate::log_warn!(
                "Sailing mode angle is NaN (course={} wind={}), keeping previous mode",
                heading_to_waypoint_deg,
                wind_heading_deg
            );
        }

        let mode = resolve_mode(diff, self.last_mode, &self.thresholds);
        if mode != self.last_mode {
            if let Some(m) = mode {
                crate::log_debug!("Sailing mode -> {} (angle={})", m.as_str(), diff);
            }
        }
        self.last_mode = mode;
        mode
    }

    /// Forget the previous mode
    pub fn reset(&mut self) {
        self.last_mode = None;
    }

    /// Mode returned by the last classification
    pub fn last_mode(&self) -> Option<SailingMode> {
        self.last_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Wind heading that produces `diff` against a course of 0
    fn wind_for_diff(diff: f64) -> f64 {
        // wind_toward = wind - 180 must be `diff` off the course
        diff + 180.0
    }

    // ========== Bands ==========

    #[test]
    fn test_band_edges() {
        let t = ModeThresholds::default();
        assert_eq!(classify_band(45.0, &t), (SailingMode::ForeWind, Certainty::Certain));
        assert_eq!(classify_band(60.0, &t), (SailingMode::ForeWind, Certainty::Uncertain));
        assert_eq!(classify_band(75.0, &t), (SailingMode::SideWind, Certainty::Uncertain));
        assert_eq!(classify_band(105.0, &t), (SailingMode::SideWind, Certainty::Certain));
        assert_eq!(classify_band(120.0, &t), (SailingMode::SideWind, Certainty::Uncertain));
        assert_eq!(classify_band(135.0, &t), (SailingMode::AftWind, Certainty::Uncertain));
        assert_eq!(classify_band(135.5, &t), (SailingMode::AftWind, Certainty::Certain));
    }

    #[test]
    fn test_wind_diff_angle_symmetry() {
        let a = wind_diff_angle(10.0, 200.0);
        let b = wind_diff_angle(10.0, 180.0);
        assert!((a - 10.0).abs() < 1e-9);
        assert!((b - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_wind_diff_angle_range() {
        for wind in [-720.0, -181.0, -90.0, 0.0, 45.0, 179.9, 359.0, 725.0] {
            let d = wind_diff_angle(33.0, wind);
            assert!((0.0..=180.0).contains(&d), "diff {} for wind {}", d, wind);
        }
    }

    // ========== Hysteresis ==========

    #[test]
    fn test_certain_fore_wind_regardless_of_history() {
        let t = ModeThresholds::default();
        let diff = t.side_wind_deg - t.change_angle_deg - 1.0;
        for last in [None, Some(SailingMode::ForeWind), Some(SailingMode::SideWind), Some(SailingMode::AftWind)] {
            assert_eq!(resolve_mode(diff, last, &t), Some(SailingMode::ForeWind));
        }
    }

    #[test]
    fn test_uncertain_band_keeps_previous_mode() {
        let t = ModeThresholds::default();
        assert_eq!(
            resolve_mode(55.0, Some(SailingMode::SideWind), &t),
            Some(SailingMode::SideWind)
        );
        assert_eq!(resolve_mode(55.0, None, &t), Some(SailingMode::ForeWind));
    }

    #[test]
    fn test_no_chatter_around_side_threshold() {
        let mut classifier = SailingModeClassifier::new(ModeThresholds::default());
        let mut changes = 0;
        let mut last = classifier.classify(0.0, wind_for_diff(55.0));
        for i in 0..40 {
            let diff = if i % 2 == 0 { 65.0 } else { 55.0 };
            let mode = classifier.classify(0.0, wind_for_diff(diff));
            if mode != last {
                changes += 1;
            }
            last = mode;
        }
        assert_eq!(changes, 0);
        assert_eq!(last, Some(SailingMode::ForeWind));
    }

    #[test]
    fn test_genuine_excursion_changes_mode_once() {
        let mut classifier = SailingModeClassifier::new(ModeThresholds::default());
        let sequence = [40.0, 55.0, 65.0, 80.0, 65.0, 55.0, 65.0];
        let modes: Vec<_> = sequence
            .iter()
            .map(|d| classifier.classify(0.0, wind_for_diff(*d)))
            .collect();
        assert_eq!(modes[0], Some(SailingMode::ForeWind));
        assert_eq!(modes[2], Some(SailingMode::ForeWind));
        assert_eq!(modes[3], Some(SailingMode::SideWind));
        assert_eq!(modes[5], Some(SailingMode::SideWind));
        assert_eq!(modes[6], Some(SailingMode::SideWind));
    }

    // ========== NaN and Reset ==========

    #[test]
    fn test_nan_retains_previous_mode() {
        let mut classifier = SailingModeClassifier::new(ModeThresholds::default());
        classifier.classify(0.0, wind_for_diff(150.0));
        assert_eq!(classifier.classify(f64::NAN, 90.0), Some(SailingMode::AftWind));
    }

    #[test]
    fn test_nan_without_history_is_none() {
        let mut classifier = SailingModeClassifier::new(ModeThresholds::default());
        assert_eq!(classifier.classify(0.0, f64::NAN), None);
        assert_eq!(classifier.last_mode(), None);
    }

    #[test]
    fn test_reset_reproduces_first_classification() {
        let mut classifier = SailingModeClassifier::new(ModeThresholds::default());
        let first = classifier.classify(0.0, wind_for_diff(70.0));
        classifier.classify(0.0, wind_for_diff(20.0));
        classifier.reset();
        assert_eq!(classifier.classify(0.0, wind_for_diff(70.0)), first);
        assert_eq!(first, Some(SailingMode::SideWind));
    }

    #[test]
    fn test_tacking_mode_signs() {
        assert_eq!(SailingMode::ForeWind.tacking(), Some(TackingMode::ForeWind));
        assert_eq!(SailingMode::SideWind.tacking(), None);
        assert!((TackingMode::AftWind.sign() + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_consistency() {
        assert!(ModeThresholds::default().is_consistent());
        let broken = ModeThresholds {
            aft_wind_deg: 190.0,
            ..ModeThresholds::default()
        };
        assert!(!broken.is_consistent());
    }
}
