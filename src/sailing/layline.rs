//! Layline tracking for one waypoint leg
//!
//! A layline runs through the current waypoint at the optimal wind angle on
//! either side of the wind. Once the boat is on the far side of a layline it
//! can fetch the mark on a single tack.

use crate::navigation::geo::{turn_angle, wrap_180};
use crate::navigation::{GeoPoint, WindReading};
use crate::sailing::mode::TackingMode;

/// Bends within this many degrees count as a straight course
const STRAIGHT_ANGLE_THRESH_DEG: f64 = 15.0;

/// Distance beyond the waypoint of the point that marks the layline's far side
const REFERENCE_DISTANCE_M: f64 = 10.0;

/// The three waypoints that define a leg
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Leg {
    /// Waypoint the leg starts from
    pub previous: GeoPoint,
    /// Waypoint being sailed to
    pub current: GeoPoint,
    /// Waypoint after the current one (the current one on the final leg)
    pub next: GeoPoint,
}

/// Tracks the laylines of the current waypoint
#[derive(Clone, Copy, Debug)]
pub struct LaylineTracker {
    leg: Leg,
    mode: TackingMode,
    optimal_wind_angle_deg: f64,
    position: Option<GeoPoint>,
    wind: Option<WindReading>,
    last_reached: Option<bool>,
}

impl LaylineTracker {
    /// Create a tracker for `leg`
    pub fn new(leg: Leg, mode: TackingMode, optimal_wind_angle_deg: f64) -> Self {
        Self {
            leg,
            mode,
            optimal_wind_angle_deg,
            position: None,
            wind: None,
            last_reached: None,
        }
    }

    /// Store the latest boat position and absolute wind
    pub fn update(&mut self, position: GeoPoint, wind: WindReading) {
        self.position = Some(position);
        self.wind = Some(wind);
    }

    /// True when the boat is on or beyond either layline
    ///
    /// False until `update` has been called.
    pub fn has_reached_it(&self) -> bool {
        match (self.position, self.wind) {
            (Some(position), Some(wind)) => {
                self.has_reached_layline(1.0, &position, &wind)
                    || self.has_reached_layline(-1.0, &position, &wind)
            }
            _ => false,
        }
    }

    /// True when the boat is still between the laylines
    pub fn within_lay_lines(&self) -> bool {
        !self.has_reached_it()
    }

    /// Edge detector for `has_reached_it` going from false to true
    ///
    /// The first call only seeds the remembered state.
    pub fn has_just_crossed_lay_line(&mut self) -> bool {
        let reached = self.has_reached_it();
        let previous = self.last_reached.unwrap_or(reached);
        self.last_reached = Some(reached);
        !previous && reached
    }

    /// Which layline suits the turn at the current waypoint
    ///
    /// `+1` when the course bends left beyond the straight tolerance, `-1`
    /// when it bends right, `0` for a near-straight course.
    pub fn preferred(&self) -> i8 {
        let angle = turn_angle(&self.leg.previous, &self.leg.current, &self.leg.next);
        if angle < -STRAIGHT_ANGLE_THRESH_DEG {
            1
        } else if angle > STRAIGHT_ANGLE_THRESH_DEG {
            -1
        } else {
            0
        }
    }

    /// True when holding `boat_heading_deg` meets either layline within `distance_limit_m`
    pub fn is_near(&self, boat_heading_deg: f64, distance_limit_m: f64) -> bool {
        let (Some(position), Some(wind)) = (self.position, self.wind) else {
            return false;
        };
        [-1.0, 1.0].iter().any(|sign| {
            position.crosses_line(
                boat_heading_deg,
                &self.leg.current,
                self.layline_heading(*sign, &wind),
                distance_limit_m,
            )
        })
    }

    fn layline_heading(&self, sign: f64, wind: &WindReading) -> f64 {
        wind.heading_deg + sign * self.optimal_wind_angle_deg
    }

    fn has_reached_layline(&self, sign: f64, position: &GeoPoint, wind: &WindReading) -> bool {
        let layline = self.layline_heading(sign, wind);
        let boat_side = position.side_of_line_by_heading(&self.leg.current, layline);
        if boat_side == 0 {
            return true;
        }

        let beyond_heading = match self.mode {
            TackingMode::AftWind => wind.heading_deg,
            TackingMode::ForeWind => wrap_180(wind.heading_deg + 180.0),
        };
        let beyond = self.leg.current.destination(beyond_heading, REFERENCE_DISTANCE_M);
        boat_side == beyond.side_of_line_by_heading(&self.leg.current, layline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREVIOUS: GeoPoint = GeoPoint::new(-36.80957425316241, 174.7503846879399);
    const CURRENT: GeoPoint = GeoPoint::new(-36.80941173550771, 174.7506787289037);
    const NEXT_RIGHT: GeoPoint = GeoPoint::new(-36.80931387713417, 174.7510734148992);
    const NEXT_LEFT: GeoPoint = GeoPoint::new(-36.80919795404735, 174.7508714763226);
    const NEXT_CENTER: GeoPoint = GeoPoint::new(-36.80927520135823, 174.75089526315907);

    const TRACK: [GeoPoint; 6] = [
        GeoPoint::new(-36.80935130988019, 174.7505734217721),
        GeoPoint::new(-36.80938210497414, 174.7505578545596),
        GeoPoint::new(-36.80942750895278, 174.7505981072298),
        GeoPoint::new(-36.80945721061715, 174.7506313040399),
        GeoPoint::new(-36.80948720816418, 174.7507029148523),
        GeoPoint::new(-36.80945659247159, 174.7507666142914),
    ];
    const EXPECTED_REACHED: [bool; 6] = [true, true, false, false, true, true];
    const EXPECTED_CROSSED: [bool; 6] = [false, false, false, false, true, false];

    const OPTIMAL_ANGLE: f64 = 35.0;

    fn tracker(next: GeoPoint, mode: TackingMode) -> LaylineTracker {
        let leg = Leg {
            previous: PREVIOUS,
            current: CURRENT,
            next,
        };
        LaylineTracker::new(leg, mode, OPTIMAL_ANGLE)
    }

    fn run_track(mode: TackingMode, wind_heading: f64) {
        let mut ll = tracker(NEXT_RIGHT, mode);
        let wind = WindReading::new(wind_heading, 5.0);
        for (i, position) in TRACK.iter().enumerate() {
            ll.update(*position, wind);
            assert_eq!(ll.has_reached_it(), EXPECTED_REACHED[i], "{} reached at point {}", mode.as_str(), i + 1);
            assert_eq!(ll.within_lay_lines(), !EXPECTED_REACHED[i], "{} within at point {}", mode.as_str(), i + 1);
            assert_eq!(ll.has_just_crossed_lay_line(), EXPECTED_CROSSED[i], "{} crossed at point {}", mode.as_str(), i + 1);
        }
    }

    // ========== Preferred Side ==========

    #[test]
    fn test_preferred_side() {
        for mode in [TackingMode::AftWind, TackingMode::ForeWind] {
            assert_eq!(tracker(NEXT_RIGHT, mode).preferred(), -1);
            assert_eq!(tracker(NEXT_LEFT, mode).preferred(), 1);
            assert_eq!(tracker(NEXT_CENTER, mode).preferred(), 0);
        }
    }

    #[test]
    fn test_preferred_collinear_is_zero() {
        let beyond = CURRENT.destination(
            PREVIOUS.distance_heading_to(&CURRENT).heading_deg,
            40.0,
        );
        assert_eq!(tracker(beyond, TackingMode::ForeWind).preferred(), 0);
    }

    #[test]
    fn test_preferred_mirrored_turns() {
        let incoming = PREVIOUS.distance_heading_to(&CURRENT).heading_deg;
        let right = CURRENT.destination(incoming + 40.0, 30.0);
        let left = CURRENT.destination(incoming - 40.0, 30.0);
        assert_eq!(tracker(right, TackingMode::ForeWind).preferred(), -1);
        assert_eq!(tracker(left, TackingMode::ForeWind).preferred(), 1);
    }

    // ========== Reaching and Crossing ==========

    #[test]
    fn test_reference_track_aft_wind() {
        run_track(TackingMode::AftWind, 62.5);
    }

    #[test]
    fn test_reference_track_fore_wind() {
        run_track(TackingMode::ForeWind, -180.0 + 62.5);
    }

    #[test]
    fn test_no_fix_has_not_reached() {
        let mut ll = tracker(NEXT_RIGHT, TackingMode::ForeWind);
        assert!(!ll.has_reached_it());
        assert!(!ll.has_just_crossed_lay_line());
        assert!(!ll.is_near(0.0, 100.0));
    }

    #[test]
    fn test_first_call_never_signals_crossing() {
        let mut ll = tracker(NEXT_RIGHT, TackingMode::AftWind);
        ll.update(TRACK[4], WindReading::new(62.5, 5.0));
        assert!(ll.has_reached_it());
        assert!(!ll.has_just_crossed_lay_line());
    }

    #[test]
    fn test_boat_on_layline_counts_as_reached() {
        let mut ll = tracker(NEXT_RIGHT, TackingMode::ForeWind);
        ll.update(CURRENT, WindReading::new(10.0, 5.0));
        assert!(ll.has_reached_it());
    }

    // ========== Proximity ==========

    #[test]
    fn test_is_near_heading_at_waypoint() {
        let mut ll = tracker(NEXT_RIGHT, TackingMode::ForeWind);
        let wind = WindReading::new(0.0, 5.0);
        let start = CURRENT.destination(180.0, 30.0);
        ll.update(start, wind);
        // Heading straight at the mark crosses both laylines right at it
        assert!(ll.is_near(0.0, 40.0));
        assert!(!ll.is_near(0.0, 20.0));
    }

    #[test]
    fn test_reset_by_rebuild_reproduces_results() {
        let wind = WindReading::new(62.5, 5.0);
        let mut first = tracker(NEXT_RIGHT, TackingMode::AftWind);
        first.update(TRACK[0], wind);
        let a = (first.has_reached_it(), first.has_just_crossed_lay_line());
        let mut again = tracker(NEXT_RIGHT, TackingMode::AftWind);
        again.update(TRACK[0], wind);
        let b = (again.has_reached_it(), again.has_just_crossed_lay_line());
        assert_eq!(a, b);
    }
}
