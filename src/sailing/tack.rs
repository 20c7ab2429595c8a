//! Tack selection for fore-wind and aft-wind legs
//!
//! A `TackKeeper` owns the tack side for the current leg and flips it when
//! the boat leaves the navigable area, crosses a layline, or drifts too far
//! from the direct course line. Tack side and layline tracker live in one
//! `LegState` value so they are always created and discarded together.

use crate::fence::BoundaryTest;
use crate::navigation::geo::wrap_180;
use crate::navigation::{GeoPoint, WindReading};
use crate::sailing::layline::{Leg, LaylineTracker};
use crate::sailing::mode::TackingMode;

/// Side of the wind the boat sails on
///
/// The sign also names the side of the course line the tack carries the
/// boat toward: `Right` drifts right of `previous -> current`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TackSign {
    /// `-1`
    Left = -1,
    /// `+1`
    Right = 1,
}

impl TackSign {
    /// Numeric sign
    pub fn sign(&self) -> f64 {
        match self {
            TackSign::Left => -1.0,
            TackSign::Right => 1.0,
        }
    }

    /// The opposite tack
    pub fn flipped(&self) -> Self {
        match self {
            TackSign::Left => TackSign::Right,
            TackSign::Right => TackSign::Left,
        }
    }

    /// Tack for a signed side value; `0` has no tack
    pub fn from_side(side: i8) -> Option<Self> {
        match side {
            s if s > 0 => Some(TackSign::Right),
            s if s < 0 => Some(TackSign::Left),
            _ => None,
        }
    }

    /// Short name for log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            TackSign::Left => "left",
            TackSign::Right => "right",
        }
    }
}

/// Tack keeper configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TackConfig {
    /// Best sailing angle off the true wind for this mode (degrees)
    pub optimal_wind_angle_deg: f64,
    /// Lateral distance from the course line that forces a tack (meters)
    pub max_lateral_distance_m: f64,
    /// Multiplier on the lateral distance for the layline proximity check
    pub layline_reach_factor: f64,
}

/// What happened to the tack on this tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TackEvent {
    /// First tick of the leg; tack chosen
    Engaged,
    /// Boat left the navigable area; tack flipped
    BoundaryTack,
    /// Boat crossed a layline; tack flipped and held to the mark
    LaylineTack,
    /// Boat drifted too far off the course line; tack flipped
    DriftTack,
    /// Tack unchanged
    Hold,
}

impl TackEvent {
    /// True for the events that changed the tack side
    pub fn is_tack(&self) -> bool {
        matches!(
            self,
            TackEvent::BoundaryTack | TackEvent::LaylineTack | TackEvent::DriftTack
        )
    }

    /// Short name for log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            TackEvent::Engaged => "engaged",
            TackEvent::BoundaryTack => "boundary",
            TackEvent::LaylineTack => "layline",
            TackEvent::DriftTack => "drift",
            TackEvent::Hold => "hold",
        }
    }
}

/// Per-tick inputs to the tack decision
#[derive(Clone, Copy, Debug)]
pub struct TackInputs {
    /// Boat position
    pub position: GeoPoint,
    /// Boat compass heading (degrees)
    pub boat_heading_deg: f64,
    /// Absolute wind
    pub wind: WindReading,
    /// True wind angle relative to the bow (degrees)
    pub true_wind_heading_deg: f64,
}

/// Outcome of one tack decision
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TackDecision {
    /// Heading to steer relative to the bow, in (-180, 180]
    pub relative_heading_deg: f64,
    /// Tack after the decision
    pub tack: TackSign,
    /// What the decision did
    pub event: TackEvent,
}

#[derive(Clone, Copy, Debug)]
enum LegState {
    Unset,
    Active {
        tack: TackSign,
        layline: LaylineTracker,
        heading_along_layline: bool,
    },
}

/// Owns the tack side for one tacking mode
#[derive(Debug)]
pub struct TackKeeper {
    mode: TackingMode,
    config: TackConfig,
    state: LegState,
}

impl TackKeeper {
    /// Create a keeper with no active leg
    pub fn new(mode: TackingMode, config: TackConfig) -> Self {
        Self {
            mode,
            config,
            state: LegState::Unset,
        }
    }

    /// Decide the tack for this tick and return the heading to steer
    pub fn decide<B: BoundaryTest + ?Sized>(
        &mut self,
        inputs: &TackInputs,
        leg: &Leg,
        boundary: &mut B,
    ) -> TackDecision {
        let mode = self.mode;
        let config = self.config;
        let position = inputs.position;

        let (tack, event) = match self.state {
            LegState::Unset => {
                let mut layline = LaylineTracker::new(*leg, mode, config.optimal_wind_angle_deg);
                layline.update(position, inputs.wind);
                let tack = initial_tack(&layline, &position, leg);
                let heading_along_layline = layline.has_reached_it();
                self.state = LegState::Active {
                    tack,
                    layline,
                    heading_along_layline,
                };
                crate::log_info!(
                    "{} leg engaged on {} tack, along layline={}",
                    mode.as_str(),
                    tack.as_str(),
                    heading_along_layline
                );
                (tack, TackEvent::Engaged)
            }
            LegState::Active {
                tack,
                mut layline,
                mut heading_along_layline,
            } => {
                layline.update(position, inputs.wind);

                let event = if boundary.is_newly_out_of_bounds(&position) {
                    TackEvent::BoundaryTack
                } else if layline.has_just_crossed_lay_line() {
                    heading_along_layline = true;
                    TackEvent::LaylineTack
                } else if !heading_along_layline
                    && has_drifted(&layline, inputs, leg, tack, &config)
                {
                    TackEvent::DriftTack
                } else {
                    TackEvent::Hold
                };

                let tack = if event.is_tack() {
                    let flipped = tack.flipped();
                    crate::log_info!(
                        "{} tack to {} ({})",
                        mode.as_str(),
                        flipped.as_str(),
                        event.as_str()
                    );
                    flipped
                } else {
                    tack
                };

                self.state = LegState::Active {
                    tack,
                    layline,
                    heading_along_layline,
                };
                (tack, event)
            }
        };

        let relative_heading_deg = wrap_180(
            inputs.true_wind_heading_deg
                + mode.sign() * tack.sign() * config.optimal_wind_angle_deg,
        );

        TackDecision {
            relative_heading_deg,
            tack,
            event,
        }
    }

    /// Discard the tack side and layline tracker
    pub fn reset(&mut self) {
        self.state = LegState::Unset;
    }

    /// Current tack, `None` before the leg is engaged
    pub fn tack(&self) -> Option<TackSign> {
        match &self.state {
            LegState::Unset => None,
            LegState::Active { tack, .. } => Some(*tack),
        }
    }

    /// True once the boat is holding a layline to the mark
    pub fn is_heading_along_layline(&self) -> bool {
        match &self.state {
            LegState::Unset => false,
            LegState::Active {
                heading_along_layline,
                ..
            } => *heading_along_layline,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &TackConfig {
        &self.config
    }
}

/// Preferred layline if the course bends, otherwise the tack back toward the course line
fn initial_tack(layline: &LaylineTracker, position: &GeoPoint, leg: &Leg) -> TackSign {
    if let Some(tack) = TackSign::from_side(layline.preferred()) {
        return tack;
    }
    match position.side_of_line(&leg.previous, &leg.current) {
        s if s > 0 => TackSign::Left,
        _ => TackSign::Right,
    }
}

fn has_drifted(
    layline: &LaylineTracker,
    inputs: &TackInputs,
    leg: &Leg,
    tack: TackSign,
    config: &TackConfig,
) -> bool {
    let reach = config.max_lateral_distance_m * config.layline_reach_factor;
    if layline.is_near(inputs.boat_heading_deg, reach) {
        return false;
    }

    let side = inputs.position.side_of_line(&leg.previous, &leg.current);
    if TackSign::from_side(side) != Some(tack) {
        return false;
    }

    inputs.position.distance_to_line(&leg.previous, &leg.current) >= config.max_lateral_distance_m
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Boundary stub with a scripted sequence of "newly out" answers
    struct ScriptedBoundary {
        answers: Vec<bool>,
        calls: usize,
    }

    impl ScriptedBoundary {
        fn never() -> Self {
            Self {
                answers: Vec::new(),
                calls: 0,
            }
        }

        fn with(answers: &[bool]) -> Self {
            Self {
                answers: answers.to_vec(),
                calls: 0,
            }
        }
    }

    impl BoundaryTest for ScriptedBoundary {
        fn is_out_of_bounds(&self, _position: &GeoPoint) -> bool {
            false
        }

        fn is_newly_out_of_bounds(&mut self, _position: &GeoPoint) -> bool {
            let answer = self.answers.get(self.calls).copied().unwrap_or(false);
            self.calls += 1;
            answer
        }
    }

    const PREVIOUS: GeoPoint = GeoPoint::new(35.0, 139.0);

    /// Straight northbound leg, 500 m long, next mark straight on
    fn straight_leg() -> Leg {
        let current = PREVIOUS.destination(0.0, 500.0);
        Leg {
            previous: PREVIOUS,
            current,
            next: current.destination(0.0, 200.0),
        }
    }

    fn config() -> TackConfig {
        TackConfig {
            optimal_wind_angle_deg: 45.0,
            max_lateral_distance_m: 10.0,
            layline_reach_factor: 2.5,
        }
    }

    /// Wind vector pointing south (air from the north), boat beating north
    fn inputs(position: GeoPoint, boat_heading_deg: f64) -> TackInputs {
        TackInputs {
            position,
            boat_heading_deg,
            wind: WindReading::new(180.0, 5.0),
            true_wind_heading_deg: wrap_180(0.0 - boat_heading_deg),
        }
    }

    // ========== Engagement ==========

    #[test]
    fn test_first_tick_engages() {
        let leg = straight_leg();
        let mut keeper = TackKeeper::new(TackingMode::ForeWind, config());
        let start = PREVIOUS.destination(0.0, 20.0);
        let d = keeper.decide(&inputs(start, 0.0), &leg, &mut ScriptedBoundary::never());
        assert_eq!(d.event, TackEvent::Engaged);
        assert_eq!(keeper.tack(), Some(d.tack));
        assert!(!keeper.is_heading_along_layline());
    }

    #[test]
    fn test_initial_tack_heads_back_toward_course_line() {
        let leg = straight_leg();
        let right_of_line = PREVIOUS.destination(0.0, 50.0).destination(90.0, 5.0);
        let left_of_line = PREVIOUS.destination(0.0, 50.0).destination(270.0, 5.0);

        let mut keeper = TackKeeper::new(TackingMode::ForeWind, config());
        let d = keeper.decide(&inputs(right_of_line, 0.0), &leg, &mut ScriptedBoundary::never());
        assert_eq!(d.tack, TackSign::Left);

        keeper.reset();
        let d = keeper.decide(&inputs(left_of_line, 0.0), &leg, &mut ScriptedBoundary::never());
        assert_eq!(d.tack, TackSign::Right);
    }

    #[test]
    fn test_initial_tack_follows_preferred_layline() {
        let mut leg = straight_leg();
        leg.next = leg.current.destination(90.0, 200.0);
        let mut keeper = TackKeeper::new(TackingMode::ForeWind, config());
        let start = PREVIOUS.destination(0.0, 50.0).destination(270.0, 5.0);
        let d = keeper.decide(&inputs(start, 0.0), &leg, &mut ScriptedBoundary::never());
        // Course bends right at the mark
        assert_eq!(d.tack, TackSign::Left);
    }

    // ========== Tack Rules ==========

    #[test]
    fn test_boundary_violation_flips_initial_choice() {
        let leg = straight_leg();
        let start = PREVIOUS.destination(0.0, 20.0);
        let mut boundary = ScriptedBoundary::with(&[true]);
        let mut keeper = TackKeeper::new(TackingMode::ForeWind, config());

        let engaged = keeper.decide(&inputs(start, 0.0), &leg, &mut boundary);
        let next = keeper.decide(&inputs(start, 0.0), &leg, &mut boundary);
        assert_eq!(next.event, TackEvent::BoundaryTack);
        assert_eq!(next.tack, engaged.tack.flipped());
    }

    #[test]
    fn test_drift_flips_tack_when_far_on_target_side() {
        let leg = straight_leg();
        let mut keeper = TackKeeper::new(TackingMode::ForeWind, config());
        let near_line = PREVIOUS.destination(0.0, 20.0).destination(270.0, 1.0);
        let engaged = keeper.decide(&inputs(near_line, 45.0), &leg, &mut ScriptedBoundary::never());
        assert_eq!(engaged.tack, TackSign::Right);

        // Still close to the line: hold
        let close = PREVIOUS.destination(0.0, 25.0).destination(90.0, 5.0);
        let d = keeper.decide(&inputs(close, 45.0), &leg, &mut ScriptedBoundary::never());
        assert_eq!(d.event, TackEvent::Hold);

        // 15 m right of the line on a right tack, heading away from the laylines
        let far = PREVIOUS.destination(0.0, 30.0).destination(90.0, 15.0);
        let d = keeper.decide(&inputs(far, 45.0), &leg, &mut ScriptedBoundary::never());
        assert_eq!(d.event, TackEvent::DriftTack);
        assert_eq!(d.tack, TackSign::Left);
    }

    #[test]
    fn test_drift_ignored_on_wrong_side() {
        let leg = straight_leg();
        let mut keeper = TackKeeper::new(TackingMode::ForeWind, config());
        let near_line = PREVIOUS.destination(0.0, 20.0).destination(270.0, 1.0);
        keeper.decide(&inputs(near_line, 45.0), &leg, &mut ScriptedBoundary::never());

        // Far left of the line while on a right tack: the tack is already bringing it back
        let far_left = PREVIOUS.destination(0.0, 30.0).destination(270.0, 15.0);
        let d = keeper.decide(&inputs(far_left, 45.0), &leg, &mut ScriptedBoundary::never());
        assert_eq!(d.event, TackEvent::Hold);
    }

    #[test]
    fn test_layline_crossing_holds_layline_and_suppresses_drift() {
        let leg = straight_leg();
        let mut keeper = TackKeeper::new(TackingMode::ForeWind, config());
        let mut boundary = ScriptedBoundary::never();

        // Between the laylines, close to the mark
        let inside = leg.current.destination(180.0, 100.0);
        keeper.decide(&inputs(inside, 45.0), &leg, &mut boundary);
        // Seeds the crossing detector
        keeper.decide(&inputs(inside, 45.0), &leg, &mut boundary);

        // Beyond the right layline (200 m east at the latitude 100 m short of the mark)
        let beyond = leg.current.destination(180.0, 100.0).destination(90.0, 200.0);
        let d = keeper.decide(&inputs(beyond, 315.0), &leg, &mut boundary);
        assert_eq!(d.event, TackEvent::LaylineTack);
        assert!(keeper.is_heading_along_layline());

        // Far off the course line on the target side, still no drift tack
        let tack = d.tack;
        let offset = if tack == TackSign::Right { 90.0 } else { 270.0 };
        let far = leg.current.destination(180.0, 60.0).destination(offset, 150.0);
        let d = keeper.decide(&inputs(far, 0.0), &leg, &mut boundary);
        assert_ne!(d.event, TackEvent::DriftTack);
    }

    // ========== Relative Heading ==========

    #[test]
    fn test_relative_heading_sign_convention() {
        let leg = straight_leg();
        let start = PREVIOUS.destination(0.0, 50.0).destination(270.0, 5.0);

        let mut fore = TackKeeper::new(TackingMode::ForeWind, config());
        let d = fore.decide(&inputs(start, 0.0), &leg, &mut ScriptedBoundary::never());
        assert_eq!(d.tack, TackSign::Right);
        // Air from dead ahead; right tack beats at +45
        assert!((d.relative_heading_deg - 45.0).abs() < 1e-9);

        let aft_config = TackConfig {
            optimal_wind_angle_deg: 150.0,
            ..config()
        };
        let mut aft = TackKeeper::new(TackingMode::AftWind, aft_config);
        let running = TackInputs {
            true_wind_heading_deg: 180.0,
            ..inputs(start, 0.0)
        };
        let d = aft.decide(&running, &leg, &mut ScriptedBoundary::never());
        assert_eq!(d.tack, TackSign::Right);
        // Air from astern; right tack runs at 180 - 150 = +30
        assert!((d.relative_heading_deg - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_reproduces_first_decision() {
        let leg = straight_leg();
        let start = PREVIOUS.destination(0.0, 40.0).destination(90.0, 3.0);
        let mut keeper = TackKeeper::new(TackingMode::ForeWind, config());

        let first = keeper.decide(&inputs(start, 10.0), &leg, &mut ScriptedBoundary::never());
        keeper.decide(&inputs(start, 10.0), &leg, &mut ScriptedBoundary::with(&[true]));
        keeper.reset();
        assert_eq!(keeper.tack(), None);

        let again = keeper.decide(&inputs(start, 10.0), &leg, &mut ScriptedBoundary::never());
        assert_eq!(first, again);
    }
}
