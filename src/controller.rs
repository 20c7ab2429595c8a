//! Sailing Controller
//!
//! Runs the sailing decision pipeline once per control tick.
//!
//! # Tick Order
//!
//! 1. Replace missing or implausible sensor samples with the last good ones
//! 2. Advance the race clock; skip until GPS and wind have each reported once
//! 3. Filter the GPS-derived velocity (a rejected sample skips the tick)
//! 4. On waypoint arrival: project the finish, advance or cut to the
//!    finishing mark, and reset every per-leg state at once
//! 5. Classify the point of sail
//! 6. Fore/aft wind: ask the matching tack keeper for a heading.
//!    Side wind: steer straight at the waypoint
//! 7. Map the heading to a rudder command and the true wind to a sail trim
//!
//! # Ownership
//!
//! The controller owns every piece of cross-tick state. Sensor holds are
//! owned by the caller so several vehicles can run side by side.

use crate::error::ControlError;
use crate::fence::{BoundaryTest, PolygonFence};
use crate::mission::{RouteManager, RouteState, WaypointManager};
use crate::navigation::geo::wrap_180;
use crate::navigation::{GeoPoint, SensorHold, VelocityEstimate, WindReading};
use crate::parameters::SailingParams;
use crate::polar::{PolarData, PolarTable};
use crate::sailing::{
    Helm, Leg, SailingMode, SailingModeClassifier, TackEvent, TackInputs, TackKeeper,
    TackingMode, TimeProjector, VelocityFilter, VelocityUpdate,
};
use crate::telemetry::{NullTelemetry, TelemetrySink, TrailMarker};

/// Race description handed to [`DefaultController::init`]
#[derive(Clone, Copy, Debug)]
pub struct RaceConfig<'a> {
    /// Start followed by every mark, finish last
    pub waypoints: &'a [GeoPoint],
    /// Navigable-area polygon; empty for an unbounded course
    pub boundary: &'a [GeoPoint],
    /// Race time limit in seconds, `None` for no limit
    pub time_limit_s: Option<f64>,
}

/// Raw sensor samples for one tick
///
/// `None` means the sensor produced nothing this tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct SensorState {
    /// Position fix
    pub gps: Option<GeoPoint>,
    /// Absolute wind; the heading is the compass heading of the wind vector
    pub wind: Option<WindReading>,
    /// True wind; the heading is the angle off the bow the wind comes from
    pub true_wind: Option<WindReading>,
    /// Boat compass heading (degrees)
    pub heading_deg: f64,
    /// Time since the previous tick (milliseconds)
    pub dt_ms: u32,
}

/// Actuator commands for one tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HelmCommand {
    /// Rudder command in [-1, 1], positive to starboard
    pub rudder: f64,
    /// Sail trim command from the polar table
    pub sail: f64,
    /// Point of sail used for the decision
    pub mode: SailingMode,
    /// Heading steered relative to the bow (degrees)
    pub relative_heading_deg: f64,
    /// Accepted velocity estimate
    pub velocity: VelocityEstimate,
}

/// Why a tick produced no command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// No plausible GPS fix or wind sample has arrived yet
    NoFix,
    /// Velocity sample looked like a GPS jump
    VelocityRejected,
    /// Wind geometry gave no usable angle and no previous mode exists
    DegenerateWind,
}

impl SkipReason {
    /// Short name for log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NoFix => "no fix",
            SkipReason::VelocityRejected => "velocity rejected",
            SkipReason::DegenerateWind => "degenerate wind",
        }
    }
}

/// Outcome of one control tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutput {
    /// Apply these commands
    Command(HelmCommand),
    /// Keep the previous actuator commands
    Skip(SkipReason),
    /// The route is complete
    Finished,
}

/// Per-vehicle sailing controller
pub struct SailingController<W, B, P, T>
where
    W: WaypointManager,
    B: BoundaryTest,
    P: PolarTable,
    T: TelemetrySink,
{
    route: W,
    boundary: B,
    polar: P,
    telemetry: T,
    velocity: VelocityFilter,
    classifier: SailingModeClassifier,
    fore: TackKeeper,
    aft: TackKeeper,
    helm: Helm,
    clock: TimeProjector,
}

/// Controller built from the bundled collaborators
pub type DefaultController = SailingController<RouteManager, PolygonFence, PolarData, NullTelemetry>;

impl DefaultController {
    /// Build a controller for a race with the default polar and no telemetry
    pub fn init(config: &RaceConfig<'_>, params: SailingParams) -> Result<Self, ControlError> {
        Self::for_race(config, params, NullTelemetry)
    }
}

impl<T: TelemetrySink> SailingController<RouteManager, PolygonFence, PolarData, T> {
    /// Build a controller for a race, reporting to `telemetry`
    pub fn for_race(
        config: &RaceConfig<'_>,
        params: SailingParams,
        telemetry: T,
    ) -> Result<Self, ControlError> {
        let route = RouteManager::new(config.waypoints, params.wp_radius as f64)?;
        let boundary = PolygonFence::new(config.boundary)?;
        Ok(Self::new(
            params,
            route,
            boundary,
            PolarData::default(),
            telemetry,
            config.time_limit_s,
        ))
    }
}

impl<W, B, P, T> SailingController<W, B, P, T>
where
    W: WaypointManager,
    B: BoundaryTest,
    P: PolarTable,
    T: TelemetrySink,
{
    /// Create a controller from explicit collaborators
    pub fn new(
        params: SailingParams,
        route: W,
        boundary: B,
        polar: P,
        telemetry: T,
        time_limit_s: Option<f64>,
    ) -> Self {
        if !params.is_valid() {
            crate::log_warn!("Sailing parameters out of range, derived settings may fall back");
        }

        let fore = TackKeeper::new(
            TackingMode::ForeWind,
            params.tack_config(TackingMode::ForeWind, polar.optimal_fore_wind_angle()),
        );
        let aft = TackKeeper::new(
            TackingMode::AftWind,
            params.tack_config(TackingMode::AftWind, polar.optimal_aft_wind_angle()),
        );

        crate::log_info!(
            "Sailing controller ready: fore angle={} aft angle={} time limit={}",
            polar.optimal_fore_wind_angle(),
            polar.optimal_aft_wind_angle(),
            time_limit_s.unwrap_or(-1.0)
        );

        Self {
            route,
            boundary,
            polar,
            telemetry,
            velocity: VelocityFilter::new(params.velocity_config()),
            classifier: SailingModeClassifier::new(params.mode_thresholds()),
            fore,
            aft,
            helm: Helm::new(params.helm_config()),
            clock: TimeProjector::new(time_limit_s, params.race_buffer_dist as f64),
        }
    }

    /// Run one control tick
    pub fn tick(
        &mut self,
        sensors: &SensorState,
        hold: &mut SensorHold,
    ) -> Result<TickOutput, ControlError> {
        let position = hold.gps.check(sensors.gps);
        let wind = hold.wind.check(sensors.wind);
        let true_wind = hold.true_wind.check(sensors.true_wind);

        self.clock.inc_time(sensors.dt_ms);

        if self.route.state().complete {
            return Ok(TickOutput::Finished);
        }

        let (Some(position), Some(wind), Some(true_wind)) = (position, wind, true_wind) else {
            crate::log_debug!("Waiting for first GPS and wind samples");
            return Ok(TickOutput::Skip(SkipReason::NoFix));
        };

        let velocity = match self.velocity.update(position, sensors.dt_ms) {
            VelocityUpdate::Accepted(v) => v,
            VelocityUpdate::Rejected => {
                return Ok(TickOutput::Skip(SkipReason::VelocityRejected));
            }
        };

        let mut status = self
            .route
            .status(&position)
            .ok_or_else(no_current_waypoint)?;
        if status.achieved {
            if !self.on_waypoint_reached(&position)? {
                return Ok(TickOutput::Finished);
            }
            status = self
                .route
                .status(&position)
                .ok_or_else(no_current_waypoint)?;
        }

        let Some(mode) = self.classifier.classify(status.heading_deg, wind.heading_deg) else {
            crate::log_warn!("No sailing mode yet, skipping tick");
            return Ok(TickOutput::Skip(SkipReason::DegenerateWind));
        };

        let relative_heading_deg = match mode.tacking() {
            Some(tacking) => {
                let inputs = TackInputs {
                    position,
                    boat_heading_deg: sensors.heading_deg,
                    wind,
                    true_wind_heading_deg: true_wind.heading_deg,
                };
                self.steer_tacking(tacking, &inputs)?
            }
            None => wrap_180(status.heading_deg - sensors.heading_deg),
        };
        self.telemetry
            .draw_trail(&position, TrailMarker::Sailing(mode));

        Ok(TickOutput::Command(HelmCommand {
            rudder: self.helm.rudder(relative_heading_deg),
            sail: self.helm.sail(&self.polar, true_wind.heading_deg),
            mode,
            relative_heading_deg,
            velocity,
        }))
    }

    /// Shut the controller down and hand back the telemetry sink
    pub fn close(self) -> T {
        crate::log_info!(
            "Sailing controller closed after {} s, {} waypoints",
            self.clock.elapsed_s(),
            self.clock.waypoint_count()
        );
        self.telemetry
    }

    /// Progress through the route
    pub fn route_state(&self) -> RouteState {
        self.route.state()
    }

    /// Waypoint manager in use
    pub fn route(&self) -> &W {
        &self.route
    }

    /// Point of sail from the last classification
    pub fn mode(&self) -> Option<SailingMode> {
        self.classifier.last_mode()
    }

    /// Tack keeper for a tacking mode
    pub fn keeper(&self, mode: TackingMode) -> &TackKeeper {
        match mode {
            TackingMode::ForeWind => &self.fore,
            TackingMode::AftWind => &self.aft,
        }
    }

    /// Seconds on the race clock
    pub fn elapsed_s(&self) -> f64 {
        self.clock.elapsed_s()
    }

    /// Telemetry sink in use
    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    /// Move on from the mark just reached
    ///
    /// Returns false once the route is complete.
    fn on_waypoint_reached(&mut self, position: &GeoPoint) -> Result<bool, ControlError> {
        let reached = self
            .route
            .current()
            .ok_or_else(no_current_waypoint)?;
        let state = self.route.state();
        let final_index = state.count.saturating_sub(1);

        let cut = self.clock.head_to_finish(&reached.progress());
        let next = if cut && state.index + 1 < final_index {
            crate::log_info!(
                "Behind schedule at waypoint {}, cutting to the finish",
                reached.seq
            );
            self.route.goto_nth(final_index, position)
        } else {
            self.route.advance(position)
        };

        self.reset_leg();

        match next {
            Some(waypoint) => {
                crate::log_info!(
                    "Waypoint {} reached, sailing to waypoint {}",
                    reached.seq,
                    waypoint.seq
                );
                Ok(true)
            }
            None => {
                crate::log_info!("Finish reached after {} s", self.clock.elapsed_s());
                Ok(false)
            }
        }
    }

    fn reset_leg(&mut self) {
        self.fore.reset();
        self.aft.reset();
        self.classifier.reset();
    }

    fn steer_tacking(
        &mut self,
        mode: TackingMode,
        inputs: &TackInputs,
    ) -> Result<f64, ControlError> {
        let current = self
            .route
            .current()
            .ok_or_else(no_current_waypoint)?;
        let previous = self
            .route
            .previous()
            .ok_or_else(no_previous_waypoint)?;
        let next = self.route.upcoming().unwrap_or(current);
        let leg = Leg {
            previous: previous.point,
            current: current.point,
            next: next.point,
        };

        let keeper = match mode {
            TackingMode::ForeWind => &mut self.fore,
            TackingMode::AftWind => &mut self.aft,
        };
        let decision = keeper.decide(inputs, &leg, &mut self.boundary);

        if decision.event == TackEvent::Engaged {
            self.telemetry.draw_layline(
                &leg.current,
                inputs.wind.heading_deg,
                keeper.config().optimal_wind_angle_deg,
            );
        }
        if let Some(marker) = TrailMarker::from_event(decision.event) {
            self.telemetry.draw_trail(&inputs.position, marker);
        }

        Ok(decision.relative_heading_deg)
    }
}

fn no_current_waypoint() -> ControlError {
    crate::log_error!("Waypoint manager returned no current waypoint");
    ControlError::NoCurrentWaypoint
}

fn no_previous_waypoint() -> ControlError {
    crate::log_error!("Waypoint manager returned no previous waypoint on a tacking leg");
    ControlError::NoPreviousWaypoint
}
