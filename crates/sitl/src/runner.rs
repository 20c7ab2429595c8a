//! Closed-loop race runner.
//!
//! Each step the boat produces sensor samples, the controller ticks, and the
//! resulting rudder command is integrated by the boat model. A skipped tick
//! keeps the previous rudder.

use sailnav::controller::{RaceConfig, SailingController, TickOutput};
use sailnav::fence::PolygonFence;
use sailnav::mission::{RouteManager, RouteState};
use sailnav::polar::PolarData;
use sailnav::telemetry::{TelemetrySink, TrailMarker};
use sailnav::{GeoPoint, SailingMode, SensorHold};

use crate::boat::BoatModel;
use crate::config::Race;
use crate::error::SimulatorError;

/// Telemetry sink that keeps the trail and counts tacks.
#[derive(Debug, Default, Clone)]
pub struct TrailRecorder {
    trail: Vec<(GeoPoint, TrailMarker)>,
    laylines: usize,
}

impl TrailRecorder {
    /// Every recorded trail point.
    pub fn trail(&self) -> &[(GeoPoint, TrailMarker)] {
        &self.trail
    }

    /// Number of markers equal to `marker`.
    pub fn count(&self, marker: TrailMarker) -> usize {
        self.trail.iter().filter(|(_, m)| *m == marker).count()
    }

    /// Number of tack changes of any kind.
    pub fn tacks(&self) -> usize {
        self.trail.iter().filter(|(_, m)| m.is_tack()).count()
    }

    /// Number of layline pairs drawn.
    pub fn laylines(&self) -> usize {
        self.laylines
    }
}

impl TelemetrySink for TrailRecorder {
    fn draw_trail(&mut self, position: &GeoPoint, marker: TrailMarker) {
        self.trail.push((*position, marker));
    }

    fn draw_layline(&mut self, _through: &GeoPoint, _wind_heading_deg: f64, _optimal_angle_deg: f64) {
        self.laylines += 1;
    }
}

/// Outcome of a simulated race.
#[derive(Debug, Clone, PartialEq)]
pub struct RaceSummary {
    /// Control ticks executed.
    pub steps: u32,
    /// Ticks that produced no command.
    pub skipped: u32,
    /// The route was completed.
    pub finished: bool,
    /// Race clock at the end (seconds).
    pub elapsed_s: f64,
    /// Marks rounded, the finish included.
    pub waypoints_reached: u32,
    /// Tack changes of any kind.
    pub tacks: u32,
    /// Tack changes forced by the boundary.
    pub boundary_tacks: u32,
    /// Ticks spent in each mode: fore, side, aft.
    pub mode_ticks: [u32; 3],
}

type SimController = SailingController<RouteManager, PolygonFence, PolarData, TrailRecorder>;

/// Runs one race to completion or until the step limit is spent.
pub struct RaceRunner {
    race: Race,
    controller: SimController,
    boat: BoatModel,
    hold: SensorHold,
}

impl RaceRunner {
    /// Build the controller and the boat for a race.
    pub fn new(race: Race) -> Result<Self, SimulatorError> {
        let config = RaceConfig {
            waypoints: &race.waypoints,
            boundary: &race.boundary,
            time_limit_s: race.time_limit_s,
        };
        let controller =
            SimController::for_race(&config, race.params.clone(), TrailRecorder::default())?;

        let start = race
            .waypoints
            .first()
            .copied()
            .ok_or_else(|| SimulatorError::InvalidRace("race has no start".into()))?;
        let boat = BoatModel::new(
            start,
            race.start_heading_deg,
            race.wind,
            race.sim.max_turn_rate_dps,
            race.sim.gps_noise_m,
            race.sim.seed,
        );

        Ok(Self {
            race,
            controller,
            boat,
            hold: SensorHold::new(),
        })
    }

    /// Sail the race.
    pub fn run(mut self) -> Result<RaceSummary, SimulatorError> {
        let dt_ms = self.race.sim.dt_ms;
        let dt_s = dt_ms as f64 / 1000.0;

        let mut steps = 0;
        let mut skipped = 0;
        let mut finished = false;
        let mut waypoints_reached = 0;
        let mut mode_ticks = [0u32; 3];
        let mut rudder = 0.0;
        let mut route = self.controller.route_state();

        while steps < self.race.sim.max_steps {
            steps += 1;
            let sensors = self.boat.sense(dt_ms);
            let output = self.controller.tick(&sensors, &mut self.hold)?;

            let now = self.controller.route_state();
            if reached_mark(&route, &now) {
                waypoints_reached += 1;
            }
            route = now;

            match output {
                TickOutput::Finished => {
                    finished = true;
                    break;
                }
                TickOutput::Skip(_) => skipped += 1,
                TickOutput::Command(cmd) => {
                    rudder = cmd.rudder;
                    mode_ticks[mode_index(cmd.mode)] += 1;
                }
            }
            self.boat.step(rudder, dt_s);
        }

        let elapsed_s = self.controller.elapsed_s();
        let trail = self.controller.close();
        let summary = RaceSummary {
            steps,
            skipped,
            finished,
            elapsed_s,
            waypoints_reached,
            tacks: trail.tacks() as u32,
            boundary_tacks: trail.count(TrailMarker::BoundaryTack) as u32,
            mode_ticks,
        };

        println!(
            "[INFO] Race '{}': finished={} steps={} elapsed={:.0}s marks={} tacks={}",
            self.race.name,
            summary.finished,
            summary.steps,
            summary.elapsed_s,
            summary.waypoints_reached,
            summary.tacks
        );
        Ok(summary)
    }
}

fn reached_mark(before: &RouteState, after: &RouteState) -> bool {
    after.index != before.index || (after.complete && !before.complete)
}

fn mode_index(mode: SailingMode) -> usize {
    match mode {
        SailingMode::ForeWind => 0,
        SailingMode::SideWind => 1,
        SailingMode::AftWind => 2,
    }
}
