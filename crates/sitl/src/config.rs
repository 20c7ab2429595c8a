//! Race description files.
//!
//! A race file is JSON. Angles are degrees, distances meters, times
//! milliseconds unless the field name says otherwise:
//!
//! ```json
//! {
//!   "name": "windward-leeward",
//!   "waypoints": [{ "lat": 35.0, "lon": 139.0 }, { "lat": 35.0018, "lon": 139.0 }],
//!   "boundary": [],
//!   "time_limit_s": null,
//!   "wind": { "heading_deg": 180.0, "speed_mps": 5.0 },
//!   "start_heading_deg": 45.0,
//!   "sim": { "dt_ms": 1000, "max_steps": 2000, "gps_noise_m": 0.5, "seed": 7 },
//!   "params": { "TACK_FORE_DIST": 20.0 }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use sailnav::parameters::{ParamValue, ParameterStore};
use sailnav::{GeoPoint, SailingParams, WindReading};
use serde::{Deserialize, Serialize};

use crate::error::SimulatorError;

/// Geographic position as written in race files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl From<LatLon> for GeoPoint {
    fn from(p: LatLon) -> Self {
        GeoPoint::new(p.lat, p.lon)
    }
}

impl From<GeoPoint> for LatLon {
    fn from(p: GeoPoint) -> Self {
        LatLon {
            lat: p.latitude,
            lon: p.longitude,
        }
    }
}

/// Steady wind over the course.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindConfig {
    /// Compass heading the air moves toward (degrees).
    pub heading_deg: f64,
    /// Wind speed in m/s.
    pub speed_mps: f64,
}

/// Simulation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Control tick period in milliseconds.
    pub dt_ms: u32,
    /// Ticks before the race is abandoned.
    pub max_steps: u32,
    /// GPS position noise standard deviation in meters.
    pub gps_noise_m: f64,
    /// Boat turn rate at full rudder in degrees per second.
    pub max_turn_rate_dps: f64,
    /// RNG seed for deterministic mode. None = random.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt_ms: 1000,
            max_steps: 5000,
            gps_noise_m: 0.5,
            max_turn_rate_dps: 30.0,
            seed: None,
        }
    }
}

/// Race file contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceFile {
    #[serde(default)]
    pub name: String,
    pub waypoints: Vec<LatLon>,
    #[serde(default)]
    pub boundary: Vec<LatLon>,
    #[serde(default)]
    pub time_limit_s: Option<f64>,
    pub wind: WindConfig,
    #[serde(default)]
    pub start_heading_deg: f64,
    #[serde(default)]
    pub sim: SimConfig,
    /// Parameter overrides by store name.
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
}

/// Validated race ready to run.
#[derive(Debug, Clone)]
pub struct Race {
    pub name: String,
    pub waypoints: Vec<GeoPoint>,
    pub boundary: Vec<GeoPoint>,
    pub time_limit_s: Option<f64>,
    pub wind: WindReading,
    pub start_heading_deg: f64,
    pub sim: SimConfig,
    pub params: SailingParams,
}

impl RaceFile {
    /// Read a race file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimulatorError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse a race file from a JSON string.
    pub fn from_json(text: &str) -> Result<Self, SimulatorError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Check the simulation settings and apply parameter overrides.
    ///
    /// Route and boundary geometry are checked by the controller itself.
    pub fn validate(&self) -> Result<Race, SimulatorError> {
        if self.sim.dt_ms == 0 {
            return Err(SimulatorError::InvalidRace("dt_ms must be positive".into()));
        }
        if self.sim.max_steps == 0 {
            return Err(SimulatorError::InvalidRace("max_steps must be positive".into()));
        }
        if self.sim.gps_noise_m.is_nan() || self.sim.gps_noise_m < 0.0 {
            return Err(SimulatorError::InvalidRace(
                "gps_noise_m must be non-negative".into(),
            ));
        }
        if !self.wind.heading_deg.is_finite() || self.wind.speed_mps.is_nan() || self.wind.speed_mps <= 0.0 {
            return Err(SimulatorError::InvalidRace(format!(
                "wind {:?} is not a usable steady wind",
                self.wind
            )));
        }
        if let Some(limit) = self.time_limit_s {
            if limit.is_nan() || limit <= 0.0 {
                return Err(SimulatorError::InvalidRace(
                    "time_limit_s must be positive".into(),
                ));
            }
        }

        Ok(Race {
            name: self.name.clone(),
            waypoints: self.waypoints.iter().map(|&p| p.into()).collect(),
            boundary: self.boundary.iter().map(|&p| p.into()).collect(),
            time_limit_s: self.time_limit_s,
            wind: WindReading::new(self.wind.heading_deg, self.wind.speed_mps),
            start_heading_deg: self.start_heading_deg,
            sim: self.sim,
            params: self.sailing_params()?,
        })
    }

    fn sailing_params(&self) -> Result<SailingParams, SimulatorError> {
        let mut store = ParameterStore::new();
        SailingParams::register_defaults(&mut store).map_err(sailnav::ControlError::from)?;

        for (name, &value) in &self.params {
            let current = store
                .get(name)
                .copied()
                .ok_or_else(|| SimulatorError::UnknownParameter(name.clone()))?;
            let value = match current {
                ParamValue::Bool(_) => ParamValue::Bool(value != 0.0),
                ParamValue::Int(_) => ParamValue::Int(value as i32),
                ParamValue::Float(_) => ParamValue::Float(value as f32),
            };
            store
                .set(name, value)
                .map_err(sailnav::ControlError::from)?;
        }

        let params = SailingParams::from_store(&store);
        if !params.is_valid() {
            println!("[WARN] Race '{}' parameters are inconsistent", self.name);
        }
        Ok(params)
    }
}
