//! Sailing Controller Parameter Definitions
//!
//! Maps every tuning constant of the sailing controller to a parameter
//! store entry.
//!
//! # Parameters
//!
//! - `VEL_MIN_OK` - Speed below which a velocity sample is always accepted (m/s)
//! - `VEL_MAX_ACC` - Maximum plausible acceleration (m/s^2)
//! - `VEL_MAX_IGN` - Consecutive rejections before a sample is force-accepted
//! - `SAIL_SIDE_THR` - Side-wind threshold (deg)
//! - `SAIL_AFT_THR` - Aft-wind threshold (deg)
//! - `SAIL_HYST` - Hysteresis band around both thresholds (deg)
//! - `TACK_FORE_DIST` - Max lateral distance from the course line, fore-wind (m)
//! - `TACK_AFT_DIST` - Max lateral distance from the course line, aft-wind (m)
//! - `TACK_LL_FACT` - Layline reach factor applied to the lateral distance
//! - `RUDR_LOW` - Turn-rate scalar for small heading errors
//! - `RUDR_HIGH` - Turn-rate scalar for large heading errors
//! - `RUDR_THR` - Heading error where the high scalar takes over (deg)
//! - `WP_RADIUS` - Waypoint acceptance radius (m)
//! - `RACE_BUF_DIST` - Distance buffer added to the finish projection (m)

use super::error::ParameterError;
use super::storage::{ParamValue, ParameterStore};
use crate::sailing::helm::HelmConfig;
use crate::sailing::mode::{ModeThresholds, TackingMode};
use crate::sailing::tack::TackConfig;
use crate::sailing::velocity::VelocityFilterConfig;

// --- Defaults ---

const DEFAULT_VEL_MIN_OK: f32 = 0.5;
const DEFAULT_VEL_MAX_ACCEL: f32 = 2.0;
const DEFAULT_VEL_MAX_IGNORES: i32 = 5;
const DEFAULT_SIDE_WIND_THRESH: f32 = 60.0;
const DEFAULT_AFT_WIND_THRESH: f32 = 120.0;
const DEFAULT_CHANGE_ANGLE_THRESH: f32 = 15.0;
const DEFAULT_TACK_FORE_DIST: f32 = 10.0;
const DEFAULT_TACK_AFT_DIST: f32 = 10.0;
const DEFAULT_LAYLINE_REACH_FACTOR: f32 = 2.5;
const DEFAULT_RUDDER_LOW: f32 = 1.2;
const DEFAULT_RUDDER_HIGH: f32 = 2.0;
const DEFAULT_RUDDER_SWITCH_ANGLE: f32 = 45.0;
const DEFAULT_WP_RADIUS: f32 = 5.0;
const DEFAULT_RACE_BUFFER_DIST: f32 = 50.0;

// --- Ranges ---

const MIN_VEL_MIN_OK: f32 = 0.0;
const MAX_VEL_MIN_OK: f32 = 10.0;

const MIN_VEL_MAX_ACCEL: f32 = 0.1;
const MAX_VEL_MAX_ACCEL: f32 = 50.0;

const MIN_VEL_MAX_IGNORES: i32 = 0;
const MAX_VEL_MAX_IGNORES: i32 = 100;

const MIN_ANGLE: f32 = 0.0;
const MAX_ANGLE: f32 = 180.0;

const MIN_HYSTERESIS: f32 = 0.0;
const MAX_HYSTERESIS: f32 = 45.0;

const MIN_TACK_DIST: f32 = 1.0;
const MAX_TACK_DIST: f32 = 500.0;

const MIN_FACTOR: f32 = 0.0;
const MAX_FACTOR: f32 = 10.0;

const MIN_WP_RADIUS: f32 = 0.5;
const MAX_WP_RADIUS: f32 = 100.0;

const MIN_RACE_BUFFER: f32 = 0.0;
const MAX_RACE_BUFFER: f32 = 1000.0;

/// Sailing controller parameters loaded from parameter store
#[derive(Debug, Clone)]
pub struct SailingParams {
    /// Speed below which a velocity sample is always accepted (m/s)
    pub vel_min_ok: f32,
    /// Maximum plausible acceleration (m/s^2)
    pub vel_max_accel: f32,
    /// Consecutive rejections before a sample is force-accepted
    pub vel_max_ignores: u32,
    /// Side-wind threshold (degrees)
    pub side_wind_thresh: f32,
    /// Aft-wind threshold (degrees)
    pub aft_wind_thresh: f32,
    /// Hysteresis band around both thresholds (degrees)
    pub change_angle_thresh: f32,
    /// Max lateral distance from the course line when beating (meters)
    pub tack_fore_dist: f32,
    /// Max lateral distance from the course line when running (meters)
    pub tack_aft_dist: f32,
    /// Multiplier on the lateral distance for the layline proximity check
    pub layline_reach_factor: f32,
    /// Turn-rate scalar for small heading errors
    pub rudder_low: f32,
    /// Turn-rate scalar for large heading errors
    pub rudder_high: f32,
    /// Heading error where the high scalar takes over (degrees)
    pub rudder_switch_angle: f32,
    /// Waypoint acceptance radius (meters)
    pub wp_radius: f32,
    /// Distance buffer added to the finish projection (meters)
    pub race_buffer_dist: f32,
}

impl Default for SailingParams {
    fn default() -> Self {
        Self {
            vel_min_ok: DEFAULT_VEL_MIN_OK,
            vel_max_accel: DEFAULT_VEL_MAX_ACCEL,
            vel_max_ignores: DEFAULT_VEL_MAX_IGNORES as u32,
            side_wind_thresh: DEFAULT_SIDE_WIND_THRESH,
            aft_wind_thresh: DEFAULT_AFT_WIND_THRESH,
            change_angle_thresh: DEFAULT_CHANGE_ANGLE_THRESH,
            tack_fore_dist: DEFAULT_TACK_FORE_DIST,
            tack_aft_dist: DEFAULT_TACK_AFT_DIST,
            layline_reach_factor: DEFAULT_LAYLINE_REACH_FACTOR,
            rudder_low: DEFAULT_RUDDER_LOW,
            rudder_high: DEFAULT_RUDDER_HIGH,
            rudder_switch_angle: DEFAULT_RUDDER_SWITCH_ANGLE,
            wp_radius: DEFAULT_WP_RADIUS,
            race_buffer_dist: DEFAULT_RACE_BUFFER_DIST,
        }
    }
}

impl SailingParams {
    /// Register sailing parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        let floats = [
            ("VEL_MIN_OK", DEFAULT_VEL_MIN_OK),
            ("VEL_MAX_ACC", DEFAULT_VEL_MAX_ACCEL),
            ("SAIL_SIDE_THR", DEFAULT_SIDE_WIND_THRESH),
            ("SAIL_AFT_THR", DEFAULT_AFT_WIND_THRESH),
            ("SAIL_HYST", DEFAULT_CHANGE_ANGLE_THRESH),
            ("TACK_FORE_DIST", DEFAULT_TACK_FORE_DIST),
            ("TACK_AFT_DIST", DEFAULT_TACK_AFT_DIST),
            ("TACK_LL_FACT", DEFAULT_LAYLINE_REACH_FACTOR),
            ("RUDR_LOW", DEFAULT_RUDDER_LOW),
            ("RUDR_HIGH", DEFAULT_RUDDER_HIGH),
            ("RUDR_THR", DEFAULT_RUDDER_SWITCH_ANGLE),
            ("WP_RADIUS", DEFAULT_WP_RADIUS),
            ("RACE_BUF_DIST", DEFAULT_RACE_BUFFER_DIST),
        ];
        for (name, value) in floats {
            store.register(name, ParamValue::Float(value))?;
        }

        store.register("VEL_MAX_IGN", ParamValue::Int(DEFAULT_VEL_MAX_IGNORES))?;

        Ok(())
    }

    /// Load sailing parameters from parameter store
    ///
    /// Values outside their documented range are clamped.
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            vel_min_ok: load_float(
                store,
                "VEL_MIN_OK",
                DEFAULT_VEL_MIN_OK,
                MIN_VEL_MIN_OK,
                MAX_VEL_MIN_OK,
            ),
            vel_max_accel: load_float(
                store,
                "VEL_MAX_ACC",
                DEFAULT_VEL_MAX_ACCEL,
                MIN_VEL_MAX_ACCEL,
                MAX_VEL_MAX_ACCEL,
            ),
            vel_max_ignores: load_int(
                store,
                "VEL_MAX_IGN",
                DEFAULT_VEL_MAX_IGNORES,
                MIN_VEL_MAX_IGNORES,
                MAX_VEL_MAX_IGNORES,
            ) as u32,
            side_wind_thresh: load_float(
                store,
                "SAIL_SIDE_THR",
                DEFAULT_SIDE_WIND_THRESH,
                MIN_ANGLE,
                MAX_ANGLE,
            ),
            aft_wind_thresh: load_float(
                store,
                "SAIL_AFT_THR",
                DEFAULT_AFT_WIND_THRESH,
                MIN_ANGLE,
                MAX_ANGLE,
            ),
            change_angle_thresh: load_float(
                store,
                "SAIL_HYST",
                DEFAULT_CHANGE_ANGLE_THRESH,
                MIN_HYSTERESIS,
                MAX_HYSTERESIS,
            ),
            tack_fore_dist: load_float(
                store,
                "TACK_FORE_DIST",
                DEFAULT_TACK_FORE_DIST,
                MIN_TACK_DIST,
                MAX_TACK_DIST,
            ),
            tack_aft_dist: load_float(
                store,
                "TACK_AFT_DIST",
                DEFAULT_TACK_AFT_DIST,
                MIN_TACK_DIST,
                MAX_TACK_DIST,
            ),
            layline_reach_factor: load_float(
                store,
                "TACK_LL_FACT",
                DEFAULT_LAYLINE_REACH_FACTOR,
                MIN_FACTOR,
                MAX_FACTOR,
            ),
            rudder_low: load_float(
                store,
                "RUDR_LOW",
                DEFAULT_RUDDER_LOW,
                MIN_FACTOR,
                MAX_FACTOR,
            ),
            rudder_high: load_float(
                store,
                "RUDR_HIGH",
                DEFAULT_RUDDER_HIGH,
                MIN_FACTOR,
                MAX_FACTOR,
            ),
            rudder_switch_angle: load_float(
                store,
                "RUDR_THR",
                DEFAULT_RUDDER_SWITCH_ANGLE,
                MIN_ANGLE,
                MAX_ANGLE,
            ),
            wp_radius: load_float(
                store,
                "WP_RADIUS",
                DEFAULT_WP_RADIUS,
                MIN_WP_RADIUS,
                MAX_WP_RADIUS,
            ),
            race_buffer_dist: load_float(
                store,
                "RACE_BUF_DIST",
                DEFAULT_RACE_BUFFER_DIST,
                MIN_RACE_BUFFER,
                MAX_RACE_BUFFER,
            ),
        }
    }

    /// Validate sailing parameters
    pub fn is_valid(&self) -> bool {
        if self.vel_min_ok < MIN_VEL_MIN_OK || self.vel_min_ok > MAX_VEL_MIN_OK {
            return false;
        }
        if self.vel_max_accel < MIN_VEL_MAX_ACCEL || self.vel_max_accel > MAX_VEL_MAX_ACCEL {
            return false;
        }
        if self.vel_max_ignores > MAX_VEL_MAX_IGNORES as u32 {
            return false;
        }
        if self.tack_fore_dist < MIN_TACK_DIST || self.tack_fore_dist > MAX_TACK_DIST {
            return false;
        }
        if self.tack_aft_dist < MIN_TACK_DIST || self.tack_aft_dist > MAX_TACK_DIST {
            return false;
        }
        if self.layline_reach_factor < MIN_FACTOR || self.layline_reach_factor > MAX_FACTOR {
            return false;
        }
        if self.rudder_low < MIN_FACTOR || self.rudder_low > MAX_FACTOR {
            return false;
        }
        if self.rudder_high < MIN_FACTOR || self.rudder_high > MAX_FACTOR {
            return false;
        }
        if self.wp_radius < MIN_WP_RADIUS || self.wp_radius > MAX_WP_RADIUS {
            return false;
        }
        if self.race_buffer_dist < MIN_RACE_BUFFER || self.race_buffer_dist > MAX_RACE_BUFFER {
            return false;
        }

        // Consistency: the six classifier bands must be ordered inside [0, 180]
        self.raw_mode_thresholds().is_consistent()
    }

    /// Velocity filter configuration
    pub fn velocity_config(&self) -> VelocityFilterConfig {
        VelocityFilterConfig {
            min_okay_speed_mps: self.vel_min_ok as f64,
            max_acceleration_mps2: self.vel_max_accel as f64,
            max_ignores: self.vel_max_ignores,
        }
    }

    /// Sailing mode thresholds
    ///
    /// Falls back to the defaults when the configured bands overlap or run
    /// past 180 degrees.
    pub fn mode_thresholds(&self) -> ModeThresholds {
        let thresholds = self.raw_mode_thresholds();
        if thresholds.is_consistent() {
            return thresholds;
        }
        crate::log_warn!(
            "Inconsistent sailing thresholds side={} aft={} hyst={}, using defaults",
            self.side_wind_thresh,
            self.aft_wind_thresh,
            self.change_angle_thresh
        );
        ModeThresholds::default()
    }

    /// Helm (rudder mapping) configuration
    pub fn helm_config(&self) -> HelmConfig {
        HelmConfig {
            low_rate: self.rudder_low as f64,
            high_rate: self.rudder_high as f64,
            switch_angle_deg: self.rudder_switch_angle as f64,
        }
    }

    /// Tack keeper configuration for one tacking mode
    ///
    /// The optimal wind angle comes from the polar table, not from the store.
    pub fn tack_config(&self, mode: TackingMode, optimal_wind_angle_deg: f64) -> TackConfig {
        let max_lateral = match mode {
            TackingMode::ForeWind => self.tack_fore_dist,
            TackingMode::AftWind => self.tack_aft_dist,
        };
        TackConfig {
            optimal_wind_angle_deg,
            max_lateral_distance_m: max_lateral as f64,
            layline_reach_factor: self.layline_reach_factor as f64,
        }
    }

    fn raw_mode_thresholds(&self) -> ModeThresholds {
        ModeThresholds {
            side_wind_deg: self.side_wind_thresh as f64,
            aft_wind_deg: self.aft_wind_thresh as f64,
            change_angle_deg: self.change_angle_thresh as f64,
        }
    }
}

/// Load a float parameter from store with clamping
fn load_float(store: &ParameterStore, name: &str, default: f32, min: f32, max: f32) -> f32 {
    match store.get(name) {
        Some(ParamValue::Float(v)) if !v.is_nan() => v.clamp(min, max),
        Some(ParamValue::Int(v)) => (*v as f32).clamp(min, max),
        _ => default,
    }
}

/// Load an integer parameter from store with clamping
fn load_int(store: &ParameterStore, name: &str, default: i32, min: i32, max: i32) -> i32 {
    match store.get(name) {
        Some(ParamValue::Int(v)) => (*v).clamp(min, max),
        Some(ParamValue::Float(v)) if !v.is_nan() => (*v as i32).clamp(min, max),
        _ => default,
    }
}
