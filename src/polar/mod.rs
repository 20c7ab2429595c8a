//! Polar performance table
//!
//! Maps the true wind angle off the bow to the sail trim that suits it and
//! the fraction of wind speed the boat makes good. The table is symmetric:
//! only the absolute angle in [0, 180] is looked up.

use crate::error::ControlError;
use crate::navigation::geo::wrap_180;
use heapless::Vec;
use libm::{cos, fabs};

/// Maximum number of points in a polar table
pub const MAX_POLAR_POINTS: usize = 37;

/// One row of the polar table
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolarPoint {
    /// True wind angle off the bow (degrees, 0-180)
    pub angle_deg: f64,
    /// Sail trim command, -1 (sheeted in) to 1 (eased out)
    pub sail_trim: f64,
    /// Boat speed as a fraction of true wind speed
    pub speed_ratio: f64,
}

impl PolarPoint {
    /// Create a polar point
    pub const fn new(angle_deg: f64, sail_trim: f64, speed_ratio: f64) -> Self {
        Self {
            angle_deg,
            sail_trim,
            speed_ratio,
        }
    }
}

/// Source of sail trim and boat speed for a wind angle
pub trait PolarTable {
    /// Interpolated polar point for a true wind angle relative to the bow
    fn lookup(&self, true_wind_heading_deg: f64) -> PolarPoint;

    /// Best angle off the wind when beating
    fn optimal_fore_wind_angle(&self) -> f64;

    /// Best angle off the wind when running
    fn optimal_aft_wind_angle(&self) -> f64;
}

/// Generic monohull polar curve
const DEFAULT_POLAR: [PolarPoint; 11] = [
    PolarPoint::new(0.0, -1.0, 0.0),
    PolarPoint::new(30.0, -1.0, 0.25),
    PolarPoint::new(45.0, -0.8, 0.55),
    PolarPoint::new(60.0, -0.5, 0.7),
    PolarPoint::new(75.0, -0.2, 0.8),
    PolarPoint::new(90.0, 0.0, 0.85),
    PolarPoint::new(110.0, 0.3, 0.85),
    PolarPoint::new(135.0, 0.6, 0.75),
    PolarPoint::new(150.0, 0.8, 0.65),
    PolarPoint::new(165.0, 0.9, 0.55),
    PolarPoint::new(180.0, 1.0, 0.5),
];

const _: () = assert!(DEFAULT_POLAR.len() <= MAX_POLAR_POINTS);

/// Table-backed polar with linear interpolation
#[derive(Clone, Debug)]
pub struct PolarData {
    points: Vec<PolarPoint, MAX_POLAR_POINTS>,
    optimal_fore_deg: f64,
    optimal_aft_deg: f64,
}

impl PolarData {
    /// Build a table from points
    ///
    /// Angles are folded into [0, 180] and sorted.
    pub fn new(points: &[PolarPoint]) -> Result<Self, ControlError> {
        if points.is_empty() {
            return Err(ControlError::EmptyPolarTable);
        }

        let mut table: Vec<PolarPoint, MAX_POLAR_POINTS> = Vec::new();
        for p in points {
            let folded = PolarPoint {
                angle_deg: fabs(wrap_180(p.angle_deg)),
                ..*p
            };
            table
                .push(folded)
                .map_err(|_| ControlError::PolarTableTooLarge)?;
        }
        table.sort_unstable_by(|a, b| a.angle_deg.total_cmp(&b.angle_deg));

        let optimal_fore_deg = best_vmg_angle(&table, |angle| angle < 90.0, 1.0);
        let optimal_aft_deg = best_vmg_angle(&table, |angle| angle > 90.0, -1.0);

        Ok(Self {
            points: table,
            optimal_fore_deg,
            optimal_aft_deg,
        })
    }

    /// Points in ascending angle order
    pub fn points(&self) -> &[PolarPoint] {
        &self.points
    }
}

impl Default for PolarData {
    fn default() -> Self {
        Self {
            points: Vec::from_slice(&DEFAULT_POLAR).unwrap_or_default(),
            optimal_fore_deg: 45.0,
            optimal_aft_deg: 150.0,
        }
    }
}

impl PolarTable for PolarData {
    fn lookup(&self, true_wind_heading_deg: f64) -> PolarPoint {
        let angle = fabs(wrap_180(true_wind_heading_deg));
        let points = self.points.as_slice();

        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return PolarPoint::new(angle, 0.0, 0.0);
        };
        if angle.is_nan() {
            return PolarPoint::new(angle, 0.0, 0.0);
        }
        if angle <= first.angle_deg {
            return PolarPoint { angle_deg: angle, ..*first };
        }
        if angle >= last.angle_deg {
            return PolarPoint { angle_deg: angle, ..*last };
        }

        for pair in points.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if angle <= hi.angle_deg {
                let span = hi.angle_deg - lo.angle_deg;
                let t = if span > 0.0 {
                    (angle - lo.angle_deg) / span
                } else {
                    0.0
                };
                return PolarPoint {
                    angle_deg: angle,
                    sail_trim: lo.sail_trim + t * (hi.sail_trim - lo.sail_trim),
                    speed_ratio: lo.speed_ratio + t * (hi.speed_ratio - lo.speed_ratio),
                };
            }
        }

        PolarPoint { angle_deg: angle, ..*last }
    }

    fn optimal_fore_wind_angle(&self) -> f64 {
        self.optimal_fore_deg
    }

    fn optimal_aft_wind_angle(&self) -> f64 {
        self.optimal_aft_deg
    }
}

/// Table angle maximising `direction * speed_ratio * cos(angle)` among angles passing `filter`
///
/// Falls back to 45 / 150 degrees when no point qualifies.
fn best_vmg_angle(points: &[PolarPoint], filter: impl Fn(f64) -> bool, direction: f64) -> f64 {
    let fallback = if direction > 0.0 { 45.0 } else { 150.0 };
    let mut best: Option<(f64, f64)> = None;
    for p in points.iter().filter(|p| filter(p.angle_deg)) {
        let vmg = direction * p.speed_ratio * cos(p.angle_deg.to_radians());
        match best {
            Some((_, best_vmg)) if best_vmg >= vmg => {}
            _ => best = Some((p.angle_deg, vmg)),
        }
    }
    best.map(|(angle, _)| angle).unwrap_or(fallback)
}
