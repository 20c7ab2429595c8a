//! Navigable-area boundary
//!
//! The course boundary is a polygon of up to [`MAX_FENCE_VERTICES`]
//! vertices. Containment uses ray casting in the tangent plane at the first
//! vertex. An empty polygon means the course is unbounded.

use crate::error::ControlError;
use crate::navigation::GeoPoint;
use heapless::Vec;

/// Maximum number of boundary vertices
pub const MAX_FENCE_VERTICES: usize = 32;

/// Boundary test consumed by the tack keeper
pub trait BoundaryTest {
    /// True when `position` lies outside the navigable area
    fn is_out_of_bounds(&self, position: &GeoPoint) -> bool;

    /// True only on the tick the boat goes from inside to outside
    fn is_newly_out_of_bounds(&mut self, position: &GeoPoint) -> bool;
}

/// Polygon boundary with breach edge detection
#[derive(Clone, Debug)]
pub struct PolygonFence {
    vertices: Vec<GeoPoint, MAX_FENCE_VERTICES>,
    was_out: bool,
}

impl PolygonFence {
    /// Fence that never reports a breach
    pub fn unbounded() -> Self {
        Self {
            vertices: Vec::new(),
            was_out: false,
        }
    }

    /// Build a fence from polygon vertices
    ///
    /// An empty slice gives an unbounded fence. One or two vertices, or a
    /// non-finite vertex, is rejected.
    pub fn new(vertices: &[GeoPoint]) -> Result<Self, ControlError> {
        if vertices.is_empty() {
            return Ok(Self::unbounded());
        }
        if vertices.len() < 3 || vertices.iter().any(|v| !v.is_finite()) {
            return Err(ControlError::InvalidBoundary);
        }
        let vertices =
            Vec::from_slice(vertices).map_err(|_| ControlError::BoundaryTooLarge)?;
        Ok(Self {
            vertices,
            was_out: false,
        })
    }

    /// True when the fence has no polygon
    pub fn is_unbounded(&self) -> bool {
        self.vertices.is_empty()
    }

    fn contains(&self, position: &GeoPoint) -> bool {
        let Some(origin) = self.vertices.first() else {
            return true;
        };
        let (px, py) = position.local_offset_from(origin);

        let mut inside = false;
        let n = self.vertices.len();
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = self.vertices[i].local_offset_from(origin);
            let (xj, yj) = self.vertices[j].local_offset_from(origin);
            if (yi > py) != (yj > py) {
                let x_cross = xi + (py - yi) * (xj - xi) / (yj - yi);
                if px < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

impl Default for PolygonFence {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl BoundaryTest for PolygonFence {
    fn is_out_of_bounds(&self, position: &GeoPoint) -> bool {
        !self.contains(position)
    }

    fn is_newly_out_of_bounds(&mut self, position: &GeoPoint) -> bool {
        let out = self.is_out_of_bounds(position);
        let newly = out && !self.was_out;
        self.was_out = out;
        if newly {
            crate::log_warn!(
                "Boundary breached at lat={} lon={}",
                position.latitude,
                position.longitude
            );
        }
        newly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: GeoPoint = GeoPoint::new(-36.8094, 174.7506);

    /// 200 m square centred on CENTER
    fn square() -> PolygonFence {
        let ne = CENTER.destination(0.0, 100.0).destination(90.0, 100.0);
        let se = CENTER.destination(180.0, 100.0).destination(90.0, 100.0);
        let sw = CENTER.destination(180.0, 100.0).destination(270.0, 100.0);
        let nw = CENTER.destination(0.0, 100.0).destination(270.0, 100.0);
        PolygonFence::new(&[ne, se, sw, nw]).unwrap()
    }

    #[test]
    fn test_inside_and_outside() {
        let fence = square();
        assert!(!fence.is_out_of_bounds(&CENTER));
        assert!(!fence.is_out_of_bounds(&CENTER.destination(45.0, 120.0)));
        assert!(fence.is_out_of_bounds(&CENTER.destination(90.0, 150.0)));
        assert!(fence.is_out_of_bounds(&CENTER.destination(0.0, 101.0)));
    }

    #[test]
    fn test_newly_out_fires_once_per_breach() {
        let mut fence = square();
        let inside = CENTER;
        let outside = CENTER.destination(270.0, 150.0);

        assert!(!fence.is_newly_out_of_bounds(&inside));
        assert!(fence.is_newly_out_of_bounds(&outside));
        assert!(!fence.is_newly_out_of_bounds(&outside));
        assert!(!fence.is_newly_out_of_bounds(&inside));
        assert!(fence.is_newly_out_of_bounds(&outside));
    }

    #[test]
    fn test_unbounded_never_breaches() {
        let mut fence = PolygonFence::new(&[]).unwrap();
        assert!(fence.is_unbounded());
        let far = GeoPoint::new(10.0, 10.0);
        assert!(!fence.is_out_of_bounds(&far));
        assert!(!fence.is_newly_out_of_bounds(&far));
    }

    #[test]
    fn test_degenerate_polygon_rejected() {
        let a = CENTER;
        let b = CENTER.destination(0.0, 10.0);
        assert_eq!(PolygonFence::new(&[a, b]).unwrap_err(), ControlError::InvalidBoundary);
        let nan = GeoPoint::new(f64::NAN, 0.0);
        assert_eq!(
            PolygonFence::new(&[a, b, nan]).unwrap_err(),
            ControlError::InvalidBoundary
        );
    }

    #[test]
    fn test_oversized_polygon_rejected() {
        let vertices: std::vec::Vec<GeoPoint> = (0..=MAX_FENCE_VERTICES)
            .map(|i| CENTER.destination(i as f64 * 10.0, 100.0))
            .collect();
        assert_eq!(
            PolygonFence::new(&vertices).unwrap_err(),
            ControlError::BoundaryTooLarge
        );
    }
}
