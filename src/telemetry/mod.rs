//! Visualization sink
//!
//! The controller reports what it decided so a ground station or a
//! simulator can draw it. Calls are fire-and-forget: a sink cannot fail the
//! control tick.

use crate::navigation::GeoPoint;
use crate::sailing::mode::SailingMode;
use crate::sailing::tack::TackEvent;

/// Marker left on the boat's trail
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrailMarker {
    /// Regular trail point, tagged with the sailing mode
    Sailing(SailingMode),
    /// Tack chosen on the first tick of a leg
    LaylineEngaged,
    /// Tack flipped at the boundary
    BoundaryTack,
    /// Tack flipped on crossing a layline
    LaylineTack,
    /// Tack flipped after drifting off the course line
    DriftTack,
}

impl TrailMarker {
    /// Marker for a tack event, `None` when nothing changed
    pub fn from_event(event: TackEvent) -> Option<Self> {
        match event {
            TackEvent::Engaged => Some(TrailMarker::LaylineEngaged),
            TackEvent::BoundaryTack => Some(TrailMarker::BoundaryTack),
            TackEvent::LaylineTack => Some(TrailMarker::LaylineTack),
            TackEvent::DriftTack => Some(TrailMarker::DriftTack),
            TackEvent::Hold => None,
        }
    }

    /// True for markers that record a change of tack
    pub fn is_tack(&self) -> bool {
        matches!(
            self,
            TrailMarker::BoundaryTack | TrailMarker::LaylineTack | TrailMarker::DriftTack
        )
    }
}

/// Receiver of visualization hints
pub trait TelemetrySink {
    /// Mark the boat's position on its trail
    fn draw_trail(&mut self, position: &GeoPoint, marker: TrailMarker);

    /// Draw both laylines through `through`
    fn draw_layline(&mut self, through: &GeoPoint, wind_heading_deg: f64, optimal_angle_deg: f64);
}

/// Sink that discards everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTelemetry;

impl TelemetrySink for NullTelemetry {
    fn draw_trail(&mut self, _position: &GeoPoint, _marker: TrailMarker) {}

    fn draw_layline(&mut self, _through: &GeoPoint, _wind_heading_deg: f64, _optimal_angle_deg: f64) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_from_event() {
        assert_eq!(TrailMarker::from_event(TackEvent::Hold), None);
        assert_eq!(
            TrailMarker::from_event(TackEvent::Engaged),
            Some(TrailMarker::LaylineEngaged)
        );
        assert!(TrailMarker::from_event(TackEvent::DriftTack).unwrap().is_tack());
        assert!(!TrailMarker::LaylineEngaged.is_tack());
        assert!(!TrailMarker::Sailing(SailingMode::SideWind).is_tack());
    }
}
