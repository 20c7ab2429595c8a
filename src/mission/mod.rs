//! Race Route Types
//!
//! Pure data structures for the race route and the contract the sailing
//! controller uses to walk it.
//!
//! # Route Storage
//!
//! - Fixed-size waypoint array (max 32 waypoints)
//! - The first waypoint is the start line; sailing begins toward the second
//! - Course distances are precomputed from leg lengths

mod route;

use crate::navigation::GeoPoint;
use crate::sailing::time::LegProgress;

pub use route::RouteManager;

/// Maximum number of waypoints in a route
pub const MAX_WAYPOINTS: usize = 32;

/// Route waypoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Position of the mark
    pub point: GeoPoint,
    /// Sequence number (0 = start)
    pub seq: u16,
    /// Course distance from the start to this mark (meters)
    pub course_dist_m: f64,
    /// Course distance from this mark to the finish (meters)
    pub dist_to_finish_m: f64,
}

impl Waypoint {
    /// Course distances for the finish projection
    pub fn progress(&self) -> LegProgress {
        LegProgress {
            course_dist_m: self.course_dist_m,
            dist_to_finish_m: self.dist_to_finish_m,
        }
    }
}

/// Boat status relative to the current waypoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaypointStatus {
    /// Boat is within the acceptance radius
    pub achieved: bool,
    /// Heading from the boat to the waypoint (degrees, 0-360)
    pub heading_deg: f64,
    /// Distance from the boat to the waypoint (meters)
    pub distance_m: f64,
}

/// Progress through the route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteState {
    /// Index of the current waypoint
    pub index: u16,
    /// Number of waypoints including the start
    pub count: u16,
    /// All marks have been rounded
    pub complete: bool,
}

/// Waypoint sequencing consumed by the sailing controller
///
/// Advancement and arrival semantics belong to the implementation; the
/// controller only reads waypoints and asks to move on.
pub trait WaypointManager {
    /// Waypoint being sailed to, `None` once the route is complete
    fn current(&self) -> Option<Waypoint>;

    /// Waypoint the current leg starts from
    fn previous(&self) -> Option<Waypoint>;

    /// Waypoint after the current one, or the current one on the final leg
    fn upcoming(&self) -> Option<Waypoint>;

    /// Waypoint strictly after the current one
    fn peek_next(&self) -> Option<Waypoint>;

    /// Boat status relative to the current waypoint
    fn status(&self, position: &GeoPoint) -> Option<WaypointStatus>;

    /// Move on to the next waypoint; `None` when the route is complete
    fn advance(&mut self, position: &GeoPoint) -> Option<Waypoint>;

    /// Jump to waypoint `n`; `None` when `n` is out of range
    fn goto_nth(&mut self, n: u16, position: &GeoPoint) -> Option<Waypoint>;

    /// Progress through the route
    fn state(&self) -> RouteState;
}
