//! Default route manager
//!
//! Walks a fixed list of marks. A mark is achieved when the boat is inside
//! the acceptance radius; advancing past the last mark completes the route.

use super::{RouteState, Waypoint, WaypointManager, WaypointStatus, MAX_WAYPOINTS};
use crate::error::ControlError;
use crate::navigation::GeoPoint;
use heapless::Vec;

/// Route storage and sequencing
#[derive(Debug, Clone)]
pub struct RouteManager {
    waypoints: Vec<Waypoint, MAX_WAYPOINTS>,
    index: u16,
    complete: bool,
    radius_m: f64,
}

impl RouteManager {
    /// Build a route from mark positions, the first being the start
    pub fn new(points: &[GeoPoint], radius_m: f64) -> Result<Self, ControlError> {
        if points.len() < 2 {
            return Err(ControlError::RouteTooShort);
        }
        if points.len() > MAX_WAYPOINTS {
            return Err(ControlError::RouteTooLong);
        }

        let mut course_dist = [0.0_f64; MAX_WAYPOINTS];
        for i in 1..points.len() {
            course_dist[i] =
                course_dist[i - 1] + points[i - 1].distance_heading_to(&points[i]).distance_m;
        }
        let total = course_dist[points.len() - 1];

        let mut waypoints = Vec::new();
        for (i, point) in points.iter().enumerate() {
            waypoints
                .push(Waypoint {
                    point: *point,
                    seq: i as u16,
                    course_dist_m: course_dist[i],
                    dist_to_finish_m: total - course_dist[i],
                })
                .map_err(|_| ControlError::RouteTooLong)?;
        }

        crate::log_info!(
            "Route loaded: {} waypoints, {} m",
            waypoints.len(),
            total
        );

        Ok(Self {
            waypoints,
            index: 1,
            complete: false,
            radius_m,
        })
    }

    /// Index of the finishing mark
    pub fn final_index(&self) -> u16 {
        (self.waypoints.len() - 1) as u16
    }

    /// All waypoints including the start
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Total course length (meters)
    pub fn course_length_m(&self) -> f64 {
        self.waypoints.first().map(|w| w.dist_to_finish_m).unwrap_or(0.0)
    }

    fn get(&self, index: usize) -> Option<Waypoint> {
        self.waypoints.get(index).copied()
    }
}

impl WaypointManager for RouteManager {
    fn current(&self) -> Option<Waypoint> {
        if self.complete {
            return None;
        }
        self.get(self.index as usize)
    }

    fn previous(&self) -> Option<Waypoint> {
        if self.complete || self.index == 0 {
            return None;
        }
        self.get(self.index as usize - 1)
    }

    fn upcoming(&self) -> Option<Waypoint> {
        self.peek_next().or_else(|| self.current())
    }

    fn peek_next(&self) -> Option<Waypoint> {
        if self.complete {
            return None;
        }
        self.get(self.index as usize + 1)
    }

    fn status(&self, position: &GeoPoint) -> Option<WaypointStatus> {
        let current = self.current()?;
        let dh = position.distance_heading_to(&current.point);
        Some(WaypointStatus {
            achieved: dh.distance_m <= self.radius_m,
            heading_deg: dh.heading_deg,
            distance_m: dh.distance_m,
        })
    }

    fn advance(&mut self, _position: &GeoPoint) -> Option<Waypoint> {
        if self.complete {
            return None;
        }
        if self.index >= self.final_index() {
            self.complete = true;
            crate::log_info!("Route complete");
            return None;
        }
        self.index += 1;
        crate::log_info!("Advancing to waypoint {}", self.index);
        self.current()
    }

    fn goto_nth(&mut self, n: u16, _position: &GeoPoint) -> Option<Waypoint> {
        if n == 0 || n > self.final_index() {
            return None;
        }
        self.index = n;
        self.complete = false;
        crate::log_info!("Jumping to waypoint {}", n);
        self.current()
    }

    fn state(&self) -> RouteState {
        RouteState {
            index: self.index,
            count: self.waypoints.len() as u16,
            complete: self.complete,
        }
    }
}
