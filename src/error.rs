//! Controller error types
//!
//! Sensor implausibility and numeric degeneracy are recovered inside a tick
//! and never show up here. What remains is bad race configuration and
//! collaborators that break their contract.

use crate::parameters::ParameterError;

/// Errors surfaced to the caller of the sailing controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    /// Waypoint manager has no current waypoint
    NoCurrentWaypoint,
    /// Waypoint manager has no previous waypoint for the active leg
    NoPreviousWaypoint,
    /// Route needs at least a start and one mark
    RouteTooShort,
    /// Route exceeds the waypoint capacity
    RouteTooLong,
    /// Boundary polygon has one or two vertices, or a non-finite vertex
    InvalidBoundary,
    /// Boundary polygon exceeds the vertex capacity
    BoundaryTooLarge,
    /// Polar table exceeds the point capacity
    PolarTableTooLarge,
    /// Polar table has no points
    EmptyPolarTable,
    /// Parameter store rejected an operation
    Parameter(ParameterError),
}

impl core::fmt::Display for ControlError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ControlError::NoCurrentWaypoint => write!(f, "no current waypoint"),
            ControlError::NoPreviousWaypoint => write!(f, "no previous waypoint"),
            ControlError::RouteTooShort => write!(f, "route needs at least two waypoints"),
            ControlError::RouteTooLong => write!(f, "route exceeds waypoint capacity"),
            ControlError::InvalidBoundary => write!(f, "boundary polygon is invalid"),
            ControlError::BoundaryTooLarge => write!(f, "boundary exceeds vertex capacity"),
            ControlError::PolarTableTooLarge => write!(f, "polar table exceeds point capacity"),
            ControlError::EmptyPolarTable => write!(f, "polar table is empty"),
            ControlError::Parameter(e) => write!(f, "parameter error: {}", e),
        }
    }
}

impl From<ParameterError> for ControlError {
    fn from(e: ParameterError) -> Self {
        ControlError::Parameter(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            format!("{}", ControlError::NoCurrentWaypoint),
            "no current waypoint"
        );
        assert_eq!(
            format!("{}", ControlError::Parameter(ParameterError::StoreFull)),
            "parameter error: parameter store full"
        );
    }

    #[test]
    fn test_from_parameter_error() {
        let err: ControlError = ParameterError::StoreFull.into();
        assert_eq!(err, ControlError::Parameter(ParameterError::StoreFull));
    }
}
