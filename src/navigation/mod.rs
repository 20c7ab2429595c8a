//! Navigation types and utilities
//!
//! This module contains the geodesic primitives and sensor value types used
//! by the sailing subsystem.

pub mod geo;
mod hold;
mod types;

pub use geo::{DistanceHeading, GeoPoint};
pub use hold::{LastValid, Plausible, SensorHold};
pub use types::{VelocityEstimate, WindReading};
