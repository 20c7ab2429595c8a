//! Software-in-the-loop race simulator for the sailnav controller.
//!
//! A race file describes the course, the wind and the simulation settings.
//! [`RaceRunner`] closes the loop between a [`BoatModel`] and the sailing
//! controller and reports a [`RaceSummary`].

pub mod boat;
pub mod config;
pub mod error;
pub mod runner;

pub use boat::BoatModel;
pub use config::{LatLon, Race, RaceFile, SimConfig, WindConfig};
pub use error::SimulatorError;
pub use runner::{RaceRunner, RaceSummary, TrailRecorder};
