//! sailnav - Decision core for an autonomous sailing vehicle
//!
//! Given periodic sensor fixes and a route of waypoints, the controller
//! produces a rudder command and a sail-trim command once per control tick.
//!
//! # Design Principles
//!
//! - **Pure no_std**: Host printing only behind `std`/tests, `defmt` on targets
//! - **Trait abstractions**: Route, boundary, polar table and telemetry are injected
//! - **Exclusive state**: Every piece of cross-tick state has exactly one owner
//!
//! # Modules
//!
//! - [`navigation`]: Geodesic primitives, sensor types and last-valid holds
//! - [`sailing`]: Velocity filter, sailing mode, laylines, tacking, helm, race clock
//! - [`mission`]: Waypoint manager contract and the default route manager
//! - [`fence`]: Navigable-area boundary test
//! - [`polar`]: Polar performance table
//! - [`telemetry`]: Fire-and-forget visualization sink
//! - [`parameters`]: Runtime-tunable parameter store and sailing parameters
//! - [`controller`]: The per-tick orchestrator

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod logging;

pub mod controller;
pub mod error;
pub mod fence;
pub mod mission;
pub mod navigation;
pub mod parameters;
pub mod polar;
pub mod sailing;
pub mod telemetry;

pub use controller::{
    DefaultController, HelmCommand, RaceConfig, SailingController, SensorState, SkipReason,
    TickOutput,
};
pub use error::ControlError;
pub use navigation::{GeoPoint, SensorHold, VelocityEstimate, WindReading};
pub use parameters::SailingParams;
pub use sailing::{SailingMode, TackSign};
