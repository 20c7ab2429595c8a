//! Parameter management types and utilities
//!
//! Every tuning constant of the sailing controller is a named parameter in a
//! `ParameterStore`, so a host can adjust it without rebuilding.

pub mod error;
pub mod sailing;
pub mod storage;

pub use error::ParameterError;
pub use sailing::SailingParams;
pub use storage::{ParamValue, ParameterStore, MAX_PARAMS, PARAM_NAME_LEN};
