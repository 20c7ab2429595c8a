use sailnav::ControlError;

/// Errors that can occur while loading or running a simulated race.
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Race file parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid race: {0}")]
    InvalidRace(String),

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Controller error: {0}")]
    Control(ControlError),
}

impl From<ControlError> for SimulatorError {
    fn from(e: ControlError) -> Self {
        SimulatorError::Control(e)
    }
}
