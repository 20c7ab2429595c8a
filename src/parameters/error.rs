//! Parameter error types

/// Errors from parameter store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// Unknown parameter or name longer than the key capacity
    InvalidConfig,
    /// Store is full
    StoreFull,
}

impl core::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParameterError::InvalidConfig => write!(f, "unknown or malformed parameter name"),
            ParameterError::StoreFull => write!(f, "parameter store full"),
        }
    }
}
