use thiserror::Error;

/// Main error type for the ArcTune system
#[derive(Error, Debug)]
pub enum TuneError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised by the trainable-model collaborator.
///
/// Everything here is recoverable from the search engine's point of view: a
/// candidate that produces one of these is scored `f64::INFINITY` and the
/// search moves on.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model has no layers")]
    EmptyModel,

    #[error("Layer {index} is structurally invalid: {message}")]
    InvalidLayer { index: usize, message: String },

    #[error("Shape mismatch: {message}")]
    ShapeMismatch { message: String },

    #[error("Model must be built before {operation}")]
    NotBuilt { operation: String },

    #[error("Optimizer error: {message}")]
    Optimizer { message: String },

    #[error("Training diverged: loss is not finite at epoch {epoch}")]
    Diverged { epoch: usize },

    #[error("Unknown parameter '{name}' for {target}")]
    UnknownParameter { name: String, target: String },

    #[error("Parameter '{name}' rejects value {value}: {message}")]
    InvalidParameterValue {
        name: String,
        value: String,
        message: String,
    },
}

/// Result type alias for ArcTune operations
pub type TuneResult<T> = Result<T, TuneError>;

/// Macro for creating invalid-input errors
#[macro_export]
macro_rules! invalid_input {
    ($($arg:tt)*) => {
        $crate::TuneError::InvalidInput(format!($($arg)*))
    };
}

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::TuneError::Config(format!($($arg)*))
    };
}
