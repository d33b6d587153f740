//! Error types for the intentbot library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`IntentBotError`] enum. Conversational dead ends (no intent for a
//! predicted label, feedback with nothing pending) are not errors; they are
//! answered with fallback text by the engine.
//!
//! # Examples
//!
//! ```
//! use intentbot::error::{IntentBotError, Result};
//!
//! fn load() -> Result<()> {
//!     Err(IntentBotError::invalid_config("num_features must be positive"))
//! }
//!
//! assert!(load().is_err());
//! ```

use std::io;

use thiserror::Error;

use crate::ml::intent::IntentKind;

/// The main error type for intentbot operations.
#[derive(Error, Debug)]
pub enum IntentBotError {
    /// Prediction was requested before the classifier was trained.
    #[error("Model not trained: call train() before asking questions")]
    ModelNotTrained,

    /// Two intents in the same catalog share a label.
    #[error("Duplicate label: {label} is used by more than one intent")]
    DuplicateLabel { label: u32 },

    /// More than one intent of the same feedback kind.
    #[error("Duplicate feedback intent: more than one {kind} intent configured")]
    DuplicateFeedbackIntent { kind: IntentKind },

    /// Training was requested with no labeled examples at all.
    #[error("Empty training set: no intent provides example utterances")]
    EmptyTrainingSet,

    /// A feature vector does not have the dimension the model was trained with.
    #[error("Dimension mismatch: model expects {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Feedback persistence failures
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with IntentBotError.
pub type Result<T> = std::result::Result<T, IntentBotError>;

impl IntentBotError {
    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        IntentBotError::InvalidConfig(msg.into())
    }

    /// Create a new persistence error.
    pub fn persistence<S: Into<String>>(msg: S) -> Self {
        IntentBotError::Persistence(msg.into())
    }

    /// Whether the error is a storage failure (I/O or persistence).
    pub fn is_persistence(&self) -> bool {
        matches!(self, IntentBotError::Persistence(_) | IntentBotError::Io(_))
    }
}
