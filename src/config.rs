//! Bot configuration.
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::conversation::session::DEFAULT_SESSION_CAPACITY;
use crate::error::{IntentBotError, Result};
use crate::ml::hashing::DEFAULT_NUM_FEATURES;
use crate::ml::softmax::TrainingConfig;

/// Fixed texts shown when no intent can answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Shown when the predicted label matches no configured intent.
    pub no_response: String,
    /// Shown when a user gives feedback but was never answered.
    pub nothing_asked: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            no_response: "I have no response to give you.".to_string(),
            nothing_asked: "Thanks for answering, but I didn't ask you anything.".to_string(),
        }
    }
}

/// Configuration for a [`ConversationEngine`](crate::conversation::ConversationEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Dimension of hashed feature vectors.
    pub num_features: usize,
    /// Classifier training settings.
    pub training: TrainingConfig,
    /// Maximum number of users with a remembered answer.
    pub session_capacity: usize,
    /// Fallback texts.
    pub messages: Messages,
    /// Append confirmed feedback to this JSON-lines file. Kept in memory
    /// when unset.
    pub feedback_log: Option<PathBuf>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            num_features: DEFAULT_NUM_FEATURES,
            training: TrainingConfig::default(),
            session_capacity: DEFAULT_SESSION_CAPACITY,
            messages: Messages::default(),
            feedback_log: None,
        }
    }
}

impl BotConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse a configuration from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: BotConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.num_features == 0 {
            return Err(IntentBotError::invalid_config(
                "num_features must be greater than zero",
            ));
        }
        if self.session_capacity == 0 {
            return Err(IntentBotError::invalid_config(
                "session_capacity must be greater than zero",
            ));
        }
        self.training.validate()
    }
}
