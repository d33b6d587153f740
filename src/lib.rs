//! # intentbot
//!
//! A small intent-classification chatbot.
//!
//! Questions are hashed into bag-of-words feature vectors, a multinomial
//! logistic regression picks the matching intent, and the intent's canned
//! response is returned. Users can confirm or reject the last answer with a
//! "yes"/"no" style feedback intent; confirmed answers are handed to a
//! pluggable feedback sink.
//!
//! ## Example
//!
//! ```
//! use intentbot::prelude::*;
//!
//! let catalog = IntentCatalog::new(vec![
//!     Intent::normal(0, "Where would you like to fly?", &["book a flight", "reserve a plane ticket"]),
//!     Intent::normal(1, "It will be sunny.", &["what is the weather", "will it rain"]),
//!     Intent::feedback_yes(2, "Glad I could help!", &["yes", "correct"]),
//!     Intent::feedback_no(3, "Sorry about that.", &["no", "wrong"]),
//! ])
//! .unwrap();
//!
//! let config = BotConfig { num_features: 1024, ..BotConfig::default() };
//! let mut engine = ConversationEngine::from_config(catalog, &config).unwrap();
//! engine.train().unwrap();
//!
//! let reply = engine.find_response("book a flight", "bob").unwrap();
//! assert_eq!(reply, "Where would you like to fly?");
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod ml;

pub mod prelude {
    pub use crate::config::{BotConfig, Messages};
    pub use crate::conversation::{
        ConversationEngine, EvaluationReport, FeedbackSink, JsonlFeedbackSink, LruSessionStore,
        MemoryFeedbackSink, ResponseRecord, SessionStore,
    };
    pub use crate::error::{IntentBotError, Result};
    pub use crate::ml::{
        Classifier, HashingVectorizer, Intent, IntentCatalog, IntentDefinition, IntentKind,
        SoftmaxClassifier, TrainingConfig,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
