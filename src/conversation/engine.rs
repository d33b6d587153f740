//! Conversation engine: question in, reply out.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::{BotConfig, Messages};
use crate::conversation::feedback::{FeedbackSink, JsonlFeedbackSink, MemoryFeedbackSink};
use crate::conversation::record::ResponseRecord;
use crate::conversation::session::{LruSessionStore, SessionStore};
use crate::error::{IntentBotError, Result};
use crate::ml::classifier::Classifier;
use crate::ml::hashing::HashingVectorizer;
use crate::ml::intent::{IntentCatalog, IntentKind};
use crate::ml::softmax::SoftmaxClassifier;

/// Accuracy of the trained classifier on the catalog's own examples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub examples: usize,
    pub correct: usize,
}

impl EvaluationReport {
    /// Fraction of examples predicted as their own intent; 0 when empty.
    pub fn accuracy(&self) -> f64 {
        if self.examples == 0 {
            0.0
        } else {
            self.correct as f64 / self.examples as f64
        }
    }
}

/// Maps a user's question to an intent and tracks feedback on the answer.
///
/// The session store is locked for the whole lookup-and-update of a single
/// question, so concurrent questions from the same user are applied one
/// after the other. Training needs `&mut self` and therefore cannot overlap
/// with [`ConversationEngine::find_response`].
pub struct ConversationEngine {
    catalog: IntentCatalog,
    vectorizer: HashingVectorizer,
    classifier: Box<dyn Classifier>,
    sessions: Mutex<Box<dyn SessionStore>>,
    sink: Arc<dyn FeedbackSink>,
    messages: Messages,
}

impl std::fmt::Debug for ConversationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationEngine")
            .field("intents", &self.catalog.len())
            .field("vectorizer", &self.vectorizer)
            .field("classifier", &self.classifier.name())
            .field("trained", &self.classifier.is_trained())
            .field("sink", &self.sink.name())
            .finish()
    }
}

impl ConversationEngine {
    /// Assemble an engine from its collaborators. The classifier is used as
    /// given; call [`ConversationEngine::train`] unless it is already trained.
    pub fn new(
        catalog: IntentCatalog,
        vectorizer: HashingVectorizer,
        classifier: Box<dyn Classifier>,
        sessions: Box<dyn SessionStore>,
        sink: Arc<dyn FeedbackSink>,
    ) -> Self {
        Self {
            catalog,
            vectorizer,
            classifier,
            sessions: Mutex::new(sessions),
            sink,
            messages: Messages::default(),
        }
    }

    /// Build an untrained engine with the stock components described by
    /// `config`.
    pub fn from_config(catalog: IntentCatalog, config: &BotConfig) -> Result<Self> {
        config.validate()?;
        let sink: Arc<dyn FeedbackSink> = match &config.feedback_log {
            Some(path) => Arc::new(JsonlFeedbackSink::open(path)?),
            None => Arc::new(MemoryFeedbackSink::new()),
        };
        let engine = Self::new(
            catalog,
            HashingVectorizer::new(config.num_features)?,
            Box::new(SoftmaxClassifier::new(config.training.clone())),
            Box::new(LruSessionStore::new(config.session_capacity)?),
            sink,
        );
        Ok(engine.with_messages(config.messages.clone()))
    }

    /// Replace the fallback texts.
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Train the classifier on every intent's examples.
    ///
    /// Calling it again retrains from scratch and replaces the model.
    pub fn train(&mut self) -> Result<()> {
        info!(
            "Starting creation of the model from {} intents",
            self.catalog.len()
        );
        let start = Instant::now();
        let points = self.catalog.labeled_points(&self.vectorizer)?;
        if points.is_empty() {
            return Err(IntentBotError::EmptyTrainingSet);
        }
        self.classifier.train(&points)?;
        info!(
            "Model created from {} examples in {} ms",
            points.len(),
            start.elapsed().as_millis()
        );
        Ok(())
    }

    /// Answer `question` on behalf of `user_id`.
    ///
    /// Feedback intents mark the user's last answer as right or wrong and
    /// save it; normal intents replace the user's last answer. Questions
    /// that match no intent, and feedback with no answer to attach to, get a
    /// fallback text and leave the sessions untouched.
    pub fn find_response(&self, question: &str, user_id: &str) -> Result<String> {
        let features = self.vectorizer.transform(question)?;
        let label = self.classifier.predict(&features)?;
        debug!("Predicted label {label} for user {user_id}");

        let Some(intent) = self.catalog.get(label) else {
            warn!("No intent configured for predicted label {label}");
            return Ok(self.messages.no_response.clone());
        };

        let mut sessions = self.sessions.lock();
        match intent.kind() {
            IntentKind::Normal => {
                sessions.insert(ResponseRecord::new(user_id, question, intent.response()));
            }
            kind => {
                let Some(record) = sessions.get_mut(user_id) else {
                    warn!("Feedback from {user_id} with no pending answer");
                    return Ok(self.messages.nothing_asked.clone());
                };
                record.correct = Some(kind == IntentKind::FeedbackYes);
                self.sink.save(record)?;
            }
        }

        Ok(intent.response().to_string())
    }

    /// Training-set accuracy of the current model.
    pub fn evaluate(&self) -> Result<EvaluationReport> {
        let mut report = EvaluationReport {
            examples: 0,
            correct: 0,
        };
        for intent in &self.catalog {
            for point in intent.labeled_points(&self.vectorizer)? {
                report.examples += 1;
                if self.classifier.predict(&point.features)? == point.label {
                    report.correct += 1;
                }
            }
        }
        Ok(report)
    }

    pub fn is_trained(&self) -> bool {
        self.classifier.is_trained()
    }

    pub fn intents(&self) -> &IntentCatalog {
        &self.catalog
    }

    pub fn vectorizer(&self) -> &HashingVectorizer {
        &self.vectorizer
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Copy of the user's live record, if any.
    pub fn pending_record(&self, user_id: &str) -> Option<ResponseRecord> {
        self.sessions.lock().get(user_id).cloned()
    }

    /// Number of users with a live record.
    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }
}
