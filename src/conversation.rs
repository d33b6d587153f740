//! The conversation engine and its per-user state.
//!
//! [`engine::ConversationEngine`] turns a question into a reply and keeps one
//! [`record::ResponseRecord`] per user in a [`session::SessionStore`] so that
//! a following "yes"/"no" can be attached to the last answer and handed to a
//! [`feedback::FeedbackSink`].

pub mod engine;
pub mod feedback;
pub mod record;
pub mod session;

pub use engine::{ConversationEngine, EvaluationReport};
pub use feedback::{FeedbackSink, JsonlFeedbackSink, MemoryFeedbackSink};
pub use record::ResponseRecord;
pub use session::{LruSessionStore, SessionStore};
