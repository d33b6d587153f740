//! The last answer given to a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The engine's memory of the last (question, response) pair for a user.
///
/// `correct` stays `None` until the user answers with a feedback intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub id: Uuid,
    pub user_id: String,
    pub question: String,
    pub response: String,
    pub correct: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl ResponseRecord {
    pub fn new<U, Q, R>(user_id: U, question: Q, response: R) -> Self
    where
        U: Into<String>,
        Q: Into<String>,
        R: Into<String>,
    {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            question: question.into(),
            response: response.into(),
            correct: None,
            created_at: Utc::now(),
        }
    }

    /// Whether the user has confirmed or rejected this answer.
    pub fn has_feedback(&self) -> bool {
        self.correct.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_pending() {
        let record = ResponseRecord::new("bob", "book a flight", "Where to?");
        assert_eq!(record.user_id, "bob");
        assert_eq!(record.question, "book a flight");
        assert_eq!(record.response, "Where to?");
        assert!(!record.has_feedback());
    }

    #[test]
    fn test_records_get_distinct_ids() {
        let a = ResponseRecord::new("bob", "q", "r");
        let b = ResponseRecord::new("bob", "q", "r");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_json_shape() {
        let mut record = ResponseRecord::new("alice", "q", "r");
        record.correct = Some(false);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["user_id"], "alice");
        assert_eq!(value["correct"], false);
        let back: ResponseRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }
}
