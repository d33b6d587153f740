//! Intents and the validated intent catalog.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{IntentBotError, Result};
use crate::ml::hashing::{HashingVectorizer, LabeledPoint};

/// What matching an intent means for the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    /// A content question with a canned answer.
    Normal,
    /// The user confirms the previous answer was right.
    FeedbackYes,
    /// The user says the previous answer was wrong.
    FeedbackNo,
}

impl IntentKind {
    /// Build a kind from the two boolean flags used in intent definitions.
    pub fn from_flags(feedback_yes: bool, feedback_no: bool) -> Result<Self> {
        match (feedback_yes, feedback_no) {
            (false, false) => Ok(IntentKind::Normal),
            (true, false) => Ok(IntentKind::FeedbackYes),
            (false, true) => Ok(IntentKind::FeedbackNo),
            (true, true) => Err(IntentBotError::invalid_config(
                "an intent cannot be both a yes and a no feedback intent",
            )),
        }
    }

    pub fn is_feedback(self) -> bool {
        !matches!(self, IntentKind::Normal)
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntentKind::Normal => "normal",
            IntentKind::FeedbackYes => "feedback-yes",
            IntentKind::FeedbackNo => "feedback-no",
        };
        f.write_str(name)
    }
}

/// Serialized form of an intent as it appears in configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentDefinition {
    pub label: u32,
    pub response: String,
    #[serde(default, alias = "isFeedbackIntentYes")]
    pub is_feedback_yes: bool,
    #[serde(default, alias = "isFeedbackIntentNo")]
    pub is_feedback_no: bool,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// A recognized category of user question.
#[derive(Debug, Clone)]
pub struct Intent {
    label: u32,
    response: String,
    kind: IntentKind,
    examples: Vec<String>,
    /// Hashed examples, computed on first use.
    points: OnceLock<Vec<LabeledPoint>>,
}

impl Intent {
    pub fn new<S: Into<String>>(
        label: u32,
        response: S,
        kind: IntentKind,
        examples: Vec<String>,
    ) -> Self {
        Self {
            label,
            response: response.into(),
            kind,
            examples,
            points: OnceLock::new(),
        }
    }

    /// Create a normal intent from string slices.
    pub fn normal(label: u32, response: &str, examples: &[&str]) -> Self {
        Self::new(label, response, IntentKind::Normal, to_owned(examples))
    }

    /// Create the intent that confirms the previous answer.
    pub fn feedback_yes(label: u32, response: &str, examples: &[&str]) -> Self {
        Self::new(label, response, IntentKind::FeedbackYes, to_owned(examples))
    }

    /// Create the intent that rejects the previous answer.
    pub fn feedback_no(label: u32, response: &str, examples: &[&str]) -> Self {
        Self::new(label, response, IntentKind::FeedbackNo, to_owned(examples))
    }

    pub fn label(&self) -> u32 {
        self.label
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn kind(&self) -> IntentKind {
        self.kind
    }

    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    /// Labeled feature vectors of this intent's examples.
    ///
    /// The vectors are hashed once and cached; later calls must pass a
    /// vectorizer of the same dimension.
    pub fn labeled_points(&self, vectorizer: &HashingVectorizer) -> Result<&[LabeledPoint]> {
        if let Some(points) = self.points.get() {
            if let Some(first) = points.first() {
                if first.features.len() != vectorizer.num_features() {
                    return Err(IntentBotError::DimensionMismatch {
                        expected: first.features.len(),
                        actual: vectorizer.num_features(),
                    });
                }
            }
            return Ok(points);
        }

        let points = self
            .examples
            .iter()
            .map(|example| {
                vectorizer
                    .transform(example)
                    .map(|features| LabeledPoint::new(self.label, features))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(self.points.get_or_init(|| points))
    }
}

fn to_owned(examples: &[&str]) -> Vec<String> {
    examples.iter().map(|s| s.to_string()).collect()
}

impl TryFrom<IntentDefinition> for Intent {
    type Error = IntentBotError;

    fn try_from(definition: IntentDefinition) -> Result<Self> {
        let kind = IntentKind::from_flags(definition.is_feedback_yes, definition.is_feedback_no)
            .map_err(|_| {
                IntentBotError::invalid_config(format!(
                    "intent {} is flagged as both yes and no feedback",
                    definition.label
                ))
            })?;
        Ok(Intent::new(
            definition.label,
            definition.response,
            kind,
            definition.examples,
        ))
    }
}

/// An ordered, validated set of intents.
///
/// Labels are unique and there is at most one intent of each feedback kind.
#[derive(Debug, Clone)]
pub struct IntentCatalog {
    intents: Vec<Intent>,
    by_label: HashMap<u32, usize>,
}

impl IntentCatalog {
    /// Validate and index a list of intents.
    pub fn new(intents: Vec<Intent>) -> Result<Self> {
        let mut by_label = HashMap::with_capacity(intents.len());
        let mut feedback_yes = false;
        let mut feedback_no = false;

        for (position, intent) in intents.iter().enumerate() {
            if by_label.insert(intent.label, position).is_some() {
                return Err(IntentBotError::DuplicateLabel {
                    label: intent.label,
                });
            }

            let seen = match intent.kind {
                IntentKind::Normal => continue,
                IntentKind::FeedbackYes => &mut feedback_yes,
                IntentKind::FeedbackNo => &mut feedback_no,
            };
            if *seen {
                return Err(IntentBotError::DuplicateFeedbackIntent { kind: intent.kind });
            }
            *seen = true;
        }

        Ok(Self { intents, by_label })
    }

    /// Build a catalog from configuration definitions.
    pub fn from_definitions(definitions: Vec<IntentDefinition>) -> Result<Self> {
        let intents = definitions
            .into_iter()
            .map(Intent::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new(intents)
    }

    /// Parse a JSON array of intent definitions.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let definitions: Vec<IntentDefinition> = serde_json::from_str(json)?;
        Self::from_definitions(definitions)
    }

    /// Load a JSON array of intent definitions from a file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_json_str(&content)?;
        info!(
            "Loaded {} intents from {}",
            catalog.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    /// Look up the intent with the given label.
    pub fn get(&self, label: u32) -> Option<&Intent> {
        self.by_label.get(&label).map(|&i| &self.intents[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Intent> {
        self.intents.iter()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// The first intent of the given kind, if any.
    pub fn find_kind(&self, kind: IntentKind) -> Option<&Intent> {
        self.intents.iter().find(|intent| intent.kind == kind)
    }

    /// Union of every intent's labeled feature vectors, in catalog order.
    pub fn labeled_points(&self, vectorizer: &HashingVectorizer) -> Result<Vec<LabeledPoint>> {
        let mut points = Vec::new();
        for intent in &self.intents {
            points.extend_from_slice(intent.labeled_points(vectorizer)?);
        }
        Ok(points)
    }

    /// Total number of example utterances.
    pub fn example_count(&self) -> usize {
        self.intents.iter().map(|intent| intent.examples.len()).sum()
    }
}

impl<'a> IntoIterator for &'a IntentCatalog {
    type Item = &'a Intent;
    type IntoIter = std::slice::Iter<'a, Intent>;

    fn into_iter(self) -> Self::IntoIter {
        self.intents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_flags() {
        assert_eq!(IntentKind::from_flags(false, false).unwrap(), IntentKind::Normal);
        assert_eq!(IntentKind::from_flags(true, false).unwrap(), IntentKind::FeedbackYes);
        assert_eq!(IntentKind::from_flags(false, true).unwrap(), IntentKind::FeedbackNo);
        assert!(IntentKind::from_flags(true, true).is_err());
        assert!(IntentKind::FeedbackNo.is_feedback());
        assert!(!IntentKind::Normal.is_feedback());
    }

    #[test]
    fn test_definition_parsing() {
        let json = r#"[
            {"label": 0, "response": "Booking a flight.", "examples": ["book a flight"]},
            {"label": 1, "response": "Great!", "isFeedbackYes": true, "examples": ["yes"]},
            {"label": 2, "response": "Sorry.", "isFeedbackIntentNo": true, "examples": ["no"]}
        ]"#;
        let catalog = IntentCatalog::from_json_str(json).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(0).unwrap().kind(), IntentKind::Normal);
        assert_eq!(catalog.get(1).unwrap().kind(), IntentKind::FeedbackYes);
        assert_eq!(catalog.get(2).unwrap().kind(), IntentKind::FeedbackNo);
        assert_eq!(catalog.find_kind(IntentKind::FeedbackNo).unwrap().label(), 2);
        assert!(catalog.get(7).is_none());
        assert_eq!(catalog.example_count(), 3);
    }

    #[test]
    fn test_both_flags_rejected() {
        let json = r#"[{"label": 0, "response": "?", "isFeedbackYes": true, "isFeedbackNo": true}]"#;
        let err = IntentCatalog::from_json_str(json).unwrap_err();
        assert!(matches!(err, IntentBotError::InvalidConfig(_)));
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let err = IntentCatalog::new(vec![
            Intent::normal(1, "first", &["hello"]),
            Intent::normal(1, "second", &["goodbye"]),
        ])
        .unwrap_err();

        assert!(matches!(err, IntentBotError::DuplicateLabel { label: 1 }));
    }

    #[test]
    fn test_duplicate_feedback_kind_rejected() {
        let err = IntentCatalog::new(vec![
            Intent::feedback_yes(0, "thanks", &["yes"]),
            Intent::feedback_yes(1, "thanks again", &["yep"]),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            IntentBotError::DuplicateFeedbackIntent {
                kind: IntentKind::FeedbackYes
            }
        ));
    }

    #[test]
    fn test_labeled_points_are_cached() {
        let vectorizer = HashingVectorizer::new(32).unwrap();
        let intent = Intent::normal(4, "ok", &["book a flight", "flight to paris"]);

        let first = intent.labeled_points(&vectorizer).unwrap().as_ptr();
        let second = intent.labeled_points(&vectorizer).unwrap();
        assert_eq!(first, second.as_ptr());
        assert_eq!(second.len(), 2);
        assert!(second.iter().all(|p| p.label == 4));

        let other = HashingVectorizer::new(16).unwrap();
        let err = intent.labeled_points(&other).unwrap_err();
        assert!(matches!(
            err,
            IntentBotError::DimensionMismatch {
                expected: 32,
                actual: 16
            }
        ));
    }

    #[test]
    fn test_sparse_labels_train() {
        use crate::ml::classifier::Classifier;
        use crate::ml::softmax::SoftmaxClassifier;

        let catalog = IntentCatalog::from_json_str(
            r#"[
                {"label": 0, "response": "Where to?", "examples": ["book a flight"]},
                {"label": 3000000000, "response": "Sunny.", "examples": ["what is the weather"]}
            ]"#,
        )
        .unwrap();
        let vectorizer = HashingVectorizer::new(1024).unwrap();
        let points = catalog.labeled_points(&vectorizer).unwrap();

        let mut classifier = SoftmaxClassifier::default();
        classifier.train(&points).unwrap();

        assert_eq!(classifier.model().unwrap().num_classes(), 2);
        let query = vectorizer.transform("what is the weather").unwrap();
        let label = classifier.predict(&query).unwrap();
        assert_eq!(label, 3_000_000_000);
        assert_eq!(catalog.get(label).unwrap().response(), "Sunny.");
    }
}
