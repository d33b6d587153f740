//! Intent classification: feature hashing, intents and the classifier.
//!
//! Text is hashed into fixed-length term-frequency vectors by
//! [`hashing::HashingVectorizer`]. Every [`intent::Intent`] turns its example
//! utterances into labeled vectors, and a [`classifier::Classifier`] learns to
//! map a vector back to an intent label. [`softmax::SoftmaxClassifier`] is the
//! multinomial logistic regression shipped with the crate.

pub mod classifier;
pub mod hashing;
pub mod intent;
pub mod softmax;

pub use classifier::Classifier;
pub use hashing::{FeatureVector, HashingVectorizer, LabeledPoint};
pub use intent::{Intent, IntentCatalog, IntentDefinition, IntentKind};
pub use softmax::{SoftmaxClassifier, SoftmaxModel, TrainingConfig};
