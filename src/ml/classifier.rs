//! Classifier trait definition.

use crate::error::Result;
use crate::ml::hashing::{FeatureVector, LabeledPoint};

/// A trainable model that maps feature vectors to intent labels.
///
/// The conversation engine only talks to this trait, so any model (or a
/// scripted stub in tests) can stand behind it.
pub trait Classifier: Send + Sync {
    /// Train on labeled points, replacing any previously trained model.
    ///
    /// Fails with `EmptyTrainingSet` when `points` is empty.
    fn train(&mut self, points: &[LabeledPoint]) -> Result<()>;

    /// Predict the label of a feature vector.
    ///
    /// Fails with `ModelNotTrained` when called before [`Classifier::train`].
    fn predict(&self, features: &FeatureVector) -> Result<u32>;

    /// Whether a trained model is available.
    fn is_trained(&self) -> bool;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;
}
