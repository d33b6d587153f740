//! Multinomial logistic regression over hashed features.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{IntentBotError, Result};
use crate::ml::classifier::Classifier;
use crate::ml::hashing::{FeatureVector, LabeledPoint};

/// Gradient descent settings for [`SoftmaxClassifier`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Step size.
    pub learning_rate: f64,
    /// Passes over the training set.
    pub epochs: usize,
    /// Examples per gradient step.
    pub batch_size: usize,
    /// L2 regularization strength.
    pub l2: f64,
    /// Seed for the per-epoch shuffle.
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            epochs: 200,
            batch_size: 16,
            l2: 1e-4,
            seed: 42,
        }
    }
}

impl TrainingConfig {
    /// Check that the settings can drive training.
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(IntentBotError::invalid_config(
                "learning_rate must be a positive number",
            ));
        }
        if self.epochs == 0 {
            return Err(IntentBotError::invalid_config("epochs must be at least 1"));
        }
        if self.batch_size == 0 {
            return Err(IntentBotError::invalid_config(
                "batch_size must be at least 1",
            ));
        }
        if !(self.l2.is_finite() && self.l2 >= 0.0) {
            return Err(IntentBotError::invalid_config("l2 must not be negative"));
        }
        Ok(())
    }
}

/// A trained softmax model. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftmaxModel {
    num_features: usize,
    num_classes: usize,
    /// Label of each class, ascending.
    labels: Vec<u32>,
    /// Row-major `num_classes x num_features`.
    weights: Vec<f64>,
    biases: Vec<f64>,
    trained_at: DateTime<Utc>,
    training_examples: usize,
}

impl SoftmaxModel {
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Labels seen in training, in class order.
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    pub fn training_examples(&self) -> usize {
        self.training_examples
    }

    /// Class probabilities for a feature vector, in the order of [`labels`](Self::labels).
    pub fn probabilities(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        self.check_dimension(features)?;
        let mut scores = self.scores(features);
        softmax_in_place(&mut scores);
        Ok(scores)
    }

    /// Most likely label. Ties go to the lowest label.
    pub fn predict(&self, features: &FeatureVector) -> Result<u32> {
        self.check_dimension(features)?;
        let scores = self.scores(features);

        let mut best = 0;
        for (class, score) in scores.iter().enumerate().skip(1) {
            if *score > scores[best] {
                best = class;
            }
        }
        Ok(self.labels[best])
    }

    /// Write the model as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(std::fs::File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a model previously written with [`SoftmaxModel::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let model: SoftmaxModel = serde_json::from_reader(std::io::BufReader::new(file))?;
        if model.weights.len() != model.num_classes * model.num_features
            || model.biases.len() != model.num_classes
            || model.labels.len() != model.num_classes
        {
            return Err(IntentBotError::invalid_config(
                "model file has inconsistent weight dimensions",
            ));
        }
        Ok(model)
    }

    fn check_dimension(&self, features: &FeatureVector) -> Result<()> {
        if features.len() != self.num_features {
            return Err(IntentBotError::DimensionMismatch {
                expected: self.num_features,
                actual: features.len(),
            });
        }
        Ok(())
    }

    fn scores(&self, features: &FeatureVector) -> Vec<f64> {
        let mut scores = self.biases.clone();
        for (index, value) in features.iter_nonzero() {
            for (class, score) in scores.iter_mut().enumerate() {
                *score += self.weights[class * self.num_features + index] * value;
            }
        }
        scores
    }
}

fn softmax_in_place(scores: &mut [f64]) {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for score in scores.iter_mut() {
        *score = (*score - max).exp();
        sum += *score;
    }
    for score in scores.iter_mut() {
        *score /= sum;
    }
}

/// Multinomial logistic regression trained with mini-batch gradient descent.
///
/// Each distinct label gets its own class, in ascending label order, so
/// labels need not be contiguous. Training is deterministic for a given
/// [`TrainingConfig::seed`].
#[derive(Debug, Clone, Default)]
pub struct SoftmaxClassifier {
    config: TrainingConfig,
    model: Option<SoftmaxModel>,
}

impl SoftmaxClassifier {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            model: None,
        }
    }

    /// Wrap an already trained model.
    pub fn from_model(config: TrainingConfig, model: SoftmaxModel) -> Self {
        Self {
            config,
            model: Some(model),
        }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// The trained model, if any.
    pub fn model(&self) -> Option<&SoftmaxModel> {
        self.model.as_ref()
    }

    fn fit(&self, points: &[LabeledPoint]) -> Result<SoftmaxModel> {
        let first = points.first().ok_or(IntentBotError::EmptyTrainingSet)?;
        let num_features = first.features.len();
        if let Some(point) = points.iter().find(|p| p.features.len() != num_features) {
            return Err(IntentBotError::DimensionMismatch {
                expected: num_features,
                actual: point.features.len(),
            });
        }
        let mut labels: Vec<u32> = points.iter().map(|p| p.label).collect();
        labels.sort_unstable();
        labels.dedup();
        let num_classes = labels.len();
        let targets: Vec<usize> = points
            .iter()
            .map(|p| labels.partition_point(|&label| label < p.label))
            .collect();

        let mut model = SoftmaxModel {
            num_features,
            num_classes,
            labels,
            weights: vec![0.0; num_classes * num_features],
            biases: vec![0.0; num_classes],
            trained_at: Utc::now(),
            training_examples: points.len(),
        };

        let config = &self.config;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut order: Vec<usize> = (0..points.len()).collect();
        let mut weight_grad = vec![0.0; model.weights.len()];
        let mut bias_grad = vec![0.0; num_classes];

        for _ in 0..config.epochs {
            order.shuffle(&mut rng);

            for batch in order.chunks(config.batch_size) {
                weight_grad.iter_mut().for_each(|g| *g = 0.0);
                bias_grad.iter_mut().for_each(|g| *g = 0.0);

                for &i in batch {
                    let point = &points[i];
                    let mut probabilities = model.scores(&point.features);
                    softmax_in_place(&mut probabilities);

                    for (class, probability) in probabilities.iter().enumerate() {
                        let target = if class == targets[i] { 1.0 } else { 0.0 };
                        let error = probability - target;
                        bias_grad[class] += error;
                        for (index, value) in point.features.iter_nonzero() {
                            weight_grad[class * num_features + index] += error * value;
                        }
                    }
                }

                let step = config.learning_rate / batch.len() as f64;
                let decay = config.learning_rate * config.l2;
                for (weight, grad) in model.weights.iter_mut().zip(&weight_grad) {
                    *weight -= step * grad + decay * *weight;
                }
                for (bias, grad) in model.biases.iter_mut().zip(&bias_grad) {
                    *bias -= step * grad;
                }
            }
        }

        debug!(
            "Final training loss: {:.6}",
            mean_log_loss(&model, points, &targets)
        );
        Ok(model)
    }
}

fn mean_log_loss(model: &SoftmaxModel, points: &[LabeledPoint], targets: &[usize]) -> f64 {
    let total: f64 = points
        .iter()
        .zip(targets)
        .map(|(point, &target)| {
            let mut probabilities = model.scores(&point.features);
            softmax_in_place(&mut probabilities);
            -probabilities[target].max(f64::MIN_POSITIVE).ln()
        })
        .sum();
    total / points.len() as f64
}

impl Classifier for SoftmaxClassifier {
    fn train(&mut self, points: &[LabeledPoint]) -> Result<()> {
        self.config.validate()?;
        let start = Instant::now();
        let model = self.fit(points)?;
        info!(
            "Trained softmax model at {}: {} examples, {} classes, {} features in {} ms",
            model.trained_at.to_rfc3339(),
            model.training_examples,
            model.num_classes,
            model.num_features,
            start.elapsed().as_millis()
        );
        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, features: &FeatureVector) -> Result<u32> {
        self.model
            .as_ref()
            .ok_or(IntentBotError::ModelNotTrained)?
            .predict(features)
    }

    fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    fn name(&self) -> &str {
        "softmax"
    }
}
