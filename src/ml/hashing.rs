//! Feature hashing vectorizer for text feature extraction.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::{Tokenizer, WhitespaceTokenizer};
use crate::error::{IntentBotError, Result};

/// Default dimensionality of hashed feature vectors.
pub const DEFAULT_NUM_FEATURES: usize = 100;

/// A dense, fixed-length feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Create an all-zero vector of the given dimension.
    pub fn zeros(dimension: usize) -> Self {
        FeatureVector(vec![0.0; dimension])
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector has no components.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the components.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of non-zero components.
    pub fn nnz(&self) -> usize {
        self.0.iter().filter(|v| **v != 0.0).count()
    }

    /// Iterate over `(index, value)` pairs of the non-zero components.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, v)| (i, *v))
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        FeatureVector(values)
    }
}

/// A feature vector paired with the label of the intent it was drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint {
    /// Intent label.
    pub label: u32,
    /// Hashed features.
    pub features: FeatureVector,
}

impl LabeledPoint {
    pub fn new(label: u32, features: FeatureVector) -> Self {
        Self { label, features }
    }
}

/// Maps text to term-frequency vectors of a fixed dimension.
///
/// Each token lands in bucket `crc32(token) % num_features`. The vectorizer
/// keeps no vocabulary, so the same instance (or one built with the same
/// dimension) must be used for training and prediction.
#[derive(Clone)]
pub struct HashingVectorizer {
    num_features: usize,
    tokenizer: Arc<dyn Tokenizer>,
}

impl std::fmt::Debug for HashingVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashingVectorizer")
            .field("num_features", &self.num_features)
            .field("tokenizer", &self.tokenizer.name())
            .finish()
    }
}

impl HashingVectorizer {
    /// Create a vectorizer that splits text on whitespace.
    pub fn new(num_features: usize) -> Result<Self> {
        Self::with_tokenizer(num_features, Arc::new(WhitespaceTokenizer::new()))
    }

    /// Create a vectorizer with a custom tokenizer.
    pub fn with_tokenizer(num_features: usize, tokenizer: Arc<dyn Tokenizer>) -> Result<Self> {
        if num_features == 0 {
            return Err(IntentBotError::invalid_config(
                "num_features must be greater than zero",
            ));
        }
        Ok(Self {
            num_features,
            tokenizer,
        })
    }

    /// Transform a document into a term-frequency vector.
    pub fn transform(&self, document: &str) -> Result<FeatureVector> {
        let mut features = vec![0.0; self.num_features];
        for token in self.tokenizer.tokenize(document)? {
            features[self.index_of(&token.text)] += 1.0;
        }
        Ok(FeatureVector(features))
    }

    /// Bucket index of a single term.
    pub fn index_of(&self, term: &str) -> usize {
        crc32fast::hash(term.as_bytes()) as usize % self.num_features
    }

    /// Dimension of the produced vectors.
    pub fn num_features(&self) -> usize {
        self.num_features
    }
}

impl Default for HashingVectorizer {
    fn default() -> Self {
        Self {
            num_features: DEFAULT_NUM_FEATURES,
            tokenizer: Arc::new(WhitespaceTokenizer::new()),
        }
    }
}
