//! Text analysis for intentbot.
//!
//! Questions and training utterances are split into tokens before they are
//! hashed into feature vectors. Only whitespace tokenization is provided.

pub mod token;
pub mod tokenizer;
