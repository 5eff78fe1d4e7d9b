#![deny(unsafe_code)]

//! Column role inference.
//!
//! Each column of a table is sampled once, scored by the content and
//! header classifiers, and reduced to a single top claim. The resolver then
//! keeps at most one column per role, and an optional [`ConfirmationHook`]
//! may review low-confidence results before they are used.

pub mod content;
pub mod engine;
pub mod error;
pub mod header;
pub mod hook;
pub mod resolve;
pub mod sample;
pub mod stats;

pub use content::{ContentClassifier, ContentScores, TypeMix};
pub use engine::{Inference, InferenceEngine, InferenceOptions};
pub use error::{ClassificationError, MapError, Result};
pub use header::HeaderClassifier;
pub use hook::{Confirmation, ConfirmationHook, NoConfirmation};
pub use resolve::{Claim, PricePolicy, Resolver};
pub use sample::{DEFAULT_SAMPLE_SIZE, DEFAULT_SEED, Sampler};
