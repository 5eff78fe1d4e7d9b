//! Runtime options for the normalization pipeline.

use pricemap_ingest::{CsvOptions, HeaderMode, ReadOptions};
use pricemap_map::{InferenceOptions, PricePolicy, Sampler};

/// Suffix appended to the stem of normalized output files.
pub const NORMALIZED_SUFFIX: &str = "_normalized";

/// Options for [`infer_and_normalize`](crate::infer_and_normalize).
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    pub inference: InferenceOptions,
    pub read: ReadOptions,
}

impl NormalizeOptions {
    #[must_use]
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.inference.sampler = Sampler::new(size, self.inference.sampler.seed);
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.inference.sampler = Sampler::new(self.inference.sampler.size, seed);
        self
    }

    #[must_use]
    pub fn with_min_confidence(mut self, value: f64) -> Self {
        self.inference.min_confidence = value;
        self
    }

    #[must_use]
    pub fn with_confirm_threshold(mut self, value: f64) -> Self {
        self.inference.confirm_threshold = value;
        self
    }

    #[must_use]
    pub fn with_price_policy(mut self, policy: PricePolicy) -> Self {
        self.inference.price_policy = policy;
        self
    }

    /// Fail files with uninterpretable columns instead of leaving them
    /// undefined.
    #[must_use]
    pub fn with_strict_columns(mut self, strict: bool) -> Self {
        self.inference.strict_columns = strict;
        self
    }

    #[must_use]
    pub fn with_csv(mut self, csv: CsvOptions) -> Self {
        self.read.csv = csv;
        self
    }

    #[must_use]
    pub fn with_header_mode(mut self, mode: HeaderMode) -> Self {
        self.read.header = mode;
        self
    }
}
