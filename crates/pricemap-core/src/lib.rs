#![deny(unsafe_code)]

//! Entry points of the price-list service.
//!
//! [`infer_and_normalize`] projects a supplier price list onto its layout,
//! [`rewrite_report`] corrects a goods-movement report and
//! [`annotate_multiplicity`] adds sale multiples to a product list. All three
//! take bytes and return bytes plus a [`FileReport`](pricemap_model::FileReport);
//! a failed run returns the input unchanged with a typed failure attached.
//! [`ProcessingPipeline`] dispatches files to these through a
//! [`ProcessorRegistry`].

pub mod error;
pub mod normalize;
pub mod options;
pub mod outcome;
pub mod pipeline;
pub mod processor;
pub mod rewrite;

pub use error::{ProcessingError, Result};
pub use normalize::{analyze, infer_and_normalize, infer_and_normalize_with};
pub use options::{NORMALIZED_SUFFIX, NormalizeOptions};
pub use outcome::ProcessOutcome;
pub use pipeline::ProcessingPipeline;
pub use processor::{
    FileProcessor, GoodsMovementProcessor, MultiplicityProcessor, PriceListProcessor,
    ProcessorRegistry, SharedHook, default_registry,
};
pub use rewrite::{MULTIPLICITY_SUFFIX, annotate_multiplicity, rewrite_report};
