//! File processors and their registry.
//!
//! Each pipeline is wrapped in a [`FileProcessor`] so callers can dispatch a
//! file by [`ProcessorKind`] without knowing which entry point handles it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use pricemap_map::{ConfirmationHook, NoConfirmation};
use pricemap_model::ProcessorKind;
use pricemap_standards::Standards;

use crate::normalize::infer_and_normalize_with;
use crate::options::NormalizeOptions;
use crate::outcome::ProcessOutcome;
use crate::rewrite::{annotate_multiplicity, rewrite_report};

/// A pipeline that turns one input file into an output file and a report.
pub trait FileProcessor: Send + Sync {
    fn kind(&self) -> ProcessorKind;

    fn description(&self) -> &'static str {
        "File processor"
    }

    /// Processes `bytes`. Implementations never fail outright: a failed run
    /// returns the input bytes with the failure in the report.
    fn process(&self, bytes: &[u8], file_name: &str, standards: &Standards) -> ProcessOutcome;
}

/// Reviewer shared between threads.
pub type SharedHook = Arc<dyn ConfirmationHook + Send + Sync>;

/// Price-list normalization.
#[derive(Clone)]
pub struct PriceListProcessor {
    options: NormalizeOptions,
    hook: SharedHook,
}

impl PriceListProcessor {
    pub fn new(options: NormalizeOptions) -> Self {
        Self {
            options,
            hook: Arc::new(NoConfirmation),
        }
    }

    #[must_use]
    pub fn with_hook(mut self, hook: SharedHook) -> Self {
        self.hook = hook;
        self
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }
}

impl Default for PriceListProcessor {
    fn default() -> Self {
        Self::new(NormalizeOptions::default())
    }
}

impl fmt::Debug for PriceListProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriceListProcessor")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl FileProcessor for PriceListProcessor {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::PriceList
    }

    fn description(&self) -> &'static str {
        "Infers column roles and projects the price list onto its supplier layout"
    }

    fn process(&self, bytes: &[u8], file_name: &str, standards: &Standards) -> ProcessOutcome {
        infer_and_normalize_with(bytes, file_name, standards, &self.options, self.hook.as_ref())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GoodsMovementProcessor;

impl FileProcessor for GoodsMovementProcessor {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::GoodsMovement
    }

    fn description(&self) -> &'static str {
        "Rounds quantities to move down to the sale multiple"
    }

    fn process(&self, bytes: &[u8], file_name: &str, standards: &Standards) -> ProcessOutcome {
        rewrite_report(bytes, file_name, standards)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MultiplicityProcessor;

impl FileProcessor for MultiplicityProcessor {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::Multiplicity
    }

    fn description(&self) -> &'static str {
        "Annotates every product with its sale multiple"
    }

    fn process(&self, bytes: &[u8], file_name: &str, standards: &Standards) -> ProcessOutcome {
        annotate_multiplicity(bytes, file_name, standards)
    }
}

/// Processors indexed by kind.
pub struct ProcessorRegistry {
    processors: BTreeMap<ProcessorKind, Box<dyn FileProcessor>>,
}

impl ProcessorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            processors: BTreeMap::new(),
        }
    }

    /// Registers a processor for its kind, replacing any previous one.
    pub fn register(&mut self, processor: Box<dyn FileProcessor>) {
        self.processors.insert(processor.kind(), processor);
    }

    pub fn get(&self, kind: ProcessorKind) -> Option<&dyn FileProcessor> {
        self.processors.get(&kind).map(Box::as_ref)
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Registered kinds in declaration order.
    pub fn kinds(&self) -> impl Iterator<Item = ProcessorKind> + '_ {
        self.processors.keys().copied()
    }
}

impl Default for ProcessorRegistry {
    /// Registry with every built-in processor and default options.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(PriceListProcessor::default()));
        registry.register(Box::new(GoodsMovementProcessor));
        registry.register(Box::new(MultiplicityProcessor));
        registry
    }
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}

static DEFAULT_REGISTRY: OnceLock<ProcessorRegistry> = OnceLock::new();

/// Process-wide registry of the built-in processors.
pub fn default_registry() -> &'static ProcessorRegistry {
    DEFAULT_REGISTRY.get_or_init(ProcessorRegistry::default)
}
