//! Content classifier: scores a column sample against the catalog.

use std::collections::{BTreeMap, BTreeSet};

use pricemap_model::{CellValue, NumberKind, Role};
use pricemap_standards::{PatternCatalog, Thresholds};

use crate::error::ClassificationError;
use crate::stats;

/// Dominant value type of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeMix {
    Integer,
    Float,
    Text,
    Mixed,
}

impl TypeMix {
    /// Buckets each value as integer-like, float-like or non-numeric and
    /// picks the dominant bucket.
    pub fn of(sample: &[CellValue], thresholds: &Thresholds) -> Self {
        if sample.is_empty() {
            return TypeMix::Mixed;
        }
        let mut integers = 0usize;
        let mut floats = 0usize;
        let mut text = 0usize;
        for cell in sample {
            match cell.number_kind() {
                Some(NumberKind::Integer) => integers += 1,
                Some(NumberKind::Fractional) => floats += 1,
                None => text += 1,
            }
        }
        let total = sample.len() as f64;
        if integers as f64 / total > thresholds.integer_mix {
            TypeMix::Integer
        } else if floats as f64 / total > thresholds.float_mix {
            TypeMix::Float
        } else if text as f64 / total > thresholds.text_mix {
            TypeMix::Text
        } else {
            TypeMix::Mixed
        }
    }

    /// Roles worth scoring for this mix, in tie-break order.
    pub fn routed_roles(&self, catalog: &PatternCatalog) -> Vec<Role> {
        match self {
            TypeMix::Integer => vec![Role::Quantity, Role::Price, Role::Article],
            TypeMix::Float => vec![Role::Price, Role::Quantity],
            TypeMix::Text => vec![
                Role::Brand,
                Role::Article,
                Role::Unit,
                Role::Category,
                Role::Name,
                Role::Description,
                Role::Quantity,
                Role::Price,
            ],
            TypeMix::Mixed => catalog.roles().collect(),
        }
    }
}

/// Content evidence for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentScores {
    pub mix: TypeMix,
    /// Roles that were scored, in tie-break order.
    pub routing: Vec<Role>,
    /// Non-zero scores only.
    pub scores: BTreeMap<Role, f64>,
    /// Roles whose statistical heuristic passed.
    pub stat_passed: BTreeSet<Role>,
}

impl ContentScores {
    fn empty(mix: TypeMix) -> Self {
        Self {
            mix,
            routing: Vec::new(),
            scores: BTreeMap::new(),
            stat_passed: BTreeSet::new(),
        }
    }

    pub fn score(&self, role: Role) -> f64 {
        self.scores.get(&role).copied().unwrap_or(0.0)
    }

    /// Position of `role` in the routing order, or after every routed role.
    pub fn routing_rank(&self, role: Role) -> usize {
        self.routing
            .iter()
            .position(|routed| *routed == role)
            .unwrap_or(self.routing.len())
    }
}

pub struct ContentClassifier<'a> {
    catalog: &'a PatternCatalog,
}

impl<'a> ContentClassifier<'a> {
    pub fn new(catalog: &'a PatternCatalog) -> Self {
        Self { catalog }
    }

    /// Scores `sample` (taken from column `index`) against its routed roles.
    ///
    /// An empty sample yields empty scores. A non-empty sample that scores
    /// zero for every routed role is uninterpretable.
    pub fn classify(
        &self,
        index: usize,
        sample: &[CellValue],
    ) -> Result<ContentScores, ClassificationError> {
        let thresholds = &self.catalog.thresholds;
        let mix = TypeMix::of(sample, thresholds);
        if sample.is_empty() {
            return Ok(ContentScores::empty(mix));
        }
        let mut result = ContentScores::empty(mix);
        result.routing = mix.routed_roles(self.catalog);

        for role in result.routing.clone() {
            let mut confidence = self.pattern_confidence(role, sample);
            match role {
                Role::Price if stats::price_signal(sample, thresholds) => {
                    confidence = confidence.max(thresholds.price_boost);
                    result.stat_passed.insert(role);
                }
                Role::Quantity if stats::quantity_signal(sample, thresholds) => {
                    confidence = confidence.max(thresholds.quantity_boost);
                    result.stat_passed.insert(role);
                }
                Role::Article if stats::article_signal(sample, thresholds) => {
                    confidence = confidence.max(thresholds.article_boost);
                    result.stat_passed.insert(role);
                }
                Role::Article => {
                    confidence = confidence.min(thresholds.article_uncoded_max);
                }
                Role::Brand
                    if stats::average_length(sample) >= thresholds.brand_max_avg_length =>
                {
                    confidence = 0.0;
                }
                Role::Name if stats::average_length(sample) < thresholds.name_min_avg_length => {
                    confidence = 0.0;
                }
                Role::Category
                    if stats::unique_ratio(sample) > thresholds.category_max_unique_ratio =>
                {
                    confidence = 0.0;
                }
                Role::Description
                    if stats::average_length(sample) > thresholds.description_min_avg_length =>
                {
                    confidence = confidence.max(thresholds.description_confidence);
                    result.stat_passed.insert(role);
                }
                _ => {}
            }
            if confidence > 0.0 {
                result.scores.insert(role, confidence);
            }
        }

        if result.scores.is_empty() {
            return Err(ClassificationError::Uninterpretable { index });
        }
        Ok(result)
    }

    /// Share of the sample matching any of the role's patterns or keywords.
    fn pattern_confidence(&self, role: Role, sample: &[CellValue]) -> f64 {
        let Some(entry) = self.catalog.role(role) else {
            return 0.0;
        };
        if !entry.has_content_rules() {
            return 0.0;
        }
        let matched = sample
            .iter()
            .filter(|cell| entry.matches_value(&cell.to_string()))
            .count();
        matched as f64 / sample.len() as f64
    }
}
