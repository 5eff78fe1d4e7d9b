//! Inference engine: sample, classify, resolve, confirm.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use pricemap_model::{ColumnProfile, Role, SupplierSchema, Table};
use pricemap_standards::PatternCatalog;

use crate::content::{ContentClassifier, ContentScores};
use crate::error::{ClassificationError, MapError, Result};
use crate::header::HeaderClassifier;
use crate::hook::{Confirmation, ConfirmationHook};
use crate::resolve::{Claim, PricePolicy, Resolver};
use crate::sample::Sampler;

/// Knobs for a single inference run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferenceOptions {
    pub sampler: Sampler,
    /// Tops below this are not claims.
    pub min_confidence: f64,
    /// Assignments below this trigger the confirmation hook.
    pub confirm_threshold: f64,
    pub price_policy: PricePolicy,
    /// Fail the file on uninterpretable columns instead of leaving them
    /// undefined.
    pub strict_columns: bool,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            sampler: Sampler::default(),
            min_confidence: 0.5,
            confirm_threshold: 0.7,
            price_policy: PricePolicy::default(),
            strict_columns: false,
        }
    }
}

/// Result of inference over one table.
#[derive(Debug, Clone, Default)]
pub struct Inference {
    /// One profile per source column, in column order.
    pub profiles: Vec<ColumnProfile>,
    /// Columns with values but no evidence for any role.
    pub uninterpretable: Vec<usize>,
    pub warnings: Vec<String>,
    /// True when the confirmation hook was consulted.
    pub reviewed: bool,
}

impl Inference {
    /// Column assigned to `role`, if any.
    pub fn column_for(&self, role: Role) -> Option<&ColumnProfile> {
        self.profiles.iter().find(|p| p.assigned_role() == role)
    }
}

pub struct InferenceEngine<'a> {
    catalog: &'a PatternCatalog,
    options: InferenceOptions,
}

impl<'a> InferenceEngine<'a> {
    pub fn new(catalog: &'a PatternCatalog, options: InferenceOptions) -> Self {
        Self { catalog, options }
    }

    /// Infers a role for every column of `table`.
    ///
    /// Schema columns with a `source_header` pin the matching source column,
    /// which then wins its role whatever the scores say.
    pub fn infer(
        &self,
        table: &Table,
        schema: Option<&SupplierSchema>,
        hook: &dyn ConfirmationHook,
    ) -> Result<Inference> {
        let content = ContentClassifier::new(self.catalog);
        let header = HeaderClassifier::new(self.catalog);
        let mut inference = Inference::default();
        let mut claims = Vec::new();

        for index in 0..table.width() {
            let sample = self.options.sampler.sample(table.column(index));
            let header_text = table.header(index).map(str::to_string);
            let mut profile = ColumnProfile::new(index, header_text, sample);

            let (header_role, header_confidence) = header.classify(profile.header_text.as_deref());
            if header_role.is_defined() {
                profile.header_role = Some(header_role);
                profile.record_candidate(header_role, header_confidence);
            }

            let scores = match content.classify(index, &profile.sampled_values) {
                Ok(scores) => Some(scores),
                Err(ClassificationError::Uninterpretable { index }) => {
                    if profile.header_role.is_none() {
                        inference.uninterpretable.push(index);
                    }
                    None
                }
            };
            if let Some(scores) = &scores {
                for (role, confidence) in &scores.scores {
                    profile.record_candidate(*role, *confidence);
                }
            }

            match top_candidate(&profile, scores.as_ref()) {
                Some((role, confidence)) if confidence >= self.options.min_confidence => {
                    tracing::debug!(column = index, %role, confidence, "column claims role");
                    claims.push(Claim {
                        index,
                        role,
                        confidence,
                    });
                }
                Some((role, confidence)) => {
                    tracing::debug!(column = index, %role, confidence, "top candidate too weak");
                }
                None => {
                    tracing::debug!(column = index, "no candidates");
                }
            }
            inference.profiles.push(profile);
        }

        if let Some(schema) = schema {
            pin_schema_headers(&mut inference.profiles, table, schema);
        }
        let profiles = &inference.profiles;
        inference
            .uninterpretable
            .retain(|index| !profiles[*index].is_pinned());

        if !inference.uninterpretable.is_empty() {
            if self.options.strict_columns {
                return Err(MapError::UninterpretableColumns {
                    indices: inference.uninterpretable,
                });
            }
            for index in &inference.uninterpretable {
                tracing::warn!(column = index, "column is uninterpretable, left undefined");
                inference
                    .warnings
                    .push(format!("column {index} could not be interpreted and was left undefined"));
            }
        }

        let resolver = Resolver::new(self.options.price_policy, &self.catalog.thresholds);
        resolver.resolve(&mut inference.profiles, &claims)?;

        let weak = inference.profiles.iter().any(|p| {
            p.assigned_role().is_defined()
                && !p.is_pinned()
                && p.confidence() < self.options.confirm_threshold
        });
        if weak {
            inference.reviewed = true;
            match hook.review(&inference.profiles) {
                Confirmation::Accept => {}
                Confirmation::Reject => return Err(MapError::ConfirmationRejected),
                Confirmation::Remap(remap) => apply_remap(&mut inference.profiles, &remap)?,
            }
        }

        tracing::info!(
            columns = inference.profiles.len(),
            assigned = inference
                .profiles
                .iter()
                .filter(|p| p.assigned_role().is_defined())
                .count(),
            uninterpretable = inference.uninterpretable.len(),
            reviewed = inference.reviewed,
            "inferred column roles"
        );
        Ok(inference)
    }
}

/// Highest candidate; ties go to the header role, then to roles whose
/// statistical heuristic passed, then to the routing order.
fn top_candidate(profile: &ColumnProfile, scores: Option<&ContentScores>) -> Option<(Role, f64)> {
    let rank = |role: Role| scores.map_or(usize::MAX, |s| s.routing_rank(role));
    let stat = |role: Role| scores.is_some_and(|s| s.stat_passed.contains(&role));
    profile
        .candidate_roles
        .iter()
        .map(|(role, confidence)| (*role, *confidence))
        .max_by(|(role_a, conf_a), (role_b, conf_b)| {
            conf_a
                .total_cmp(conf_b)
                .then_with(|| {
                    let header_a = profile.header_role == Some(*role_a);
                    let header_b = profile.header_role == Some(*role_b);
                    header_a.cmp(&header_b)
                })
                .then_with(|| stat(*role_a).cmp(&stat(*role_b)))
                .then_with(|| match rank(*role_b).cmp(&rank(*role_a)) {
                    Ordering::Equal => role_b.cmp(role_a),
                    other => other,
                })
        })
}

/// Pins source columns whose header matches a schema `source_header`.
fn pin_schema_headers(profiles: &mut [ColumnProfile], table: &Table, schema: &SupplierSchema) {
    for column in &schema.columns {
        let Some(source_header) = column.source_header.as_deref() else {
            continue;
        };
        let Some(index) = table.column_index(source_header) else {
            tracing::debug!(role = %column.role, source_header, "pinned header not found");
            continue;
        };
        if profiles[index].is_pinned() {
            continue;
        }
        tracing::debug!(column = index, role = %column.role, "pinned by schema header");
        profiles[index].pin(column.role, 1.0);
    }
}

/// Applies reviewer overrides and re-establishes one column per role.
fn apply_remap(profiles: &mut [ColumnProfile], remap: &BTreeMap<usize, Role>) -> Result<()> {
    let width = profiles.len();
    for (index, role) in remap {
        if *index >= width {
            return Err(MapError::RemapOutOfRange {
                index: *index,
                width,
            });
        }
        if role.is_defined() {
            for other in profiles.iter_mut() {
                if other.index() != *index && other.assigned_role() == *role {
                    other.demote();
                }
            }
            profiles[*index].pin(*role, 1.0);
        } else {
            profiles[*index].demote();
        }
        tracing::info!(column = index, %role, "column remapped during confirmation");
    }
    Ok(())
}
