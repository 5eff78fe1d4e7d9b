//! Per-column classification state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{CellValue, Role};

/// Everything the classifiers learned about one source column.
///
/// Profiles are built fresh for each file. The `index` is fixed at creation;
/// `assigned_role` starts as [`Role::Undefined`] and is only set by the
/// resolver or an explicit pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    index: usize,
    pub header_text: Option<String>,
    pub sampled_values: Vec<CellValue>,
    /// Role → confidence in `[0, 1]`.
    pub candidate_roles: BTreeMap<Role, f64>,
    /// Role suggested by the header classifier, if any.
    pub header_role: Option<Role>,
    assigned_role: Role,
    confidence: f64,
    pinned: bool,
}

impl ColumnProfile {
    pub fn new(index: usize, header_text: Option<String>, sampled_values: Vec<CellValue>) -> Self {
        Self {
            index,
            header_text,
            sampled_values,
            candidate_roles: BTreeMap::new(),
            header_role: None,
            assigned_role: Role::Undefined,
            confidence: 0.0,
            pinned: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn assigned_role(&self) -> Role {
        self.assigned_role
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// True when the role was fixed explicitly rather than inferred.
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Raises the candidate confidence for `role`, keeping the larger value.
    pub fn record_candidate(&mut self, role: Role, confidence: f64) {
        if !role.is_defined() || confidence <= 0.0 {
            return;
        }
        let confidence = confidence.clamp(0.0, 1.0);
        let entry = self.candidate_roles.entry(role).or_insert(0.0);
        if confidence > *entry {
            *entry = confidence;
        }
    }

    pub fn candidate(&self, role: Role) -> f64 {
        self.candidate_roles.get(&role).copied().unwrap_or(0.0)
    }

    /// Assigns a role. Assigning [`Role::Undefined`] is the same as [`demote`](Self::demote).
    pub fn assign(&mut self, role: Role, confidence: f64) {
        if role.is_defined() {
            self.assigned_role = role;
            self.confidence = confidence.clamp(0.0, 1.0);
        } else {
            self.demote();
        }
    }

    /// Assigns a role that later stages must not override.
    pub fn pin(&mut self, role: Role, confidence: f64) {
        self.assign(role, confidence);
        self.pinned = role.is_defined();
    }

    /// Resets the column to [`Role::Undefined`] with zero confidence.
    pub fn demote(&mut self) {
        self.assigned_role = Role::Undefined;
        self.confidence = 0.0;
        self.pinned = false;
    }

    /// Candidates sorted by descending confidence; ties keep role order.
    pub fn ranked_candidates(&self) -> Vec<(Role, f64)> {
        let mut ranked: Vec<(Role, f64)> = self
            .candidate_roles
            .iter()
            .map(|(role, confidence)| (*role, *confidence))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    /// Average character length of the stringified sample.
    pub fn average_length(&self) -> f64 {
        if self.sampled_values.is_empty() {
            return 0.0;
        }
        let total: usize = self.sampled_values.iter().map(CellValue::display_len).sum();
        total as f64 / self.sampled_values.len() as f64
    }

    /// Average of the numeric values in the sample, or `None` when it has none.
    pub fn average_value(&self) -> Option<f64> {
        let values: Vec<f64> = self
            .sampled_values
            .iter()
            .filter_map(CellValue::as_f64)
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }

    /// True when the sample holds the literal value 1.
    pub fn contains_one(&self) -> bool {
        self.sampled_values
            .iter()
            .filter_map(CellValue::as_f64)
            .any(|value| value == 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(values: Vec<CellValue>) -> ColumnProfile {
        ColumnProfile::new(0, Some("col".into()), values)
    }

    #[test]
    fn demote_clears_confidence() {
        let mut column = profile(vec![]);
        column.pin(Role::Price, 0.9);
        assert!(column.is_pinned());
        column.demote();
        assert_eq!(column.assigned_role(), Role::Undefined);
        assert_eq!(column.confidence(), 0.0);
        assert!(!column.is_pinned());
    }

    #[test]
    fn assigning_undefined_zeroes_confidence() {
        let mut column = profile(vec![]);
        column.assign(Role::Undefined, 0.7);
        assert_eq!(column.confidence(), 0.0);
    }

    #[test]
    fn candidates_keep_the_strongest_evidence() {
        let mut column = profile(vec![]);
        column.record_candidate(Role::Price, 0.4);
        column.record_candidate(Role::Price, 0.9);
        column.record_candidate(Role::Price, 0.2);
        column.record_candidate(Role::Quantity, 0.0);
        assert_eq!(column.candidate(Role::Price), 0.9);
        assert!(!column.candidate_roles.contains_key(&Role::Quantity));
    }

    #[test]
    fn sample_statistics() {
        let column = profile(vec![
            CellValue::Int(1),
            CellValue::Float(2.0),
            CellValue::Text("12".into()),
        ]);
        assert_eq!(column.average_value(), Some(5.0));
        assert!(column.contains_one());
        assert!((column.average_length() - 4.0 / 3.0).abs() < 1e-9);
    }
}
