//! Structured outcome of processing one file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{ColumnProfile, Role};

/// Which pipeline handled a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessorKind {
    /// Column inference and projection onto a supplier layout.
    PriceList,
    /// Row-level correction of the goods-movement report.
    GoodsMovement,
    /// Sale multiple annotation.
    Multiplicity,
}

impl ProcessorKind {
    pub const ALL: [ProcessorKind; 3] = [
        ProcessorKind::PriceList,
        ProcessorKind::GoodsMovement,
        ProcessorKind::Multiplicity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessorKind::PriceList => "price_list",
            ProcessorKind::GoodsMovement => "goods_movement",
            ProcessorKind::Multiplicity => "multiplicity",
        }
    }
}

impl fmt::Display for ProcessorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProcessorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown processor: {s}"))
    }
}

/// Failure taxonomy shared by every pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No encoding or container reader could make sense of the bytes.
    UnreadableInput,
    /// A column carries no evidence for any role.
    UninterpretableColumn,
    /// Required roles or named columns are absent and have no default.
    MissingRequiredColumn,
    /// Several columns compete for a role and no rule picks one.
    AmbiguousRoleUnresolved,
    /// No supplier layout matches the file and no default is configured.
    UnknownSchema,
    /// Output could not be produced; the same input may succeed later.
    Transient,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::UnreadableInput => "unreadable_input",
            FailureKind::UninterpretableColumn => "uninterpretable_column",
            FailureKind::MissingRequiredColumn => "missing_required_column",
            FailureKind::AmbiguousRoleUnresolved => "ambiguous_role_unresolved",
            FailureKind::UnknownSchema => "unknown_schema",
            FailureKind::Transient => "transient",
        }
    }

    /// Only transient failures are worth retrying with the same input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FailureKind::Transient)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed failure attached to a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
    /// Source column indexes involved (uninterpretable or competing columns).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<usize>,
    /// Missing roles or column names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            columns: Vec::new(),
            missing: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_columns(mut self, columns: Vec<usize>) -> Self {
        self.columns = columns;
        self
    }

    #[must_use]
    pub fn with_missing(mut self, missing: Vec<String>) -> Self {
        self.missing = missing;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleScore {
    pub role: Role,
    pub confidence: f64,
}

/// Final role of one source column as reported to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnAssignment {
    pub index: usize,
    pub header: Option<String>,
    pub role: Role,
    pub confidence: f64,
    pub pinned: bool,
    pub candidates: Vec<RoleScore>,
    /// 1-based position in the normalized output, when projected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_position: Option<usize>,
}

impl From<&ColumnProfile> for ColumnAssignment {
    fn from(profile: &ColumnProfile) -> Self {
        Self {
            index: profile.index(),
            header: profile.header_text.clone(),
            role: profile.assigned_role(),
            confidence: profile.confidence(),
            pinned: profile.is_pinned(),
            candidates: profile
                .ranked_candidates()
                .into_iter()
                .map(|(role, confidence)| RoleScore { role, confidence })
                .collect(),
            output_position: None,
        }
    }
}

/// Report returned alongside the output bytes of every pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub processor: ProcessorKind,
    pub file_name: String,
    /// Name for the produced file; `None` when the input is passed through.
    pub output_file_name: Option<String>,
    /// Supplier layout used for projection.
    pub schema: Option<String>,
    pub columns: Vec<ColumnAssignment>,
    pub warnings: Vec<String>,
    pub rows_read: usize,
    pub rows_written: usize,
    pub cells_changed: usize,
    pub failure: Option<Failure>,
}

impl FileReport {
    pub fn new(processor: ProcessorKind, file_name: impl Into<String>) -> Self {
        Self {
            processor,
            file_name: file_name.into(),
            output_file_name: None,
            schema: None,
            columns: Vec::new(),
            warnings: Vec::new(),
            rows_read: 0,
            rows_written: 0,
            cells_changed: 0,
            failure: None,
        }
    }

    pub fn success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure.as_ref().map(|failure| failure.kind)
    }

    pub fn column(&self, index: usize) -> Option<&ColumnAssignment> {
        self.columns.iter().find(|column| column.index == index)
    }

    /// The column that ended up with `role`, if any.
    pub fn column_for(&self, role: Role) -> Option<&ColumnAssignment> {
        self.columns.iter().find(|column| column.role == role)
    }

    /// Marks the run as failed and drops any output name.
    pub fn fail(&mut self, failure: Failure) {
        self.output_file_name = None;
        self.failure = Some(failure);
    }
}
