use serde::{Deserialize, Serialize};

use crate::Role;

/// One required output column of a supplier layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaColumn {
    pub role: Role,
    /// 1-based output position.
    pub position: usize,
    /// Header written to the normalized file.
    pub title: String,
    /// Exact source header that pins a column to this role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_header: Option<String>,
}

/// Target layout for files of one supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierSchema {
    pub key: String,
    pub name: String,
    pub version: u32,
    #[serde(default)]
    pub file_patterns: Vec<String>,
    pub columns: Vec<SchemaColumn>,
}

impl SupplierSchema {
    pub fn column_for(&self, role: Role) -> Option<&SchemaColumn> {
        self.columns.iter().find(|column| column.role == role)
    }

    pub fn max_position(&self) -> usize {
        self.columns.iter().map(|c| c.position).max().unwrap_or(0)
    }

    /// Columns sorted by output position.
    pub fn ordered_columns(&self) -> Vec<&SchemaColumn> {
        let mut columns: Vec<&SchemaColumn> = self.columns.iter().collect();
        columns.sort_by_key(|column| column.position);
        columns
    }

    pub fn lists(&self, role: Role) -> bool {
        self.column_for(role).is_some()
    }
}
