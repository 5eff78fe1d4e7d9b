//! Schema projection.

use std::collections::{BTreeMap, BTreeSet};

use pricemap_model::{CellValue, ColumnProfile, Role, SupplierSchema, Table};
use pricemap_standards::PatternCatalog;

use crate::error::{ProjectionError, Result};
use crate::rows::is_data_row;

/// Where an output column comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputSource {
    /// A source column, by index.
    Column(usize),
    /// A constant for a missing defaultable role.
    Default(Role, CellValue),
}

/// A projected table plus how it was assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub table: Table,
    pub sources: Vec<OutputSource>,
    /// Source column index to 1-based output position.
    pub output_positions: BTreeMap<usize, usize>,
    /// Roles filled with a default constant.
    pub synthesized: Vec<Role>,
    pub rows_dropped: usize,
}

/// Rebuilds `table` in `schema` order.
///
/// Schema positions come first, then every column the schema does not claim
/// in source order. A required role with no assigned column is filled with
/// the catalog default when it has one; otherwise projection fails naming
/// every such role. Rows with fewer than two filled source cells are
/// dropped.
pub fn project(
    table: &Table,
    profiles: &[ColumnProfile],
    schema: &SupplierSchema,
    catalog: &PatternCatalog,
) -> Result<Projection> {
    let mut assigned: BTreeMap<Role, usize> = BTreeMap::new();
    for profile in profiles {
        let role = profile.assigned_role();
        if role.is_defined() && assigned.insert(role, profile.index()).is_some() {
            return Err(ProjectionError::DuplicateAssignment { role });
        }
    }

    let mut headers: Vec<Option<String>> = Vec::new();
    let mut sources: Vec<OutputSource> = Vec::new();
    let mut output_positions = BTreeMap::new();
    let mut synthesized = Vec::new();
    let mut missing = Vec::new();
    let mut claimed = BTreeSet::new();

    for column in schema.ordered_columns() {
        match assigned.get(&column.role) {
            Some(&index) => {
                claimed.insert(index);
                output_positions.insert(index, column.position);
                sources.push(OutputSource::Column(index));
            }
            None => match catalog.default_for(column.role) {
                Some(value) => {
                    synthesized.push(column.role);
                    sources.push(OutputSource::Default(column.role, value.clone()));
                }
                None => missing.push(column.role),
            },
        }
        headers.push(Some(column.title.clone()));
    }
    if !missing.is_empty() {
        return Err(ProjectionError::MissingRequiredRoles { roles: missing });
    }

    for index in (0..table.width()).filter(|index| !claimed.contains(index)) {
        headers.push(table.headers.get(index).cloned().flatten());
        sources.push(OutputSource::Column(index));
        output_positions.insert(index, sources.len());
    }

    let mut rows = Vec::with_capacity(table.height());
    let mut rows_dropped = 0;
    for row in &table.rows {
        if !is_data_row(row) {
            rows_dropped += 1;
            continue;
        }
        rows.push(
            sources
                .iter()
                .map(|source| match source {
                    OutputSource::Column(index) => row.get(*index).cloned().unwrap_or_default(),
                    OutputSource::Default(_, value) => value.clone(),
                })
                .collect(),
        );
    }

    if !synthesized.is_empty() {
        tracing::info!(roles = ?synthesized, "synthesized default columns");
    }
    if rows_dropped > 0 {
        tracing::debug!(rows_dropped, "dropped sparse rows");
    }
    Ok(Projection {
        table: Table::new(headers, rows),
        sources,
        output_positions,
        synthesized,
        rows_dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricemap_standards::embedded_standards;

    fn schema() -> &'static SupplierSchema {
        embedded_standards()
            .unwrap()
            .suppliers
            .get("generic")
            .unwrap()
    }

    fn catalog() -> &'static PatternCatalog {
        &embedded_standards().unwrap().catalog
    }

    fn profiles(roles: &[Role]) -> Vec<ColumnProfile> {
        roles
            .iter()
            .enumerate()
            .map(|(index, role)| {
                let mut profile = ColumnProfile::new(index, None, Vec::new());
                profile.assign(*role, 1.0);
                profile
            })
            .collect()
    }

    #[test]
    fn relocates_columns_without_overwriting() {
        let table = Table::from_strings(
            &["Цена", "Артикул", "Кол", "Бренд"],
            vec![vec![
                CellValue::Int(100),
                CellValue::from("A1"),
                CellValue::Int(2),
                CellValue::from("KYB"),
            ]],
        );
        let roles = [Role::Price, Role::Article, Role::Quantity, Role::Brand];
        let projection = project(&table, &profiles(&roles), schema(), catalog()).unwrap();
        assert_eq!(
            projection.table.rows[0],
            vec![
                CellValue::from("A1"),
                CellValue::from("KYB"),
                CellValue::Int(100),
                CellValue::Int(2),
            ]
        );
        assert_eq!(projection.output_positions[&0], 3);
        assert!(projection.synthesized.is_empty());
    }

    #[test]
    fn duplicate_roles_are_rejected() {
        let table = Table::from_strings(&["a", "b"], vec![]);
        let err = project(
            &table,
            &profiles(&[Role::Brand, Role::Brand]),
            schema(),
            catalog(),
        )
        .unwrap_err();
        assert_eq!(err, ProjectionError::DuplicateAssignment { role: Role::Brand });
    }
}
