//! Supplier layout registry.

use std::collections::BTreeSet;

use regex::Regex;
use serde::Deserialize;

use pricemap_model::SupplierSchema;

use crate::error::{Result, StandardsError};

#[derive(Debug, Clone, Deserialize)]
struct SuppliersFile {
    version: String,
    #[serde(default)]
    default_schema: Option<String>,
    #[serde(default)]
    schemas: Vec<SupplierSchema>,
}

/// Immutable set of supplier layouts, looked up by key or file name.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    pub version: String,
    default_schema: Option<String>,
    schemas: Vec<SupplierSchema>,
    /// `(schema index, compiled file pattern)` in declaration order.
    patterns: Vec<(usize, Regex)>,
}

impl SchemaRegistry {
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self> {
        let file: SuppliersFile =
            toml::from_str(text).map_err(|source| StandardsError::toml(origin, source))?;
        Self::new(file.version, file.default_schema, file.schemas)
    }

    /// Validates and indexes a set of schemas.
    pub fn new(
        version: String,
        default_schema: Option<String>,
        schemas: Vec<SupplierSchema>,
    ) -> Result<Self> {
        let mut keys = BTreeSet::new();
        for schema in &schemas {
            validate_schema(schema)?;
            if !keys.insert(normalize_key(&schema.key)) {
                return Err(StandardsError::DuplicateSchema {
                    key: schema.key.clone(),
                });
            }
        }
        if let Some(key) = &default_schema {
            if !keys.contains(&normalize_key(key)) {
                return Err(StandardsError::UnknownDefaultSchema { key: key.clone() });
            }
        }
        let mut patterns = Vec::new();
        for (index, schema) in schemas.iter().enumerate() {
            for pattern in &schema.file_patterns {
                patterns.push((index, compile_file_pattern(&schema.key, pattern)?));
            }
        }
        Ok(Self {
            version,
            default_schema,
            schemas,
            patterns,
        })
    }

    pub fn schemas(&self) -> &[SupplierSchema] {
        &self.schemas
    }

    /// Exact lookup by schema key.
    pub fn get(&self, key: &str) -> Option<&SupplierSchema> {
        let wanted = normalize_key(key);
        self.schemas
            .iter()
            .find(|schema| normalize_key(&schema.key) == wanted)
    }

    pub fn default_schema(&self) -> Option<&SupplierSchema> {
        self.default_schema.as_deref().and_then(|key| self.get(key))
    }

    /// Finds the layout for a schema key or a file name.
    ///
    /// The extension is stripped from file names; the key is tried first,
    /// then each schema's file patterns in declaration order.
    pub fn find(&self, file_name_or_key: &str) -> Option<&SupplierSchema> {
        let stem = file_stem(file_name_or_key);
        if let Some(schema) = self.get(stem) {
            return Some(schema);
        }
        let normalized = normalize_key(stem);
        self.patterns
            .iter()
            .find(|(_, pattern)| pattern.is_match(&normalized))
            .map(|(index, _)| &self.schemas[*index])
    }

    /// Like [`find`](Self::find), falling back to the configured default.
    pub fn resolve(&self, file_name_or_key: &str) -> Option<&SupplierSchema> {
        self.find(file_name_or_key)
            .or_else(|| self.default_schema())
    }
}

/// Lower-cases and keeps only letters and digits.
pub fn normalize_key(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn file_stem(name: &str) -> &str {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rsplit_once('.') {
        Some((stem, extension))
            if !stem.is_empty() && !extension.is_empty() && !extension.contains(' ') =>
        {
            stem
        }
        _ => base,
    }
}

fn compile_file_pattern(key: &str, pattern: &str) -> Result<Regex> {
    let body = pattern
        .split('*')
        .map(|part| regex::escape(&normalize_key(part)))
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^{body}$")).map_err(|err| StandardsError::InvalidSchema {
        key: key.to_string(),
        message: format!("bad file pattern '{pattern}': {err}"),
    })
}

fn validate_schema(schema: &SupplierSchema) -> Result<()> {
    let invalid = |message: String| StandardsError::InvalidSchema {
        key: schema.key.clone(),
        message,
    };
    if normalize_key(&schema.key).is_empty() {
        return Err(invalid("key must contain letters or digits".to_string()));
    }
    if schema.columns.is_empty() {
        return Err(invalid("schema has no columns".to_string()));
    }
    let mut roles = BTreeSet::new();
    let mut positions = BTreeSet::new();
    for column in &schema.columns {
        if !column.role.is_defined() {
            return Err(invalid("the undefined role cannot be required".to_string()));
        }
        if !roles.insert(column.role) {
            return Err(invalid(format!("role {} is listed twice", column.role)));
        }
        if column.position == 0 {
            return Err(invalid("positions are 1-based".to_string()));
        }
        if !positions.insert(column.position) {
            return Err(invalid(format!(
                "position {} is used twice",
                column.position
            )));
        }
    }
    let max = schema.max_position();
    if positions.len() != max {
        return Err(invalid(format!(
            "positions must be contiguous from 1 to {max}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SCHEMAS: &str = r#"
version = "1"
default_schema = "generic"

[[schemas]]
key = "generic"
name = "Generic"
version = 1

[[schemas.columns]]
role = "article"
position = 1
title = "Артикул"

[[schemas]]
key = "vip"
name = "ВИП"
version = 2
file_patterns = ["Москворечье ВИП*"]

[[schemas.columns]]
role = "price"
position = 1
title = "Цена"
source_header = "Цена, Рубль"
"#;

    #[test]
    fn finds_by_key_then_pattern() {
        let registry = SchemaRegistry::from_toml_str(TWO_SCHEMAS, "inline").unwrap();
        assert_eq!(registry.find("VIP").unwrap().key, "vip");
        assert_eq!(registry.find("uploads/vip.xlsx").unwrap().key, "vip");
        assert_eq!(
            registry.find("МоскворечьеВИП_2024-05.xlsx").unwrap().key,
            "vip"
        );
        assert!(registry.find("other.csv").is_none());
        assert_eq!(registry.resolve("other.csv").unwrap().key, "generic");
    }

    #[test]
    fn normalizes_keys() {
        assert_eq!(normalize_key("Москворечье ВИП_2024"), "москворечьевип2024");
        assert_eq!(file_stem("dir/prices.v2.xlsx"), "prices.v2");
        assert_eq!(file_stem("generic"), "generic");
    }

    #[test]
    fn rejects_gaps_in_positions() {
        let text = r#"
version = "1"
[[schemas]]
key = "gap"
name = "Gap"
version = 1
[[schemas.columns]]
role = "article"
position = 1
title = "A"
[[schemas.columns]]
role = "price"
position = 3
title = "P"
"#;
        let err = SchemaRegistry::from_toml_str(text, "inline").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid supplier schema 'gap': positions must be contiguous from 1 to 3"
        );
    }

    #[test]
    fn rejects_unknown_default() {
        let text = r#"
version = "1"
default_schema = "missing"
"#;
        let err = SchemaRegistry::from_toml_str(text, "inline").unwrap_err();
        assert!(matches!(err, StandardsError::UnknownDefaultSchema { .. }));
    }
}
