//! Column names and rules for the row-level pipelines.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StandardsError};

/// Named columns of the goods-movement report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementColumns {
    pub quantity_to_move: String,
    pub output: String,
    pub sale_multiple: String,
    pub stock: String,
    pub available_stock: String,
}

impl Default for MovementColumns {
    fn default() -> Self {
        Self {
            quantity_to_move: "Кол-во к перем.".to_string(),
            output: "К перемещению К".to_string(),
            sale_multiple: "Кратность продажи".to_string(),
            stock: "Остаток отпр".to_string(),
            available_stock: "Дост Ост Отпр".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RewriterFile {
    columns: MovementColumns,
}

impl MovementColumns {
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self> {
        let file: RewriterFile =
            toml::from_str(text).map_err(|source| StandardsError::toml(origin, source))?;
        let columns = file.columns;
        let names = [
            &columns.quantity_to_move,
            &columns.output,
            &columns.sale_multiple,
            &columns.stock,
            &columns.available_stock,
        ];
        if names.iter().any(|name| name.trim().is_empty()) {
            return Err(StandardsError::InvalidRules {
                origin: origin.to_string(),
                message: "column names must not be blank".to_string(),
            });
        }
        Ok(columns)
    }
}

/// Named columns read and written by the multiplicity annotator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplicityColumns {
    pub product_name: String,
    pub catalog_number: String,
    pub output: String,
}

/// A product family sold in fixed packs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordGroup {
    pub name: String,
    /// Substrings of the lower-cased product name.
    pub keywords: Vec<String>,
    /// Whole words that cancel the group's multiple.
    #[serde(default)]
    pub anti_keywords: Vec<String>,
    pub multiple: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplicityRules {
    pub default_multiple: u32,
    pub kit_words: Vec<String>,
    pub columns: MultiplicityColumns,
    #[serde(default)]
    pub groups: Vec<KeywordGroup>,
}

impl MultiplicityRules {
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self> {
        let mut rules: MultiplicityRules =
            toml::from_str(text).map_err(|source| StandardsError::toml(origin, source))?;
        let invalid = |message: String| StandardsError::InvalidRules {
            origin: origin.to_string(),
            message,
        };
        if rules.default_multiple == 0 {
            return Err(invalid("default_multiple must be positive".to_string()));
        }
        for group in &mut rules.groups {
            if group.multiple == 0 {
                return Err(invalid(format!("group {} has a zero multiple", group.name)));
            }
            if group.keywords.is_empty() {
                return Err(invalid(format!("group {} has no keywords", group.name)));
            }
            lowercase_in_place(&mut group.keywords);
            lowercase_in_place(&mut group.anti_keywords);
        }
        lowercase_in_place(&mut rules.kit_words);
        Ok(rules)
    }
}

fn lowercase_in_place(words: &mut Vec<String>) {
    for word in words.iter_mut() {
        *word = word.trim().to_lowercase();
    }
    words.retain(|word| !word.is_empty());
}
