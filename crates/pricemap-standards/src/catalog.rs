//! Pattern and keyword catalog.
//!
//! The catalog is pure data: per-role value regexes, content keywords,
//! header keywords, the numeric thresholds used by the classifiers, and the
//! constants used to synthesize defaultable roles. It is parsed from
//! `catalog.toml` and compiled once.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Deserialize;

use pricemap_model::{CellValue, Role};

use crate::error::{Result, StandardsError};

#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    version: String,
    #[serde(default)]
    thresholds: Thresholds,
    #[serde(default)]
    defaults: BTreeMap<String, DefaultValue>,
    roles: Vec<RoleEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct RoleEntry {
    role: Role,
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    header_keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum DefaultValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<DefaultValue> for CellValue {
    fn from(value: DefaultValue) -> Self {
        match value {
            DefaultValue::Int(v) => CellValue::Int(v),
            DefaultValue::Float(v) => CellValue::Float(v),
            DefaultValue::Text(v) => CellValue::Text(v),
        }
    }
}

/// Numeric knobs of the classifiers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub integer_mix: f64,
    pub float_mix: f64,
    pub text_mix: f64,
    pub header_base: f64,
    pub header_exact_bonus: f64,
    pub min_numeric_values: usize,
    pub cents_fraction: f64,
    pub round_ending_fraction: f64,
    pub price_median_min: f64,
    pub price_median_max: f64,
    pub price_boost: f64,
    pub quantity_integer_fraction: f64,
    pub quantity_median_max: f64,
    pub quantity_boost: f64,
    pub article_code_fraction: f64,
    pub article_boost: f64,
    /// Article ceiling for columns whose values do not look like codes.
    pub article_uncoded_max: f64,
    pub brand_max_avg_length: f64,
    pub name_min_avg_length: f64,
    pub category_max_unique_ratio: f64,
    pub description_min_avg_length: f64,
    pub description_confidence: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            integer_mix: 0.5,
            float_mix: 0.5,
            text_mix: 0.7,
            header_base: 0.8,
            header_exact_bonus: 0.2,
            min_numeric_values: 3,
            cents_fraction: 0.3,
            round_ending_fraction: 0.4,
            price_median_min: 10.0,
            price_median_max: 1_000_000.0,
            price_boost: 0.85,
            quantity_integer_fraction: 0.8,
            quantity_median_max: 1000.0,
            quantity_boost: 0.75,
            article_code_fraction: 0.6,
            article_boost: 0.8,
            article_uncoded_max: 0.6,
            brand_max_avg_length: 20.0,
            name_min_avg_length: 10.0,
            category_max_unique_ratio: 0.5,
            description_min_avg_length: 100.0,
            description_confidence: 0.8,
        }
    }
}

impl Thresholds {
    /// Returns true when the header/price ranges are usable.
    pub fn is_valid(&self) -> bool {
        let fractions = [
            self.integer_mix,
            self.float_mix,
            self.text_mix,
            self.header_base,
            self.cents_fraction,
            self.round_ending_fraction,
            self.price_boost,
            self.quantity_integer_fraction,
            self.quantity_boost,
            self.article_code_fraction,
            self.article_boost,
            self.article_uncoded_max,
            self.category_max_unique_ratio,
            self.description_confidence,
        ];
        fractions.iter().all(|v| (0.0..=1.0).contains(v))
            && self.header_base + self.header_exact_bonus <= 1.0
            && self.price_median_min < self.price_median_max
    }
}

/// Compiled catalog entry for one role.
#[derive(Debug, Clone)]
pub struct RoleCatalog {
    pub role: Role,
    pub patterns: Vec<Regex>,
    /// Lower-case content keywords.
    pub keywords: Vec<String>,
    /// Lower-case header keywords.
    pub header_keywords: Vec<String>,
}

impl RoleCatalog {
    /// True when the value matches any pattern or contains any keyword.
    pub fn matches_value(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        if self.patterns.iter().any(|pattern| pattern.is_match(trimmed)) {
            return true;
        }
        if self.keywords.is_empty() {
            return false;
        }
        let lowered = trimmed.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| keyword_matches(&lowered, keyword))
    }

    pub fn has_content_rules(&self) -> bool {
        !self.patterns.is_empty() || !self.keywords.is_empty()
    }
}

/// Keyword containment. Keywords of at most two characters must match a
/// whole token so that `lg` does not hit `бульдог`.
pub fn keyword_matches(lowered: &str, keyword: &str) -> bool {
    if keyword.chars().count() <= 2 {
        lowered
            .split(|c: char| !c.is_alphanumeric())
            .any(|token| token == keyword)
    } else {
        lowered.contains(keyword)
    }
}

/// The full compiled catalog.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    pub version: String,
    pub thresholds: Thresholds,
    defaults: BTreeMap<Role, CellValue>,
    entries: Vec<RoleCatalog>,
}

impl PatternCatalog {
    /// Parses and compiles a catalog. `origin` names the source in errors.
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self> {
        let file: CatalogFile =
            toml::from_str(text).map_err(|source| StandardsError::toml(origin, source))?;
        Self::compile(file)
    }

    fn compile(file: CatalogFile) -> Result<Self> {
        if !file.thresholds.is_valid() {
            return Err(StandardsError::InvalidCatalog {
                message: "thresholds must be fractions in [0, 1] with a non-empty price band"
                    .to_string(),
            });
        }
        let mut entries: Vec<RoleCatalog> = Vec::with_capacity(file.roles.len());
        for entry in file.roles {
            if !entry.role.is_defined() {
                return Err(StandardsError::InvalidCatalog {
                    message: "the undefined role cannot have catalog entries".to_string(),
                });
            }
            if entries.iter().any(|existing| existing.role == entry.role) {
                return Err(StandardsError::InvalidCatalog {
                    message: format!("role {} is listed twice", entry.role),
                });
            }
            let patterns = entry
                .patterns
                .iter()
                .map(|pattern| {
                    Regex::new(pattern).map_err(|source| StandardsError::InvalidPattern {
                        role: entry.role,
                        pattern: pattern.clone(),
                        source,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            entries.push(RoleCatalog {
                role: entry.role,
                patterns,
                keywords: lowercase_all(entry.keywords),
                header_keywords: lowercase_all(entry.header_keywords),
            });
        }
        let mut defaults = BTreeMap::new();
        for (name, value) in file.defaults {
            let role: Role = name
                .parse()
                .map_err(|message| StandardsError::InvalidCatalog { message })?;
            if !role.is_defined() {
                return Err(StandardsError::InvalidCatalog {
                    message: "the undefined role cannot have a default".to_string(),
                });
            }
            defaults.insert(role, CellValue::from(value));
        }
        Ok(Self {
            version: file.version,
            thresholds: file.thresholds,
            defaults,
            entries,
        })
    }

    /// Entries in catalog order.
    pub fn entries(&self) -> &[RoleCatalog] {
        &self.entries
    }

    pub fn role(&self, role: Role) -> Option<&RoleCatalog> {
        self.entries.iter().find(|entry| entry.role == role)
    }

    /// Roles in catalog order.
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.entries.iter().map(|entry| entry.role)
    }

    /// Constant used when a required role is absent, if the role is defaultable.
    pub fn default_for(&self, role: Role) -> Option<&CellValue> {
        self.defaults.get(&role)
    }

    pub fn defaultable_roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.defaults.keys().copied()
    }
}

fn lowercase_all(words: Vec<String>) -> Vec<String> {
    words
        .into_iter()
        .map(|word| word.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}
