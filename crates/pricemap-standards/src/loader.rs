//! Loading the standards bundle.

use std::path::Path;
use std::sync::OnceLock;

use crate::catalog::PatternCatalog;
use crate::error::{Result, StandardsError};
use crate::paths::{
    CATALOG_FILE, MULTIPLICITY_FILE, REWRITER_FILE, SUPPLIERS_FILE, standards_override,
};
use crate::rules::{MovementColumns, MultiplicityRules};
use crate::suppliers::SchemaRegistry;

const EMBEDDED_CATALOG: &str = include_str!("../../../standards/catalog.toml");
const EMBEDDED_SUPPLIERS: &str = include_str!("../../../standards/suppliers.toml");
const EMBEDDED_REWRITER: &str = include_str!("../../../standards/rewriter.toml");
const EMBEDDED_MULTIPLICITY: &str = include_str!("../../../standards/multiplicity.toml");

static EMBEDDED: OnceLock<Standards> = OnceLock::new();

/// Read-only configuration shared by every pipeline.
#[derive(Debug, Clone)]
pub struct Standards {
    pub catalog: PatternCatalog,
    pub suppliers: SchemaRegistry,
    pub movement: MovementColumns,
    pub multiplicity: MultiplicityRules,
}

impl Standards {
    /// Parses the copies of `standards/*.toml` compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Ok(Self {
            catalog: PatternCatalog::from_toml_str(EMBEDDED_CATALOG, CATALOG_FILE)?,
            suppliers: SchemaRegistry::from_toml_str(EMBEDDED_SUPPLIERS, SUPPLIERS_FILE)?,
            movement: MovementColumns::from_toml_str(EMBEDDED_REWRITER, REWRITER_FILE)?,
            multiplicity: MultiplicityRules::from_toml_str(
                EMBEDDED_MULTIPLICITY,
                MULTIPLICITY_FILE,
            )?,
        })
    }

    /// Loads every standards file from `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        Ok(Self {
            catalog: PatternCatalog::from_toml_str(
                &read(dir, CATALOG_FILE)?,
                &origin(dir, CATALOG_FILE),
            )?,
            suppliers: SchemaRegistry::from_toml_str(
                &read(dir, SUPPLIERS_FILE)?,
                &origin(dir, SUPPLIERS_FILE),
            )?,
            movement: MovementColumns::from_toml_str(
                &read(dir, REWRITER_FILE)?,
                &origin(dir, REWRITER_FILE),
            )?,
            multiplicity: MultiplicityRules::from_toml_str(
                &read(dir, MULTIPLICITY_FILE)?,
                &origin(dir, MULTIPLICITY_FILE),
            )?,
        })
    }
}

/// Loads standards from `dir`, else `PRICEMAP_STANDARDS_DIR`, else the
/// embedded defaults.
pub fn load_standards(dir: Option<&Path>) -> Result<Standards> {
    if let Some(dir) = dir {
        return Standards::load_dir(dir);
    }
    if let Some(dir) = standards_override() {
        return Standards::load_dir(&dir);
    }
    Standards::embedded()
}

/// Process-wide embedded standards, parsed on first use.
pub fn embedded_standards() -> Result<&'static Standards> {
    if let Some(standards) = EMBEDDED.get() {
        return Ok(standards);
    }
    let loaded = Standards::embedded()?;
    Ok(EMBEDDED.get_or_init(|| loaded))
}

fn read(dir: &Path, file: &str) -> Result<String> {
    let path = dir.join(file);
    std::fs::read_to_string(&path).map_err(|source| StandardsError::io(path, source))
}

fn origin(dir: &Path, file: &str) -> String {
    dir.join(file).display().to_string()
}
