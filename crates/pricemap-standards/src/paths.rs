//! Standards directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the standards directory.
pub const STANDARDS_ENV_VAR: &str = "PRICEMAP_STANDARDS_DIR";

pub const CATALOG_FILE: &str = "catalog.toml";
pub const SUPPLIERS_FILE: &str = "suppliers.toml";
pub const REWRITER_FILE: &str = "rewriter.toml";
pub const MULTIPLICITY_FILE: &str = "multiplicity.toml";

/// Standards directory named by `PRICEMAP_STANDARDS_DIR`, if set.
pub fn standards_override() -> Option<PathBuf> {
    std::env::var_os(STANDARDS_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// `standards/` directory at the workspace root.
///
/// The embedded defaults are compiled from these files.
pub fn workspace_standards_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}
