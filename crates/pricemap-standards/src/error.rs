#![deny(unsafe_code)]

use std::path::PathBuf;

use pricemap_model::Role;

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid pattern for {role} '{pattern}': {source}")]
    InvalidPattern {
        role: Role,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid catalog: {message}")]
    InvalidCatalog { message: String },

    #[error("invalid supplier schema '{key}': {message}")]
    InvalidSchema { key: String, message: String },

    #[error("duplicate supplier schema: {key}")]
    DuplicateSchema { key: String },

    #[error("default schema '{key}' is not defined")]
    UnknownDefaultSchema { key: String },

    #[error("invalid rules in {origin}: {message}")]
    InvalidRules { origin: String, message: String },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn toml(origin: impl Into<String>, source: toml::de::Error) -> Self {
        Self::Toml {
            origin: origin.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StandardsError>;
