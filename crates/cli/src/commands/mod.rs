//! CLI command implementations.

pub mod export;
pub mod import;
pub mod seed;

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(String),

    #[error("catalog already exists at {0} (use --force to overwrite)")]
    AlreadySeeded(PathBuf),
}

/// Path of the catalog file inside the data directory.
pub(crate) fn catalog_path(data_dir: &Path) -> PathBuf {
    data_dir.join("products.json")
}
