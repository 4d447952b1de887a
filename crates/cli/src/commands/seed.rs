//! Seed the catalog file with the default products.

use std::path::Path;

use tracing::info;

use brewdesk_core::seed_catalog;

use super::{CliError, catalog_path};

/// Write the three default products to the catalog file.
///
/// Refuses to touch an existing catalog unless `force` is set.
///
/// # Errors
///
/// Returns [`CliError::AlreadySeeded`] if the catalog exists and `force`
/// is false, or an I/O error.
pub async fn run(data_dir: &Path, force: bool) -> Result<(), CliError> {
    let path = catalog_path(data_dir);
    if path.exists() && !force {
        return Err(CliError::AlreadySeeded(path));
    }

    tokio::fs::create_dir_all(data_dir).await?;
    let products = seed_catalog();
    let raw = serde_json::to_string_pretty(&products)?;
    tokio::fs::write(&path, raw).await?;

    info!(path = %path.display(), count = products.len(), "catalog seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().expect("tempdir");
        run(dir.path(), false).await.expect("first seed");
        assert!(matches!(
            run(dir.path(), false).await,
            Err(CliError::AlreadySeeded(_))
        ));
        run(dir.path(), true).await.expect("forced seed");
    }
}
