//! Export the catalog file.

use std::path::Path;

use tracing::info;

use brewdesk_core::Product;

use super::{CliError, catalog_path};

/// Copy the catalog to `out` as pretty-printed JSON, or print it to
/// stdout when no output file is given.
///
/// # Errors
///
/// Returns an error if the catalog is missing, unreadable, or not a valid
/// product array.
pub async fn run(data_dir: &Path, out: Option<&Path>) -> Result<(), CliError> {
    let path = catalog_path(data_dir);
    let raw = tokio::fs::read_to_string(&path).await?;
    // Parse rather than copy bytes, so a corrupt catalog fails loudly here
    // instead of producing a corrupt backup.
    let products: Vec<Product> = serde_json::from_str(&raw)?;
    let pretty = serde_json::to_string_pretty(&products)?;

    match out {
        Some(out) => {
            tokio::fs::write(out, pretty).await?;
            info!(out = %out.display(), count = products.len(), "catalog exported");
        }
        None => {
            #[allow(clippy::print_stdout)] // stdout is the export target here
            {
                println!("{pretty}");
            }
        }
    }
    Ok(())
}
