//! Validate and install a catalog file.

use std::path::Path;

use rust_decimal::Decimal;
use tracing::info;

use brewdesk_core::{MIN_NAME_LENGTH, Product};

use super::{CliError, catalog_path};

/// Parse `file` as a product array, validate every record, and install it
/// as the catalog. Nothing is written if any record is invalid.
///
/// # Errors
///
/// Returns [`CliError::Json`] for malformed JSON, [`CliError::Invalid`]
/// naming the first offending record, or an I/O error.
pub async fn run(data_dir: &Path, file: &Path) -> Result<(), CliError> {
    let raw = tokio::fs::read_to_string(file).await?;
    let products: Vec<Product> = serde_json::from_str(&raw)?;

    for (index, product) in products.iter().enumerate() {
        validate(index, product)?;
    }

    tokio::fs::create_dir_all(data_dir).await?;
    let path = catalog_path(data_dir);
    tokio::fs::write(&path, serde_json::to_string_pretty(&products)?).await?;

    info!(path = %path.display(), count = products.len(), "catalog imported");
    Ok(())
}

/// The serde shapes don't enforce the catalog invariants, so re-check them
/// record by record before installing anything.
fn validate(index: usize, product: &Product) -> Result<(), CliError> {
    if product.id.as_str().is_empty() {
        return Err(CliError::Invalid(format!("record {index}: empty id")));
    }
    if product.name.trim().len() < MIN_NAME_LENGTH {
        return Err(CliError::Invalid(format!(
            "record {index} ({}): name shorter than {MIN_NAME_LENGTH} characters",
            product.id
        )));
    }
    if product.price.amount() <= Decimal::ZERO {
        return Err(CliError::Invalid(format!(
            "record {index} ({}): price must be positive",
            product.id
        )));
    }
    Ok(())
}
