use std::path::Path;

use crate::error::AppError;
use crate::model::Dataset;

/// Load a dataset from a JSON file.
pub fn load_dataset(path: &Path) -> Result<Dataset, AppError> {
    let json = std::fs::read_to_string(path).map_err(|e| AppError::from_io(path, e))?;
    parse_dataset(&json).map_err(|e| match e {
        AppError::InvalidFormat {
            path: None,
            message,
            line,
            column,
        } => AppError::InvalidFormat {
            path: Some(path.to_path_buf()),
            message,
            line,
            column,
        },
        other => other,
    })
}

pub fn parse_dataset(json: &str) -> Result<Dataset, AppError> {
    let mut dataset: Dataset =
        serde_json::from_str(json).map_err(|e| AppError::from_json(None, &e))?;
    dataset.normalize();
    log::info!(
        "parsed dataset '{}': {} items, {} categories",
        dataset.name,
        dataset.items.len(),
        dataset.categories.len()
    );
    Ok(dataset)
}
