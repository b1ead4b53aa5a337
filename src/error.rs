//! User-facing error types.
//!
//! Everything that can go wrong while loading datasets or settings ends up as
//! an [`AppError`], which the UI shows in an error dialog and the status bar.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Cannot read {}: {reason}", path.display())]
    FileReadError { path: PathBuf, reason: String },

    /// Dataset content could not be parsed.
    #[error("Invalid dataset: {message}")]
    InvalidFormat {
        path: Option<PathBuf>,
        message: String,
        /// 1-indexed, JSON only.
        line: Option<usize>,
        column: Option<usize>,
    },

    #[error("CSV is missing required columns (found: {})", found.join(", "))]
    MissingColumns { found: Vec<String> },

    #[error("No valid items found ({skipped} rows skipped)")]
    NoItems { skipped: usize },

    #[error("Invalid time window: end {end} is not after start {start}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Could not load settings: {reason}")]
    SettingsLoadError { reason: String },

    #[error("Could not save settings: {reason}")]
    SettingsSaveError { reason: String },
}

impl AppError {
    /// Map an I/O error on `path` to the matching variant.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileReadError {
                path: path.to_path_buf(),
                reason: err.to_string(),
            }
        }
    }

    /// Wrap a serde_json error, keeping its position.
    pub fn from_json(path: Option<&Path>, err: &serde_json::Error) -> Self {
        Self::InvalidFormat {
            path: path.map(Path::to_path_buf),
            message: err.to_string(),
            line: Some(err.line()).filter(|l| *l > 0),
            column: Some(err.column()).filter(|c| *c > 0),
        }
    }

    pub fn dialog_title(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => "File Not Found",
            Self::FileReadError { .. } => "Cannot Read File",
            Self::InvalidFormat { .. } | Self::MissingColumns { .. } => "Invalid File Format",
            Self::NoItems { .. } => "Nothing to Import",
            Self::InvalidWindow { .. } => "Invalid Time Window",
            Self::SettingsLoadError { .. } | Self::SettingsSaveError { .. } => "Settings Error",
        }
    }

    /// Extra lines shown under the message in the error dialog.
    pub fn details(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match self {
            Self::FileNotFound { path } | Self::FileReadError { path, .. } => {
                lines.push(format!("Full Path: {}", path.display()));
            }
            Self::InvalidFormat {
                path, line, column, ..
            } => {
                if let Some(p) = path {
                    lines.push(format!("File: {}", p.display()));
                }
                if let Some(l) = line {
                    lines.push(format!("Line: {}", l));
                }
                if let Some(c) = column {
                    lines.push(format!("Column: {}", c));
                }
            }
            Self::MissingColumns { .. } => {
                lines.push("Need columns for: title, start, end.".to_string());
            }
            _ => {}
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_not_found() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let app_err = AppError::from_io(Path::new("/tmp/missing.json"), err);
        assert!(matches!(app_err, AppError::FileNotFound { .. }));
        assert_eq!(app_err.dialog_title(), "File Not Found");
    }

    #[test]
    fn test_from_io_other() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let app_err = AppError::from_io(Path::new("/tmp/locked.json"), err);
        match app_err {
            AppError::FileReadError { reason, .. } => assert!(reason.contains("nope")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_from_json_keeps_position() {
        let err = serde_json::from_str::<serde_json::Value>("{\n  \"a\": ,\n}").unwrap_err();
        let app_err = AppError::from_json(None, &err);
        let details = app_err.details();
        assert!(details.iter().any(|l| l == "Line: 2"));
    }
}
