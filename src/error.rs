//! Application-level error type returned by all command handlers.
//!
//! `AppError` is serialized to `{ kind, message }` JSON payloads so callers
//! (the CLI, or a web front end) can pattern-match on a stable `kind` string.

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::geometry::GeometryError;
use crate::intake::IntakeError;
use crate::quote::contact::ContactErrors;
use crate::quote::ValidationError;

/// Top-level error returned by command handlers.
///
/// Serialized with serde's adjacently-tagged representation:
/// `{ "kind": "<variant>", "message": "<human-readable text>" }`
#[derive(Debug, thiserror::Error, serde::Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum AppError {
    /// A required file path does not exist on disk.
    #[error("file not found")]
    FileNotFound,

    /// The upload's extension is not on the allow-list.
    #[error("{0}")]
    UnsupportedFormat(String),

    /// The upload exceeds the configured size limit.
    #[error("{0}")]
    FileTooLarge(String),

    /// A model buffer could not be analyzed.
    #[error("{0}")]
    InvalidModel(String),

    /// The material catalog is unreadable, invalid, or lacks the material.
    #[error("{0}")]
    Catalog(String),

    /// A quote request field is outside its allowed range.
    #[error("{0}")]
    Validation(String),

    /// A quote request could not be parsed.
    #[error("{0}")]
    Request(String),

    /// The settings file is unreadable or invalid.
    #[error("{0}")]
    Config(String),

    /// A generic I/O error, stringified so it remains serializable.
    #[error("{0}")]
    Io(String),
}

impl From<IntakeError> for AppError {
    /// Intake errors keep their own kind where one exists; the rest become
    /// [`AppError::Io`].
    fn from(e: IntakeError) -> Self {
        match e {
            IntakeError::FileNotFound => Self::FileNotFound,
            IntakeError::UnsupportedFormat { .. } => Self::UnsupportedFormat(e.to_string()),
            IntakeError::TooLarge { .. } => Self::FileTooLarge(e.to_string()),
            IntakeError::Io { .. } => Self::Io(e.to_string()),
        }
    }
}

impl From<GeometryError> for AppError {
    fn from(e: GeometryError) -> Self {
        Self::InvalidModel(e.to_string())
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e.to_string())
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<ContactErrors> for AppError {
    fn from(e: ContactErrors) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<std::io::Error> for AppError {
    /// Convert an [`std::io::Error`] into an [`AppError::Io`].
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_serializes_to_kind_message() {
        let err = AppError::Io("disk full".to_string());
        let value = serde_json::to_value(&err).expect("serialize AppError::Io");
        assert_eq!(value["kind"], "Io");
        assert_eq!(value["message"], "disk full");
    }

    #[test]
    fn file_not_found_serializes_with_kind() {
        let value = serde_json::to_value(&AppError::FileNotFound).expect("serialize");
        assert_eq!(value["kind"], "FileNotFound");
    }

    #[test]
    fn intake_errors_map_to_matching_kinds() {
        assert!(matches!(
            AppError::from(IntakeError::FileNotFound),
            AppError::FileNotFound
        ));

        let err = AppError::from(IntakeError::UnsupportedFormat {
            extension: "dxf".into(),
        });
        let value = serde_json::to_value(&err).expect("serialize");
        assert_eq!(value["kind"], "UnsupportedFormat");
        assert_eq!(value["message"], "Unsupported format: dxf");

        let err = AppError::from(IntakeError::TooLarge { size: 2, limit: 1 });
        assert!(matches!(err, AppError::FileTooLarge(_)));
    }

    #[test]
    fn geometry_error_becomes_invalid_model() {
        let err = AppError::from(GeometryError::Format {
            reason: "short".into(),
        });
        let value = serde_json::to_value(&err).expect("serialize");
        assert_eq!(value["kind"], "InvalidModel");
        assert_eq!(value["message"], "Invalid STL file format: short");
    }

    #[test]
    fn validation_error_keeps_message() {
        let err = AppError::from(ValidationError::Quantity { value: 0 });
        assert_eq!(err.to_string(), "quantity must be between 1 and 100, got 0");
        let value = serde_json::to_value(&err).expect("serialize");
        assert_eq!(value["kind"], "Validation");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let app_err = AppError::from(io_err);
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn app_error_display_is_human_readable() {
        assert_eq!(AppError::FileNotFound.to_string(), "file not found");
        assert_eq!(
            AppError::Catalog("unknown fdm material: nylon".to_string()).to_string(),
            "unknown fdm material: nylon"
        );
    }
}
