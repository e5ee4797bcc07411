//! Error handling for Acustica
//!
//! Only genuinely invalid inputs raise. Numerically degenerate but valid
//! situations (zero absorption, a listener on top of a source, no modes
//! below the cutoff) are absorbed by clamps inside the analysis modules.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Acustica operations
pub type Result<T> = std::result::Result<T, AcousticError>;

/// Main error type for Acustica operations
#[derive(Error, Debug)]
pub enum AcousticError {
    // Input Errors
    #[error("Invalid room geometry: {dimension} = {value} m (must be > 0)")]
    InvalidGeometry { dimension: &'static str, value: f64 },

    #[error("Unknown material: {name}")]
    UnknownMaterial { name: String },

    #[error("Negative surface area for '{material}': {area} m²")]
    NegativeArea { material: String, area: f64 },

    #[error("Invalid power: {value} W (must be > 0)")]
    InvalidPower { value: f64 },

    #[error("Source position ({x:.2}, {y:.2}) lies outside the room footprint")]
    InvalidPosition { x: f64, y: f64 },

    #[error("Invalid parameter '{param}': {value} (expected {expected})")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    #[error("Unknown instrument or use profile: {name}")]
    UnknownInstrument { name: String },

    #[error("Unknown speaker: {brand} {model}")]
    UnknownSpeaker { brand: String, model: String },

    #[error("SPL fields cannot be combined: {reason}")]
    IncompatibleFields { reason: String },

    // Persistence Errors
    #[error("Project not found: {path}")]
    ProjectNotFound { path: PathBuf },

    #[error("Project already exists: {path}")]
    ProjectAlreadyExists { path: PathBuf },

    #[error("Invalid project name: '{name}'")]
    InvalidProjectName { name: String },

    #[error("Unsupported project schema version: {version}")]
    UnsupportedSchemaVersion { version: String },

    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory creation failed: {path}: {source}")]
    DirectoryCreateError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AcousticError {
    /// Build an `InvalidParameter` error
    pub fn invalid_parameter(
        param: impl Into<String>,
        value: impl ToString,
        expected: impl Into<String>,
    ) -> Self {
        AcousticError::InvalidParameter {
            param: param.into(),
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            AcousticError::InvalidGeometry { .. } => "INVALID_GEOMETRY",
            AcousticError::UnknownMaterial { .. } => "UNKNOWN_MATERIAL",
            AcousticError::NegativeArea { .. } => "NEGATIVE_AREA",
            AcousticError::InvalidPower { .. } => "INVALID_POWER",
            AcousticError::InvalidPosition { .. } => "INVALID_POSITION",
            AcousticError::InvalidParameter { .. } => "INVALID_PARAMETER",
            AcousticError::UnknownInstrument { .. } => "UNKNOWN_INSTRUMENT",
            AcousticError::UnknownSpeaker { .. } => "UNKNOWN_SPEAKER",
            AcousticError::IncompatibleFields { .. } => "INCOMPATIBLE_FIELDS",
            AcousticError::ProjectNotFound { .. } => "PROJECT_NOT_FOUND",
            AcousticError::ProjectAlreadyExists { .. } => "PROJECT_ALREADY_EXISTS",
            AcousticError::InvalidProjectName { .. } => "INVALID_PROJECT_NAME",
            AcousticError::UnsupportedSchemaVersion { .. } => "UNSUPPORTED_SCHEMA_VERSION",
            AcousticError::FileReadError { .. } => "FILE_READ_ERROR",
            AcousticError::FileWriteError { .. } => "FILE_WRITE_ERROR",
            AcousticError::DirectoryCreateError { .. } => "DIRECTORY_CREATE_ERROR",
            AcousticError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Returns true if the operation may succeed when retried unchanged.
    ///
    /// Analysis is pure computation, so only filesystem failures qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AcousticError::FileReadError { .. }
                | AcousticError::FileWriteError { .. }
                | AcousticError::DirectoryCreateError { .. }
        )
    }

    /// Returns true if the error was caused by the caller's parameters
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AcousticError::InvalidGeometry { .. }
                | AcousticError::UnknownMaterial { .. }
                | AcousticError::NegativeArea { .. }
                | AcousticError::InvalidPower { .. }
                | AcousticError::InvalidPosition { .. }
                | AcousticError::InvalidParameter { .. }
                | AcousticError::UnknownInstrument { .. }
                | AcousticError::UnknownSpeaker { .. }
        )
    }

    /// Get a recovery suggestion for the input layer to show the user
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            AcousticError::InvalidGeometry { .. } => {
                Some("Enter positive dimensions (at least 1 m for length/width, 2 m for height).")
            }
            AcousticError::UnknownMaterial { .. } => {
                Some("Pick a material from 'acustica materials' or enable the fallback policy.")
            }
            AcousticError::NegativeArea { .. } => Some("Surface areas must be zero or positive."),
            AcousticError::InvalidPower { .. } => Some("Power values must be greater than 0 W."),
            AcousticError::InvalidPosition { .. } => {
                Some("Place sources inside the room footprint (0..length, 0..width).")
            }
            AcousticError::UnknownInstrument { .. } => {
                Some("Pick a profile from 'acustica instruments'.")
            }
            AcousticError::UnknownSpeaker { .. } => {
                Some("Pick a speaker from 'acustica speakers' or enter its parameters manually.")
            }
            AcousticError::ProjectNotFound { .. } => Some("Run 'acustica project list' to see saved projects."),
            AcousticError::ProjectAlreadyExists { .. } => {
                Some("Choose another name or pass --force.")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AcousticError::InvalidGeometry {
            dimension: "length",
            value: 0.0,
        };
        assert_eq!(err.error_code(), "INVALID_GEOMETRY");
        assert!(err.is_input_error());
        assert!(!err.is_retryable());

        let err = AcousticError::FileReadError {
            path: PathBuf::from("projects/room.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.error_code(), "FILE_READ_ERROR");
        assert!(err.is_retryable());
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_recovery_suggestions() {
        let err = AcousticError::UnknownInstrument {
            name: "Theremin".to_string(),
        };
        assert!(err.recovery_suggestion().is_some());

        let err = AcousticError::IncompatibleFields {
            reason: "grid mismatch".to_string(),
        };
        assert!(err.recovery_suggestion().is_none());
    }

    #[test]
    fn test_invalid_parameter_message() {
        let err = AcousticError::invalid_parameter("speed_of_sound", -1.0, "> 0");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'speed_of_sound': -1 (expected > 0)"
        );
    }
}
