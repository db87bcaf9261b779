//! Unified error type for gridplan operations.
//!
//! `GridplanError` gives every failure a category, a structured error code
//! and a suggested process exit code:
//!
//! - E001-E009: I/O and filesystem errors
//! - E010-E019: Parse errors (GeoJSON, TOML)
//! - E020-E029: Configuration errors
//! - E030-E039: Analysis errors
//! - E050-E059: Validation errors
//!
//! # Example
//!
//! ```rust
//! use gridplan::error::{ErrorCode, GridplanError};
//!
//! let err = GridplanError::config_with_field("unknown scenario 'Foo'", "scenario");
//! assert_eq!(err.code(), ErrorCode::CONFIG_INVALID);
//! assert!(err.is_user_fixable());
//! ```

use crate::observability::AnalysisPhase;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Structured error code for documentation and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// I/O error - file not found
    pub const IO_FILE_NOT_FOUND: ErrorCode = ErrorCode("E001");
    /// I/O error - permission denied
    pub const IO_PERMISSION_DENIED: ErrorCode = ErrorCode("E002");
    /// I/O error - generic
    pub const IO_GENERIC: ErrorCode = ErrorCode("E009");

    /// Parse error - malformed GeoJSON
    pub const PARSE_GEOJSON: ErrorCode = ErrorCode("E010");
    /// Parse error - malformed TOML configuration
    pub const PARSE_TOML: ErrorCode = ErrorCode("E011");
    /// Parse error - generic
    pub const PARSE_GENERIC: ErrorCode = ErrorCode("E019");

    /// Config error - invalid value
    pub const CONFIG_INVALID: ErrorCode = ErrorCode("E020");
    /// Config error - file not found
    pub const CONFIG_FILE_NOT_FOUND: ErrorCode = ErrorCode("E022");
    /// Config error - unsupported coordinate reference system
    pub const CONFIG_UNSUPPORTED_CRS: ErrorCode = ErrorCode("E023");
    /// Config error - generic
    pub const CONFIG_GENERIC: ErrorCode = ErrorCode("E029");

    /// Analysis error - statistics over an empty column
    pub const ANALYSIS_EMPTY_INPUT: ErrorCode = ErrorCode("E030");
    /// Analysis error - attribute column absent from the layer
    pub const ANALYSIS_MISSING_COLUMN: ErrorCode = ErrorCode("E031");
    /// Analysis error - generic
    pub const ANALYSIS_GENERIC: ErrorCode = ErrorCode("E039");

    /// Validation error - generic
    pub const VALIDATION_GENERIC: ErrorCode = ErrorCode("E050");

    /// Get the error code string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Main error type for gridplan operations.
#[derive(Debug, Clone, Error)]
pub enum GridplanError {
    /// I/O and filesystem errors.
    #[error("[{code}] I/O error: {message}{}", fmt_path(.path))]
    Io {
        code: ErrorCode,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Arc<std::io::Error>>,
    },

    /// Input file parsing errors.
    #[error("[{code}] Parse error in {}: {message}", .path.display())]
    Parse {
        code: ErrorCode,
        message: String,
        path: PathBuf,
    },

    /// Configuration errors.
    #[error("[{code}] Configuration error: {message}{}", fmt_field(.field))]
    Config {
        code: ErrorCode,
        message: String,
        field: Option<String>,
        path: Option<PathBuf>,
    },

    /// Analysis execution errors.
    #[error("[{code}] Analysis error: {message}{}", fmt_phase(.phase))]
    Analysis {
        code: ErrorCode,
        message: String,
        phase: Option<AnalysisPhase>,
    },

    /// Validation errors (may contain multiple issues).
    #[error("[{code}] Validation failed with {} error(s){}", .errors.len(), fmt_list(.errors))]
    Validation { code: ErrorCode, errors: Vec<String> },
}

fn fmt_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" (path: {})", p.display()))
        .unwrap_or_default()
}

fn fmt_field(field: &Option<String>) -> String {
    field
        .as_ref()
        .map(|f| format!(" (field: {})", f))
        .unwrap_or_default()
}

fn fmt_phase(phase: &Option<AnalysisPhase>) -> String {
    phase
        .as_ref()
        .map(|p| format!(" (phase: {})", p))
        .unwrap_or_default()
}

fn fmt_list(errors: &[String]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, e)| format!("\n  {}. {}", i + 1, e))
        .collect()
}

impl GridplanError {
    /// Create an I/O error from a std::io::Error, picking the code from its kind.
    #[must_use]
    pub fn from_io_error(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::IO_FILE_NOT_FOUND,
            std::io::ErrorKind::PermissionDenied => ErrorCode::IO_PERMISSION_DENIED,
            _ => ErrorCode::IO_GENERIC,
        };
        Self::Io {
            code,
            message: err.to_string(),
            path,
            source: Some(Arc::new(err)),
        }
    }

    /// Create a GeoJSON parse error.
    #[must_use]
    pub fn geojson(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Parse {
            code: ErrorCode::PARSE_GEOJSON,
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create a TOML parse error.
    #[must_use]
    pub fn toml(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Parse {
            code: ErrorCode::PARSE_TOML,
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::CONFIG_GENERIC,
            message: message.into(),
            field: None,
            path: None,
        }
    }

    /// Create a configuration error with field context.
    #[must_use]
    pub fn config_with_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::CONFIG_INVALID,
            message: message.into(),
            field: Some(field.into()),
            path: None,
        }
    }

    /// Create a configuration error for an explicit config path that does not exist.
    #[must_use]
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::Config {
            code: ErrorCode::CONFIG_FILE_NOT_FOUND,
            message: format!("configuration file not found: {}", path.display()),
            field: None,
            path: Some(path),
        }
    }

    /// Create an unsupported-CRS configuration error.
    #[must_use]
    pub fn unsupported_crs(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::Config {
            code: ErrorCode::CONFIG_UNSUPPORTED_CRS,
            message: format!("unsupported coordinate reference system '{}'", name),
            field: Some("crs".to_string()),
            path: None,
        }
    }

    /// Create an analysis error with phase context.
    #[must_use]
    pub fn analysis(code: ErrorCode, message: impl Into<String>, phase: AnalysisPhase) -> Self {
        Self::Analysis {
            code,
            message: message.into(),
            phase: Some(phase),
        }
    }

    /// Create a validation error with multiple messages.
    #[must_use]
    pub fn validations(errors: Vec<String>) -> Self {
        Self::Validation {
            code: ErrorCode::VALIDATION_GENERIC,
            errors,
        }
    }

    /// Get the error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Io { code, .. }
            | Self::Parse { code, .. }
            | Self::Config { code, .. }
            | Self::Analysis { code, .. }
            | Self::Validation { code, .. } => *code,
        }
    }

    /// Get the error category name.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io { .. } => "I/O",
            Self::Parse { .. } => "Parse",
            Self::Config { .. } => "Config",
            Self::Analysis { .. } => "Analysis",
            Self::Validation { .. } => "Validation",
        }
    }

    /// Get the associated path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } | Self::Config { path, .. } => path.as_ref(),
            Self::Parse { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Check if this error is something the user can fix.
    ///
    /// Configuration, validation and parse errors point at inputs the user
    /// controls. I/O and analysis errors usually need a different dataset.
    #[must_use]
    pub fn is_user_fixable(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::Validation { .. } | Self::Parse { .. }
        )
    }

    /// Get the suggested exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 3,
            Self::Validation { .. } => 4,
            Self::Parse { .. } => 5,
            Self::Analysis { .. } | Self::Io { .. } => 1,
        }
    }
}

impl Serialize for GridplanError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("GridplanError", 4)?;
        state.serialize_field("code", &self.code().as_str())?;
        state.serialize_field("category", &self.category())?;
        state.serialize_field("message", &self.to_string())?;
        state.serialize_field("user_fixable", &self.is_user_fixable())?;
        state.end()
    }
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, GridplanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_not_found_gets_specific_code() {
        let err = GridplanError::from_io_error(
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            Some(PathBuf::from("grid.geojson")),
        );
        assert_eq!(err.code(), ErrorCode::IO_FILE_NOT_FOUND);
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("grid.geojson"));
        assert!(!err.is_user_fixable());
    }

    #[test]
    fn validation_lists_every_message() {
        let err = GridplanError::validations(vec!["first".into(), "second".into()]);
        let text = err.to_string();
        assert!(text.contains("2 error(s)"));
        assert!(text.contains("1. first"));
        assert!(text.contains("2. second"));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn analysis_error_reports_phase() {
        let err = GridplanError::analysis(
            ErrorCode::ANALYSIS_EMPTY_INPUT,
            "no values",
            AnalysisPhase::Statistics,
        );
        assert!(err.to_string().contains("phase: statistics"));
        assert_eq!(err.category(), "Analysis");
    }

    #[test]
    fn serializes_code_and_category() {
        let err = GridplanError::unsupported_crs("EPSG:2136");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "E023");
        assert_eq!(json["category"], "Config");
        assert_eq!(json["user_fixable"], true);
    }
}
