use std::path::PathBuf;

use thiserror::Error;

use crate::merge::MergeError;
use crate::sanitize::SanitizeError;

/// Application-level error type.
/// Every stage of the render pipeline returns `Result<T, AppError>`; `main`
/// wraps it in `anyhow` for reporting.
#[derive(Debug, Error)]
pub enum AppError {
    /// A string leaf carried a shell-escape directive. Nothing may be rendered.
    #[error("Security risk: {directive} found in input")]
    SecurityRisk { directive: String },

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Refusing to overwrite existing file: {}", .0.display())]
    OutputExists(PathBuf),
}

impl From<SanitizeError> for AppError {
    fn from(err: SanitizeError) -> Self {
        match err {
            SanitizeError::SecurityRisk { directive } => AppError::SecurityRisk { directive },
        }
    }
}

impl From<MergeError> for AppError {
    fn from(err: MergeError) -> Self {
        match err {
            MergeError::ShapeMismatch(msg) => AppError::ShapeMismatch(msg),
        }
    }
}

impl AppError {
    /// True for errors that must stop the pipeline before anything reaches
    /// the typesetter.
    pub fn is_security_risk(&self) -> bool {
        matches!(self, AppError::SecurityRisk { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_error_maps_to_security_risk() {
        let err: AppError = SanitizeError::SecurityRisk {
            directive: "\\write18".to_string(),
        }
        .into();
        assert!(err.is_security_risk());
        assert_eq!(err.to_string(), "Security risk: \\write18 found in input");
    }

    #[test]
    fn test_merge_error_maps_to_shape_mismatch() {
        let err: AppError = MergeError::ShapeMismatch("information.address".to_string()).into();
        assert!(matches!(err, AppError::ShapeMismatch(_)));
        assert!(!err.is_security_risk());
    }
}
