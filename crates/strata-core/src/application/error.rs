//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Neither the override directory nor the built-in set has the template.
    #[error("Template '{name}' not found (searched: {})", searched.join(", "))]
    TemplateNotFound { name: String, searched: Vec<String> },

    /// Template rendering failed.
    #[error("Template rendering failed: {reason}")]
    RenderingFailed { reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// An in-memory adapter's lock was poisoned by a panicking writer.
    #[error("Store lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { name, .. } => vec![
                format!("No stub named '{}' is available", name),
                "Run 'strata list' to see the templates that resolve".into(),
                "Run 'strata publish' to restore the default stubs".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Re-run the command once fixed; finished steps are skipped".into(),
            ],
            Self::RenderingFailed { .. } => vec!["Check the template for errors".into()],
            Self::StoreLockError => vec!["This is a bug; please report it".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::FilesystemError { .. }
            | Self::RenderingFailed { .. }
            | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
