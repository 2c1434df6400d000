// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (cheap to carry through reports)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Model name is required")]
    MissingEntityName,

    #[error("Invalid entity name '{name}': {reason}")]
    InvalidEntityName { name: String, reason: String },

    #[error("Invalid module name '{name}': {reason}")]
    InvalidModuleName { name: String, reason: String },

    #[error("Invalid template name '{name}': {reason}")]
    InvalidTemplateName { name: String, reason: String },

    #[error("Invalid artifact layout: {0}")]
    InvalidLayout(String),

    #[error("Unsupported artifact layout version {found} (supported: {supported})")]
    UnsupportedLayoutVersion { found: u32, supported: u32 },

    // ========================================================================
    // Malformed host data (cannot be augmented safely)
    // ========================================================================
    #[error("Malformed module descriptor: {reason}")]
    MalformedDescriptor { reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingEntityName => vec![
                "Pass the entity to scaffold with --model".into(),
                "Example: strata make --model Invoice".into(),
            ],
            Self::InvalidEntityName { name, .. } => vec![
                format!("'{}' cannot be used as a class name", name),
                "Use letters and digits, starting with a letter (e.g. Invoice, OrderLine)".into(),
            ],
            Self::InvalidModuleName { name, .. } => vec![
                format!("'{}' cannot be used as a module name", name),
                "Use letters and digits, starting with a letter (e.g. Billing)".into(),
            ],
            Self::InvalidTemplateName { .. } => vec![
                "Template names are relative paths like 'database/migration'".into(),
            ],
            Self::InvalidLayout(_) | Self::UnsupportedLayoutVersion { .. } => vec![
                "Check the layout file referenced by 'layout.file' in your config".into(),
                "Remove the setting to fall back to the standard layout".into(),
            ],
            Self::MalformedDescriptor { .. } => vec![
                "Fix the JSON syntax of module.json".into(),
                "'providers' must be an array of class names".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingEntityName
            | Self::InvalidEntityName { .. }
            | Self::InvalidModuleName { .. }
            | Self::InvalidTemplateName { .. } => ErrorCategory::Validation,
            Self::InvalidLayout(_) | Self::UnsupportedLayoutVersion { .. } => {
                ErrorCategory::Configuration
            }
            Self::MalformedDescriptor { .. } => ErrorCategory::Malformed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Malformed,
}
