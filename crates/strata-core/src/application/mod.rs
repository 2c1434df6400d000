//! Application layer for Strata.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ScaffoldService, TemplateService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer owns all I/O sequencing. Where a fragment goes, and
//! whether it is already there, is decided in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    ArtifactStatus, PublishStatus, ScaffoldReport, ScaffoldRequest, ScaffoldService,
    TemplateInfo, // DTO for template metadata
    TemplateService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, TemplateRenderer, TemplateStore};

pub use error::ApplicationError;
