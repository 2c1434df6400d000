//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `strata-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{Bindings, Template, TemplateName};
use crate::error::StrataResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `strata_adapters::filesystem::LocalFilesystem` (production)
/// - `strata_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Paths handed to the port are already joined onto the project root.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StrataResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> StrataResult<()>;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> StrataResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Entries directly inside `path`. A missing directory is empty.
    fn list_dir(&self, path: &Path) -> StrataResult<Vec<PathBuf>>;
}

/// Port for template lookup by logical name.
///
/// Implemented by:
/// - `strata_adapters::template_store::BuiltinStore` (stubs compiled in)
/// - `strata_adapters::template_store::DirectoryStore` (override directory)
/// - `strata_adapters::template_store::LayeredStore` (override, then built-in)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore: Send + Sync {
    /// Look a template up. `Ok(None)` means this store does not have it.
    fn find(&self, name: &TemplateName) -> StrataResult<Option<Template>>;

    /// Every template this store can resolve, sorted by name.
    fn list(&self) -> StrataResult<Vec<Template>>;

    /// Human-readable places searched for `name`, for error messages.
    fn locations(&self, name: &TemplateName) -> Vec<String>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `strata_adapters::renderer::SimpleRenderer` (literal `{{token}}` substitution)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &Template, bindings: &Bindings) -> StrataResult<String>;
}
