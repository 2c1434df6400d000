//! Infrastructure adapters for Strata.
//!
//! This crate implements the ports defined in `strata-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod builtin_templates;
pub mod filesystem;
pub mod layout_loader;
pub mod renderer;
pub mod template_store;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use layout_loader::load_layout;
pub use renderer::SimpleRenderer;
pub use template_store::{BuiltinStore, DirectoryStore, LayeredStore};
