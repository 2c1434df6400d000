//! Template stores.

mod builtin;
mod directory;
mod layered;

pub use builtin::BuiltinStore;
pub use directory::DirectoryStore;
pub use layered::LayeredStore;
