pub mod artifact;
pub mod host;
pub mod template;

pub use artifact::{ArtifactDescriptor, ArtifactKind, ExistingMatch, Layer};
pub use host::HostDocument;
pub use template::{Bindings, Template, TemplateOrigin};
