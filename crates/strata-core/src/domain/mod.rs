// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Strata.
//!
//! Pure logic only. Nothing in here touches the filesystem; the application
//! layer reads host files, hands their text to this module, and writes back
//! whatever comes out.
//!
//! - **No I/O**: anchors, augmentation and descriptor edits work on strings
//! - **Value objects validate at construction**: an `EntityName` is always a
//!   usable class name, a `TemplateName` never escapes its directory
//! - **Every outcome is data**: a missing anchor is `None`, not an error

pub mod augmentation;
pub mod entities;
pub mod error;
pub mod layout;
pub mod locator;
pub mod markers;
pub mod module_descriptor;
pub mod naming;
pub mod project;
pub mod value_objects;

pub use augmentation::{
    AugmentOutcome, Augmentation, FallbackPolicy, MissingHost, OnMissingAnchor, Placement,
    augment,
};
pub use entities::{
    ArtifactDescriptor, ArtifactKind, Bindings, ExistingMatch, HostDocument, Layer, Template,
    TemplateOrigin,
};
pub use error::{DomainError, ErrorCategory};
pub use layout::{ArtifactLayout, ArtifactSpec, LAYOUT_VERSION};
pub use locator::{Anchor, locate, locate_relaxed};
pub use module_descriptor::{DescriptorChange, register_provider};
pub use project::{ProjectContext, ProjectDirs};
pub use value_objects::{
    EntityName, Fragment, ModuleName, RouteStyle, TemplateName, UniquenessToken,
};
