//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish the
//! high-level use cases: "scaffold an entity", "resolve a template",
//! "publish the stubs".

pub mod artifact_writer;
pub mod augmentation_engine;
pub mod registrations;
pub mod scaffold_service;
pub mod template_service;

pub use artifact_writer::{ArtifactStatus, ArtifactWriter};
pub use augmentation_engine::{AugmentationEngine, HostAugmentation};
pub use registrations::{Registration, Step};
pub use scaffold_service::{
    ArtifactRecord, RegistrationRecord, ScaffoldReport, ScaffoldRequest, ScaffoldService,
};
pub use template_service::{PublishStatus, TemplateInfo, TemplateService};
