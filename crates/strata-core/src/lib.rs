//! Strata Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Strata
//! entity scaffolder, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           strata-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (ScaffoldService, TemplateService)    │
//! │   ArtifactWriter, AugmentationEngine    │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │   (Driven: Store, Filesystem, Render)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     strata-adapters (Infrastructure)    │
//! │ (LayeredStore, LocalFilesystem, etc)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Locator, augment, ArtifactLayout)     │
//! │              No I/O                     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use strata_core::prelude::*;
//!
//! let service = ScaffoldService::new(store, renderer, filesystem);
//! let request = ScaffoldRequest::new(
//!     EntityName::parse(Some("Invoice"))?,
//!     ".",
//!     "2025_01_01_000000",
//! );
//! let report = service.scaffold(&request)?;
//! println!("{} created, {} already present", report.created(), report.existing());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ArtifactStatus, PublishStatus, ScaffoldReport, ScaffoldRequest, ScaffoldService,
        TemplateInfo, TemplateService,
        ports::{Filesystem, TemplateRenderer, TemplateStore},
    };
    pub use crate::domain::{
        Anchor, ArtifactKind, ArtifactLayout, AugmentOutcome, Bindings, EntityName, ModuleName,
        RouteStyle, Template, TemplateName, TemplateOrigin,
    };
    pub use crate::error::{StrataError, StrataResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
