//! Generated artifacts and their descriptors.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::entities::template::Bindings;
use crate::domain::value_objects::TemplateName;

/// Architectural layer an artifact belongs to. Creation runs in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Data,
    Application,
    Service,
    Test,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Self::Data, Self::Application, Self::Service, Self::Test];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Application => "application",
            Self::Service => "service",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every artifact kind produced for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    Migration,
    Factory,
    Seeder,
    Model,
    Controller,
    StoreRequest,
    UpdateRequest,
    Resource,
    Policy,
    RepositoryInterface,
    Repository,
    Service,
    FeatureTest,
    UnitTest,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 14] = [
        Self::Migration,
        Self::Factory,
        Self::Seeder,
        Self::Model,
        Self::Controller,
        Self::StoreRequest,
        Self::UpdateRequest,
        Self::Resource,
        Self::Policy,
        Self::RepositoryInterface,
        Self::Repository,
        Self::Service,
        Self::FeatureTest,
        Self::UnitTest,
    ];

    pub const fn layer(self) -> Layer {
        match self {
            Self::Migration | Self::Factory | Self::Seeder | Self::Model => Layer::Data,
            Self::Controller
            | Self::StoreRequest
            | Self::UpdateRequest
            | Self::Resource
            | Self::Policy => Layer::Application,
            Self::RepositoryInterface | Self::Repository | Self::Service => Layer::Service,
            Self::FeatureTest | Self::UnitTest => Layer::Test,
        }
    }

    /// Human label used in notes ("Created Store Request: ...").
    pub const fn label(self) -> &'static str {
        match self {
            Self::Migration => "Migration",
            Self::Factory => "Factory",
            Self::Seeder => "Seeder",
            Self::Model => "Model",
            Self::Controller => "Controller",
            Self::StoreRequest => "Store Request",
            Self::UpdateRequest => "Update Request",
            Self::Resource => "Resource",
            Self::Policy => "Policy",
            Self::RepositoryInterface => "Repository Interface",
            Self::Repository => "Repository",
            Self::Service => "Service",
            Self::FeatureTest => "Feature Test",
            Self::UnitTest => "Unit Test",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An artifact counts as existing when any file in `dir` ends with `suffix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingMatch {
    pub dir: PathBuf,
    pub suffix: String,
}

/// Everything the artifact writer needs to create one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub template: TemplateName,
    pub bindings: Bindings,
    pub existing_match: Option<ExistingMatch>,
}

impl ArtifactDescriptor {
    pub fn layer(&self) -> Layer {
        self.kind.layer()
    }
}
