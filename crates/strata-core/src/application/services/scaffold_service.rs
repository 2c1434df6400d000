//! Scaffold Service - main application orchestrator.
//!
//! One run for one entity:
//! 1. Expand the artifact layout into descriptors, ordered by layer
//! 2. Ensure each artifact (created only when absent)
//! 3. Ensure the extra layout directories
//! 4. Apply the registration plan, in its fixed order
//!
//! The first error aborts the run. Nothing is rolled back; re-running is the
//! recovery path because every step is idempotent.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ports::{Filesystem, TemplateRenderer, TemplateStore},
        services::{
            artifact_writer::{ArtifactStatus, ArtifactWriter},
            augmentation_engine::AugmentationEngine,
            registrations::{self, Step, Target},
            template_service::{PublishStatus, TemplateService},
        },
    },
    domain::{
        ArtifactKind, ArtifactLayout, AugmentOutcome, EntityName, ModuleName, ProjectContext,
        RouteStyle, TemplateName,
    },
    error::StrataResult,
};

/// Input for one scaffold run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldRequest {
    pub entity: EntityName,
    pub module: Option<ModuleName>,
    pub route_style: RouteStyle,
    /// Project root every relative path is joined onto.
    pub root: PathBuf,
    /// Migration timestamp, `YYYY_MM_DD_HHMMSS`.
    pub timestamp: String,
    pub relaxed_retry: bool,
}

impl ScaffoldRequest {
    pub fn new(entity: EntityName, root: impl Into<PathBuf>, timestamp: impl Into<String>) -> Self {
        Self {
            entity,
            module: None,
            route_style: RouteStyle::default(),
            root: root.into(),
            timestamp: timestamp.into(),
            relaxed_retry: false,
        }
    }

    pub fn module(mut self, module: Option<ModuleName>) -> Self {
        self.module = module;
        self
    }

    pub fn route_style(mut self, style: RouteStyle) -> Self {
        self.route_style = style;
        self
    }

    pub fn relaxed_retry(mut self, relaxed: bool) -> Self {
        self.relaxed_retry = relaxed;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRecord {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub status: ArtifactStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRecord {
    pub step: Step,
    pub host: PathBuf,
    pub token: String,
    pub outcome: AugmentOutcome,
}

/// What a run did, for the summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub artifacts: Vec<ArtifactRecord>,
    /// Extra directories, and whether each was created.
    pub directories: Vec<(PathBuf, bool)>,
    pub registrations: Vec<RegistrationRecord>,
}

impl ScaffoldReport {
    pub fn created(&self) -> usize {
        self.artifacts.iter().filter(|a| a.status.is_created()).count()
    }

    pub fn existing(&self) -> usize {
        self.artifacts.len() - self.created()
    }

    pub fn count(&self, label: &str) -> usize {
        self.registrations
            .iter()
            .filter(|r| r.outcome.label() == label)
            .count()
    }

    /// Registrations a human has to look at.
    pub fn attention(&self) -> impl Iterator<Item = &RegistrationRecord> {
        self.registrations.iter().filter(|r| r.outcome.needs_attention())
    }

    /// True when the run left every file as it found it.
    pub fn is_noop(&self) -> bool {
        self.created() == 0
            && self.directories.iter().all(|(_, created)| !created)
            && self.registrations.iter().all(|r| !r.outcome.wrote())
    }
}

/// Main scaffolding service.
pub struct ScaffoldService {
    templates: TemplateService,
    filesystem: Box<dyn Filesystem>,
    layout: ArtifactLayout,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters and the
    /// standard artifact layout.
    pub fn new(
        store: Box<dyn TemplateStore>,
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            templates: TemplateService::new(store, renderer),
            filesystem,
            layout: ArtifactLayout::standard(),
        }
    }

    /// Replace the standard layout.
    ///
    /// # Errors
    ///
    /// [`crate::domain::DomainError::InvalidLayout`] or
    /// [`crate::domain::DomainError::UnsupportedLayoutVersion`].
    pub fn with_layout(mut self, layout: ArtifactLayout) -> StrataResult<Self> {
        layout.validate()?;
        self.layout = layout;
        Ok(self)
    }

    pub fn templates(&self) -> &TemplateService {
        &self.templates
    }

    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    /// Scaffold every artifact for one entity and register it.
    #[instrument(
        skip_all,
        fields(
            entity = %request.entity,
            module = request.module.as_ref().map(ModuleName::as_str).unwrap_or("-"),
            root = %request.root.display()
        )
    )]
    pub fn scaffold(&self, request: &ScaffoldRequest) -> StrataResult<ScaffoldReport> {
        let ctx = ProjectContext::new(request.entity.clone(), request.module.clone());
        let base = ctx.bindings();
        let fs = self.filesystem.as_ref();
        let root = request.root.as_path();
        let mut report = ScaffoldReport::default();

        info!("Scaffolding {}", ctx.entity());

        let writer = ArtifactWriter::new(fs, root);
        for descriptor in self.layout.descriptors(&base, &request.timestamp)? {
            let status = writer.ensure_descriptor(&descriptor, &self.templates)?;
            report.artifacts.push(ArtifactRecord {
                kind: descriptor.kind,
                path: descriptor.path,
                status,
            });
        }

        for dir in self.layout.directories(&base)? {
            let created = writer.ensure_dir(&dir)?;
            report.directories.push((dir, created));
        }

        let engine = AugmentationEngine::new(fs, root, &self.templates);
        for registration in registrations::plan(&ctx, request.route_style, request.relaxed_retry) {
            let (outcome, token) = match &registration.target {
                Target::Host(host) => (
                    engine.augment(host)?,
                    host.augmentation.token.as_str().to_string(),
                ),
                Target::Descriptor {
                    path,
                    module,
                    provider,
                } => (
                    engine.register_descriptor(path, module, provider)?,
                    provider.clone(),
                ),
            };
            report.registrations.push(RegistrationRecord {
                step: registration.step,
                host: registration.path().to_path_buf(),
                token,
                outcome,
            });
        }

        let attention = report.attention().count();
        if attention > 0 {
            warn!(attention, "Some registrations need manual attention");
        }
        info!(
            created = report.created(),
            existing = report.existing(),
            applied = report.count("applied"),
            skipped = report.count("skipped"),
            "Scaffolding complete"
        );
        Ok(report)
    }

    /// Copy every resolvable template into `dest` under the project root.
    pub fn publish_templates(
        &self,
        dest: &Path,
        force: bool,
    ) -> StrataResult<Vec<(TemplateName, PublishStatus)>> {
        self.templates.publish(self.filesystem.as_ref(), dest, force)
    }
}
