//! Artifact writer: create a file only when it does not exist yet.
//!
//! Presence is the idempotency key for generated files. Rendering is lazy, so
//! an existing artifact never touches the template store.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    application::{ports::Filesystem, services::template_service::TemplateService},
    domain::{ArtifactDescriptor, ExistingMatch},
    error::StrataResult,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactStatus {
    Created,
    /// Already present; holds the file that matched.
    Exists(PathBuf),
}

impl ArtifactStatus {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created)
    }
}

pub struct ArtifactWriter<'a> {
    fs: &'a dyn Filesystem,
    root: &'a Path,
}

impl<'a> ArtifactWriter<'a> {
    pub fn new(fs: &'a dyn Filesystem, root: &'a Path) -> Self {
        Self { fs, root }
    }

    /// Write `render()` to `path` (project-relative) unless it already exists.
    pub fn ensure<F>(&self, path: &Path, render: F) -> StrataResult<ArtifactStatus>
    where
        F: FnOnce() -> StrataResult<String>,
    {
        let full = self.root.join(path);
        if self.fs.exists(&full) {
            debug!(path = %path.display(), "Artifact exists, skipping");
            return Ok(ArtifactStatus::Exists(path.to_path_buf()));
        }

        let content = render()?;
        if let Some(parent) = full.parent() {
            self.fs.create_dir_all(parent)?;
        }
        self.fs.write_file(&full, &content)?;
        Ok(ArtifactStatus::Created)
    }

    /// Ensure one descriptor, honouring its existing-match rule.
    pub fn ensure_descriptor(
        &self,
        descriptor: &ArtifactDescriptor,
        templates: &TemplateService,
    ) -> StrataResult<ArtifactStatus> {
        if let Some(rule) = &descriptor.existing_match {
            if let Some(found) = self.find_match(rule)? {
                info!(
                    kind = %descriptor.kind,
                    path = %found.display(),
                    "{} already exists",
                    descriptor.kind
                );
                return Ok(ArtifactStatus::Exists(found));
            }
        }

        let status = self.ensure(&descriptor.path, || {
            templates.render(&descriptor.template, &descriptor.bindings)
        })?;

        match &status {
            ArtifactStatus::Created => info!(
                kind = %descriptor.kind,
                path = %descriptor.path.display(),
                "Created {}: {}",
                descriptor.kind,
                descriptor.path.display()
            ),
            ArtifactStatus::Exists(_) => info!(
                kind = %descriptor.kind,
                path = %descriptor.path.display(),
                "{} already exists",
                descriptor.kind
            ),
        }
        Ok(status)
    }

    /// Ensure a bare directory. Returns whether it was created.
    pub fn ensure_dir(&self, dir: &Path) -> StrataResult<bool> {
        let full = self.root.join(dir);
        if self.fs.exists(&full) {
            return Ok(false);
        }
        self.fs.create_dir_all(&full)?;
        info!(path = %dir.display(), "Created directory: {}", dir.display());
        Ok(true)
    }

    /// First file in the rule's directory whose name ends with its suffix,
    /// as a project-relative path.
    fn find_match(&self, rule: &ExistingMatch) -> StrataResult<Option<PathBuf>> {
        let dir = self.root.join(&rule.dir);
        if !self.fs.exists(&dir) {
            return Ok(None);
        }
        let mut entries = self.fs.list_dir(&dir)?;
        entries.sort();

        Ok(entries
            .into_iter()
            .find(|p| {
                p.file_name()
                    .and_then(OsStr::to_str)
                    .is_some_and(|n| n.ends_with(rule.suffix.as_str()))
            })
            .and_then(|p| p.file_name().map(|n| rule.dir.join(n))))
    }
}
