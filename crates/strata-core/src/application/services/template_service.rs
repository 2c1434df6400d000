//! Template Service - template resolution, rendering and publishing.
//!
//! Separated from ScaffoldService for single responsibility.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRenderer, TemplateStore},
    },
    domain::{Bindings, Template, TemplateName},
    error::StrataResult,
};

/// Information about a template for display purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInfo {
    pub name: String,
    /// `override` or `built-in`.
    pub origin: String,
    /// Override file path, if the override wins.
    pub path: Option<PathBuf>,
    pub placeholders: Vec<String>,
}

impl From<&Template> for TemplateInfo {
    fn from(t: &Template) -> Self {
        let path = match t.origin() {
            crate::domain::TemplateOrigin::Override(p) => Some(p.clone()),
            crate::domain::TemplateOrigin::Builtin => None,
        };
        Self {
            name: t.name().to_string(),
            origin: t.origin().label().to_string(),
            path,
            placeholders: t.placeholders().into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStatus {
    Written,
    Overwritten,
    Kept,
}

/// Service for template operations.
pub struct TemplateService {
    store: Box<dyn TemplateStore>,
    renderer: Box<dyn TemplateRenderer>,
}

impl TemplateService {
    pub fn new(store: Box<dyn TemplateStore>, renderer: Box<dyn TemplateRenderer>) -> Self {
        Self { store, renderer }
    }

    /// Resolve a template by logical name.
    ///
    /// # Errors
    ///
    /// [`ApplicationError::TemplateNotFound`] when no store layer has it.
    pub fn resolve(&self, name: &TemplateName) -> StrataResult<Template> {
        match self.store.find(name)? {
            Some(template) => {
                debug!(template = %name, origin = template.origin().label(), "Template resolved");
                Ok(template)
            }
            None => Err(ApplicationError::TemplateNotFound {
                name: name.to_string(),
                searched: self.store.locations(name),
            }
            .into()),
        }
    }

    /// Resolve and render in one step.
    pub fn render(&self, name: &TemplateName, bindings: &Bindings) -> StrataResult<String> {
        let template = self.resolve(name)?;
        self.renderer.render(&template, bindings)
    }

    /// List all templates.
    pub fn list(&self) -> StrataResult<Vec<TemplateInfo>> {
        Ok(self.store.list()?.iter().map(TemplateInfo::from).collect())
    }

    /// Copy every template into `dest` as `<name>.stub`. Existing files are
    /// kept unless `force` is set.
    #[instrument(skip_all, fields(dest = %dest.display(), force))]
    pub fn publish(
        &self,
        fs: &dyn Filesystem,
        dest: &Path,
        force: bool,
    ) -> StrataResult<Vec<(TemplateName, PublishStatus)>> {
        let mut out = Vec::new();

        for template in self.store.list()? {
            let path = dest.join(template.name().file_name());
            let existed = fs.exists(&path);

            let status = match (existed, force) {
                (true, false) => PublishStatus::Kept,
                (true, true) => PublishStatus::Overwritten,
                (false, _) => PublishStatus::Written,
            };

            if status != PublishStatus::Kept {
                if let Some(parent) = path.parent() {
                    fs.create_dir_all(parent)?;
                }
                fs.write_file(&path, template.source())?;
                info!(path = %path.display(), "Published stub");
            }
            out.push((template.name().clone(), status));
        }

        Ok(out)
    }
}
