//! Versioned artifact layout.
//!
//! One table says, per artifact kind, which template renders it and where it
//! goes. Path patterns use the same `{{token}}` syntax as templates, resolved
//! against the entity bindings plus `{{timestamp}}`.
//!
//! A project can ship its own layout as TOML:
//!
//! ```toml
//! version = 1
//! directories = ["{{appDir}}/Services/Contracts"]
//!
//! [[artifact]]
//! kind = "migration"
//! template = "database/migration"
//! path = "{{migrationsDir}}/{{timestamp}}_create_{{table}}_table.php"
//! existing_suffix = "_create_{{table}}_table.php"
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::entities::artifact::{ArtifactDescriptor, ArtifactKind, ExistingMatch};
use crate::domain::entities::template::Bindings;
use crate::domain::error::DomainError;
use crate::domain::value_objects::TemplateName;

pub const LAYOUT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSpec {
    pub kind: ArtifactKind,
    pub template: TemplateName,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_suffix: Option<String>,
    /// Extra bindings for this artifact only (e.g. `type = "Store"`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub bindings: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactLayout {
    pub version: u32,
    /// Directories ensured even when no artifact lands in them.
    #[serde(default)]
    pub directories: Vec<String>,
    #[serde(rename = "artifact")]
    pub artifacts: Vec<ArtifactSpec>,
}

impl ArtifactLayout {
    /// The layout every project gets unless it configures its own.
    pub fn standard() -> Self {
        use ArtifactKind as K;

        let spec = |kind, template: &'static str, path: &str| ArtifactSpec {
            kind,
            template: TemplateName::from_static(template),
            path: path.to_string(),
            existing_suffix: None,
            bindings: BTreeMap::new(),
        };
        let with_type = |mut s: ArtifactSpec, ty: &str| {
            s.bindings.insert("type".into(), ty.into());
            s
        };

        let mut migration = spec(
            K::Migration,
            "database/migration",
            "{{migrationsDir}}/{{timestamp}}_create_{{table}}_table.php",
        );
        migration.existing_suffix = Some("_create_{{table}}_table.php".into());

        Self {
            version: LAYOUT_VERSION,
            directories: vec!["{{appDir}}/Services/Contracts".into()],
            artifacts: vec![
                migration,
                spec(K::Factory, "database/factory", "{{factoriesDir}}/{{model}}Factory.php"),
                spec(K::Seeder, "database/seeder", "{{seedersDir}}/{{model}}Seeder.php"),
                spec(K::Model, "model", "{{appDir}}/Models/{{model}}.php"),
                spec(
                    K::Controller,
                    "controller",
                    "{{appDir}}/Http/Controllers/{{model}}Controller.php",
                ),
                with_type(
                    spec(
                        K::StoreRequest,
                        "request",
                        "{{appDir}}/Http/Requests/Store{{model}}Request.php",
                    ),
                    "Store",
                ),
                with_type(
                    spec(
                        K::UpdateRequest,
                        "request",
                        "{{appDir}}/Http/Requests/Update{{model}}Request.php",
                    ),
                    "Update",
                ),
                spec(
                    K::Resource,
                    "resource",
                    "{{appDir}}/Http/Resources/{{model}}Resource.php",
                ),
                spec(K::Policy, "policy", "{{appDir}}/Policies/{{model}}Policy.php"),
                spec(
                    K::RepositoryInterface,
                    "repositories/repository-interface",
                    "{{appDir}}/Repositories/Contracts/{{model}}RepositoryInterface.php",
                ),
                spec(
                    K::Repository,
                    "repositories/repository",
                    "{{appDir}}/Repositories/{{model}}Repository.php",
                ),
                spec(K::Service, "service", "{{appDir}}/Services/{{model}}Service.php"),
                spec(
                    K::FeatureTest,
                    "tests/feature-test",
                    "{{testsDir}}/Feature/{{model}}Test.php",
                ),
                spec(
                    K::UnitTest,
                    "tests/unit-test",
                    "{{testsDir}}/Unit/{{model}}ServiceTest.php",
                ),
            ],
        }
    }

    /// Structural checks run after loading a user layout.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.version != LAYOUT_VERSION {
            return Err(DomainError::UnsupportedLayoutVersion {
                found: self.version,
                supported: LAYOUT_VERSION,
            });
        }
        if self.artifacts.is_empty() {
            return Err(DomainError::InvalidLayout("no artifacts declared".into()));
        }

        let mut seen = BTreeSet::new();
        for spec in &self.artifacts {
            if !seen.insert(spec.kind) {
                return Err(DomainError::InvalidLayout(format!(
                    "artifact kind '{}' declared twice",
                    spec.kind
                )));
            }
            check_relative(&spec.path)?;
            if let Some(suffix) = &spec.existing_suffix {
                if suffix.contains('/') {
                    return Err(DomainError::InvalidLayout(format!(
                        "existing_suffix '{suffix}' must be a file name suffix"
                    )));
                }
            }
        }
        for dir in &self.directories {
            check_relative(dir)?;
        }
        Ok(())
    }

    /// Expand every artifact for one entity, ordered by layer.
    pub fn descriptors(
        &self,
        base: &Bindings,
        timestamp: &str,
    ) -> Result<Vec<ArtifactDescriptor>, DomainError> {
        let mut out = Vec::with_capacity(self.artifacts.len());

        for spec in &self.artifacts {
            let mut bindings = base.clone();
            bindings.insert("timestamp", timestamp);
            for (k, v) in &spec.bindings {
                bindings.insert(k.as_str(), v.as_str());
            }

            let path = PathBuf::from(expand(&spec.path, &bindings)?);
            let existing_match = match &spec.existing_suffix {
                Some(suffix) => Some(ExistingMatch {
                    dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
                    suffix: expand(suffix, &bindings)?,
                }),
                None => None,
            };

            out.push(ArtifactDescriptor {
                kind: spec.kind,
                path,
                template: spec.template.clone(),
                bindings,
                existing_match,
            });
        }

        out.sort_by_key(ArtifactDescriptor::layer);
        Ok(out)
    }

    pub fn directories(&self, base: &Bindings) -> Result<Vec<PathBuf>, DomainError> {
        self.directories
            .iter()
            .map(|d| expand(d, base).map(PathBuf::from))
            .collect()
    }
}

fn expand(pattern: &str, bindings: &Bindings) -> Result<String, DomainError> {
    let out = bindings.apply(pattern);
    if out.contains("{{") {
        return Err(DomainError::InvalidLayout(format!(
            "unresolved placeholder in '{pattern}'"
        )));
    }
    Ok(out)
}

fn check_relative(pattern: &str) -> Result<(), DomainError> {
    if pattern.is_empty()
        || pattern.starts_with('/')
        || pattern.split('/').any(|seg| seg == "..")
    {
        return Err(DomainError::InvalidLayout(format!(
            "'{pattern}' must be a project-relative path"
        )));
    }
    Ok(())
}
