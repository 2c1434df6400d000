//! Override directory store: `<dir>/<name>.stub` files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use strata_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{Template, TemplateName, TemplateOrigin},
    error::StrataResult,
};

/// Reads stubs from a directory tree. A missing directory is an empty store.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &TemplateName) -> PathBuf {
        self.root.join(name.file_name())
    }

    fn load(&self, name: TemplateName, path: PathBuf) -> StrataResult<Template> {
        let source = fs::read_to_string(&path).map_err(|e| ApplicationError::FilesystemError {
            path: path.clone(),
            reason: format!("Failed to read stub: {e}"),
        })?;
        Ok(Template::new(name, source, TemplateOrigin::Override(path)))
    }
}

impl TemplateStore for DirectoryStore {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn find(&self, name: &TemplateName) -> StrataResult<Option<Template>> {
        let path = self.path_of(name);
        if !path.is_file() {
            return Ok(None);
        }
        debug!(path = %path.display(), "Using override stub");
        self.load(name.clone(), path).map(Some)
    }

    fn list(&self) -> StrataResult<Vec<Template>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut templates = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: self.root.clone(),
                reason: format!("directory walk error: {e}"),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(name) = logical_name(&self.root, entry.path()) else {
                continue;
            };
            match TemplateName::new(name.as_str()) {
                Ok(name) => templates.push(self.load(name, entry.path().to_path_buf())?),
                Err(e) => {
                    // One odd file must not hide the rest.
                    warn!(path = %entry.path().display(), error = %e, "Skipping stub");
                }
            }
        }

        templates.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(templates)
    }

    fn locations(&self, name: &TemplateName) -> Vec<String> {
        vec![self.path_of(name).display().to_string()]
    }
}

/// `<root>/database/migration.stub` -> `database/migration`.
fn logical_name(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let rel = rel.to_string_lossy().replace('\\', "/");
    rel.strip_suffix(".stub").map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn stub_dir(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (rel, content) in files {
            let full = temp.path().join(rel);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        temp
    }

    #[test]
    fn finds_nested_stub() {
        let temp = stub_dir(&[("database/migration.stub", "custom {{table}}")]);
        let store = DirectoryStore::new(temp.path());

        let t = store
            .find(&TemplateName::new("database/migration").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(t.source(), "custom {{table}}");
        assert_eq!(
            t.origin(),
            &TemplateOrigin::Override(temp.path().join("database/migration.stub"))
        );
    }

    #[test]
    fn missing_directory_is_empty() {
        let store = DirectoryStore::new("/definitely/not/here");
        assert!(store.list().unwrap().is_empty());
        assert!(store.find(&TemplateName::new("model").unwrap()).unwrap().is_none());
    }

    #[test]
    fn list_ignores_non_stub_files() {
        let temp = stub_dir(&[
            ("model.stub", "m"),
            ("README.md", "docs"),
            ("tests/unit-test.stub", "u"),
        ]);
        let names: Vec<String> = DirectoryStore::new(temp.path())
            .list()
            .unwrap()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names, vec!["model", "tests/unit-test"]);
    }
}
