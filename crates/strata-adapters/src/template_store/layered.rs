//! Ordered store stack: the first layer that has a template wins.

use std::collections::BTreeMap;
use std::path::PathBuf;

use strata_core::{
    application::ports::TemplateStore,
    domain::{Template, TemplateName},
    error::StrataResult,
};

use super::{BuiltinStore, DirectoryStore};

pub struct LayeredStore {
    layers: Vec<Box<dyn TemplateStore>>,
}

impl LayeredStore {
    pub fn new(layers: Vec<Box<dyn TemplateStore>>) -> Self {
        Self { layers }
    }

    /// Override directory first, then the built-in stubs.
    pub fn with_override(dir: impl Into<PathBuf>) -> Self {
        Self::new(vec![
            Box::new(DirectoryStore::new(dir)),
            Box::new(BuiltinStore::new()),
        ])
    }
}

impl TemplateStore for LayeredStore {
    fn find(&self, name: &TemplateName) -> StrataResult<Option<Template>> {
        for layer in &self.layers {
            if let Some(template) = layer.find(name)? {
                return Ok(Some(template));
            }
        }
        Ok(None)
    }

    fn list(&self) -> StrataResult<Vec<Template>> {
        let mut merged: BTreeMap<TemplateName, Template> = BTreeMap::new();
        for layer in &self.layers {
            for template in layer.list()? {
                merged.entry(template.name().clone()).or_insert(template);
            }
        }
        Ok(merged.into_values().collect())
    }

    fn locations(&self, name: &TemplateName) -> Vec<String> {
        self.layers.iter().flat_map(|l| l.locations(name)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use strata_core::domain::TemplateOrigin;
    use tempfile::TempDir;

    #[test]
    fn override_wins_over_builtin() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("model.stub"), "overridden {{model}}").unwrap();
        let store = LayeredStore::with_override(temp.path());

        let model = store.find(&TemplateName::new("model").unwrap()).unwrap().unwrap();
        assert_eq!(model.source(), "overridden {{model}}");
        assert!(matches!(model.origin(), TemplateOrigin::Override(_)));

        let controller = store
            .find(&TemplateName::new("controller").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(controller.origin(), &TemplateOrigin::Builtin);
    }

    #[test]
    fn list_reports_one_entry_per_name() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("model.stub"), "x").unwrap();
        let all = LayeredStore::with_override(temp.path()).list().unwrap();

        assert_eq!(all.len(), crate::builtin_templates::BUILTIN.len());
        let model = all.iter().find(|t| t.name().as_str() == "model").unwrap();
        assert_eq!(model.source(), "x");
    }

    #[test]
    fn locations_cover_every_layer() {
        let store = LayeredStore::with_override("stubs/vendor/strata");
        let searched = store.locations(&TemplateName::new("model").unwrap());
        assert_eq!(searched.len(), 2);
        assert!(searched[0].ends_with("model.stub"));
        assert_eq!(searched[1], "built-in");
    }
}
