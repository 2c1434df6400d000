//! Store over the stubs compiled into the binary.

use strata_core::{
    application::ports::TemplateStore,
    domain::{Template, TemplateName, TemplateOrigin},
    error::StrataResult,
};

use crate::builtin_templates::{self, BUILTIN};

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinStore;

impl BuiltinStore {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateStore for BuiltinStore {
    fn find(&self, name: &TemplateName) -> StrataResult<Option<Template>> {
        Ok(builtin_templates::source(name.as_str())
            .map(|src| Template::new(name.clone(), src, TemplateOrigin::Builtin)))
    }

    fn list(&self) -> StrataResult<Vec<Template>> {
        BUILTIN
            .iter()
            .map(|(name, src)| -> StrataResult<Template> {
                Ok(Template::new(
                    TemplateName::new(*name)?,
                    *src,
                    TemplateOrigin::Builtin,
                ))
            })
            .collect()
    }

    fn locations(&self, _name: &TemplateName) -> Vec<String> {
        vec!["built-in".into()]
    }
}
