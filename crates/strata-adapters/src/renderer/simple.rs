//! Simple placeholder substitution renderer.

use strata_core::{
    application::ports::TemplateRenderer,
    domain::{Bindings, Template},
    error::StrataResult,
};
use tracing::{debug, instrument};

/// Literal `{{token}}` substitution.
///
/// Tokens without a binding are left verbatim so a half-configured stub stays
/// readable in the generated file.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleRenderer;

impl SimpleRenderer {
    /// Create a new simple renderer.
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for SimpleRenderer {
    #[instrument(skip_all, fields(template = %template.name()))]
    fn render(&self, template: &Template, bindings: &Bindings) -> StrataResult<String> {
        let unresolved: Vec<String> = template
            .placeholders()
            .into_iter()
            .filter(|p| bindings.get(p).is_none())
            .collect();
        if !unresolved.is_empty() {
            debug!(?unresolved, "Placeholders left verbatim");
        }

        Ok(bindings.apply(template.source()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::domain::{TemplateName, TemplateOrigin};

    fn template(source: &str) -> Template {
        Template::new(TemplateName::new("model").unwrap(), source, TemplateOrigin::Builtin)
    }

    #[test]
    fn substitutes_every_occurrence() {
        let out = SimpleRenderer
            .render(
                &template("class {{model}} // {{model}} in {{table}}"),
                &Bindings::new().with("model", "Invoice").with("table", "invoices"),
            )
            .unwrap();
        assert_eq!(out, "class Invoice // Invoice in invoices");
    }

    #[test]
    fn unknown_tokens_pass_through() {
        let out = SimpleRenderer
            .render(&template("{{model}} {{custom}}"), &Bindings::new().with("model", "Invoice"))
            .unwrap();
        assert_eq!(out, "Invoice {{custom}}");
    }

    #[test]
    fn values_are_not_rescanned() {
        let out = SimpleRenderer
            .render(
                &template("{{a}}"),
                &Bindings::new().with("a", "{{b}}").with("b", "nope"),
            )
            .unwrap();
        assert_eq!(out, "{{b}}");
    }
}
