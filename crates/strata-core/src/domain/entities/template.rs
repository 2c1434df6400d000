//! Templates and placeholder bindings.
//!
//! ## Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Template (Entity)                            │
//! │  ├── name: TemplateName   "database/migration"│
//! │  ├── origin: Override(path) | Builtin         │
//! │  └── source: text with {{token}} placeholders │
//! ├──────────────────────────────────────────────┤
//! │  Bindings (Value Object)                      │
//! │  └── token -> value, built fresh per artifact │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Substitution is a single left-to-right pass: a bound value is never
//! re-scanned, so a value that itself contains `{{x}}` is emitted verbatim.
//! Tokens without a binding are left in place.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::domain::value_objects::TemplateName;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Where a resolved template came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOrigin {
    /// Found in the project's override directory.
    Override(PathBuf),
    /// Bundled into the binary.
    Builtin,
}

impl TemplateOrigin {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Override(_) => "override",
            Self::Builtin => "built-in",
        }
    }
}

/// Immutable named template text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: TemplateName,
    source: String,
    origin: TemplateOrigin,
}

impl Template {
    pub fn new(name: TemplateName, source: impl Into<String>, origin: TemplateOrigin) -> Self {
        Self {
            name,
            source: source.into(),
            origin,
        }
    }

    pub fn name(&self) -> &TemplateName {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn origin(&self) -> &TemplateOrigin {
        &self.origin
    }

    /// Placeholder tokens declared by this template, in sorted order.
    pub fn placeholders(&self) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        scan(&self.source, |token| {
            found.insert(token.to_string());
            None
        });
        found
    }
}

/// Token -> value map for one render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, token: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(token, value);
        self
    }

    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) {
        self.values.insert(token.into(), value.into());
    }

    /// Merge `other` on top of `self`; `other` wins on conflicts.
    pub fn extend(&mut self, other: &Bindings) {
        for (k, v) in &other.values {
            self.values.insert(k.clone(), v.clone());
        }
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Substitute every bound `{{token}}` in `text`.
    pub fn apply(&self, text: &str) -> String {
        scan(text, |token| self.get(token))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bindings = Self::new();
        for (k, v) in iter {
            bindings.insert(k, v);
        }
        bindings
    }
}

/// Walk `text`, calling `resolve` for every `{{token}}`. A `Some` result
/// replaces the placeholder; `None` keeps it verbatim.
fn scan<'a, F>(text: &str, mut resolve: F) -> String
where
    F: FnMut(&str) -> Option<&'a str>,
{
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];

        let Some(end) = after_open.find(CLOSE) else {
            out.push_str(&rest[start..]);
            return out;
        };

        let token = &after_open[..end];
        let is_token = !token.is_empty()
            && token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-');

        match is_token.then(|| resolve(token)).flatten() {
            Some(value) => out.push_str(value),
            None if is_token => {
                out.push_str(OPEN);
                out.push_str(token);
                out.push_str(CLOSE);
            }
            None => {
                // Not a placeholder: emit one brace and rescan from the next.
                out.push('{');
                rest = &rest[start + 1..];
                continue;
            }
        }
        rest = &after_open[end + CLOSE.len()..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(source: &str) -> Template {
        Template::new(
            TemplateName::new("model").unwrap(),
            source,
            TemplateOrigin::Builtin,
        )
    }

    #[test]
    fn substitutes_bound_tokens() {
        let bindings = Bindings::new()
            .with("model", "Invoice")
            .with("table", "invoices");
        assert_eq!(
            bindings.apply("class {{model}} uses {{table}}"),
            "class Invoice uses invoices"
        );
    }

    #[test]
    fn unbound_tokens_stay_verbatim() {
        let bindings = Bindings::new().with("model", "Invoice");
        assert_eq!(
            bindings.apply("{{model}} {{unknown}}"),
            "Invoice {{unknown}}"
        );
    }

    #[test]
    fn substitution_is_single_pass() {
        let bindings = Bindings::new()
            .with("a", "{{b}}")
            .with("b", "nope");
        assert_eq!(bindings.apply("{{a}}"), "{{b}}");
    }

    #[test]
    fn non_token_braces_are_preserved() {
        let bindings = Bindings::new().with("x", "1");
        assert_eq!(bindings.apply("{{ x }} {{x}}"), "{{ x }} 1");
        assert_eq!(bindings.apply("tail {{x"), "tail {{x");
        assert_eq!(bindings.apply("{{{x}}}"), "{1}");
    }

    #[test]
    fn placeholders_are_collected() {
        let tpl = template("{{model}} {{table}} {{model}} {{ not one }}");
        let names: Vec<_> = tpl.placeholders().into_iter().collect();
        assert_eq!(names, vec!["model".to_string(), "table".to_string()]);
    }

    #[test]
    fn extend_overrides() {
        let mut base = Bindings::new().with("a", "1").with("b", "2");
        base.extend(&Bindings::new().with("b", "3"));
        assert_eq!(base.get("a"), Some("1"));
        assert_eq!(base.get("b"), Some("3"));
    }

    #[test]
    fn origin_labels() {
        assert_eq!(TemplateOrigin::Builtin.label(), "built-in");
        assert_eq!(TemplateOrigin::Override(PathBuf::from("x")).label(), "override");
    }
}
