//! Domain value objects: EntityName, ModuleName, TemplateName, UniquenessToken,
//! Fragment, RouteStyle.
//!
//! These are pure value types with equality-by-value and no identity. Each one
//! validates at construction so the rest of the core can assume well-formed
//! input.

use crate::domain::error::DomainError;
use crate::domain::naming;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── EntityName ───────────────────────────────────────────────────────────────

/// The entity being scaffolded (`Invoice`, `OrderLine`).
///
/// Always stored in PascalCase; the naming variants templates need are
/// computed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityName(String);

impl EntityName {
    /// Parse a user-supplied name. `None` or blank input is
    /// [`DomainError::MissingEntityName`].
    pub fn parse(raw: Option<&str>) -> Result<Self, DomainError> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty());
        let Some(raw) = raw else {
            return Err(DomainError::MissingEntityName);
        };

        let normalized = normalize_identifier(raw).map_err(|reason| {
            DomainError::InvalidEntityName {
                name: raw.to_string(),
                reason,
            }
        })?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Invoices`
    pub fn plural(&self) -> String {
        naming::pluralize(&self.0)
    }

    /// `invoice`, `orderLine`
    pub fn variable(&self) -> String {
        naming::camel(&self.0)
    }

    /// `invoice`, `order-line`
    pub fn kebab(&self) -> String {
        naming::kebab(&self.0)
    }

    /// `invoices`, `order-lines`. Used as the route name.
    pub fn kebab_plural(&self) -> String {
        naming::kebab(&self.plural())
    }

    /// `invoices`, `order_lines`
    pub fn table(&self) -> String {
        naming::snake(&self.plural())
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(Some(s))
    }
}

// ── ModuleName ───────────────────────────────────────────────────────────────

/// Group name for grouped mode (`--module Billing`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleName(String);

impl ModuleName {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidModuleName {
                name: raw.to_string(),
                reason: "module name cannot be empty".into(),
            });
        }
        let normalized =
            normalize_identifier(trimmed).map_err(|reason| DomainError::InvalidModuleName {
                name: raw.to_string(),
                reason,
            })?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `billing`, `order_admin`. Used for the module descriptor alias.
    pub fn alias(&self) -> String {
        naming::snake(&self.0)
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModuleName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// PascalCase a raw identifier and check it can be used as a class name.
fn normalize_identifier(raw: &str) -> Result<String, String> {
    if raw.contains(['/', '\\', '.']) {
        return Err("must not contain path separators or dots".into());
    }
    let pascal = naming::pascal(raw);
    let mut chars = pascal.chars();
    match chars.next() {
        None => Err("must contain at least one letter".into()),
        Some(first) if !first.is_ascii_alphabetic() => {
            Err("must start with a letter".into())
        }
        Some(_) if !chars.all(|c| c.is_ascii_alphanumeric()) => {
            Err("only ASCII letters and digits are allowed".into())
        }
        Some(_) => Ok(pascal),
    }
}

// ── TemplateName ─────────────────────────────────────────────────────────────

/// Logical template name, e.g. `database/migration`.
///
/// Always a forward-slash relative path without `..` segments, so it can be
/// joined onto an override directory safely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TemplateName(String);

impl TemplateName {
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let name = raw.into();
        let invalid = |reason: &str| DomainError::InvalidTemplateName {
            name: name.clone(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if name.starts_with('/') || name.contains('\\') {
            return Err(invalid("must be a forward-slash relative path"));
        }
        if name.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
            return Err(invalid("empty, '.' and '..' segments are not allowed"));
        }
        if name.ends_with(".stub") {
            return Err(invalid("omit the .stub extension"));
        }
        Ok(Self(name))
    }

    /// For names compiled into the binary.
    pub(crate) fn from_static(name: &'static str) -> Self {
        debug_assert!(Self::new(name).is_ok(), "invalid built-in template name {name}");
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Relative file name inside a template directory.
    pub fn file_name(&self) -> String {
        format!("{}.stub", self.0)
    }
}

impl TryFrom<String> for TemplateName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TemplateName> for String {
    fn from(value: TemplateName) -> Self {
        value.0
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── UniquenessToken / Fragment ───────────────────────────────────────────────

/// Substring whose presence in a host file means a fragment was already
/// applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniquenessToken(String);

impl UniquenessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UniquenessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Literal text inserted by an augmentation. May span several lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment(String);

impl Fragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.lines()
    }
}

// ── RouteStyle ───────────────────────────────────────────────────────────────

/// Which route table a resource is registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStyle {
    /// `routes/api.php`, `Route::apiResource`
    #[default]
    Api,
    /// `routes/web.php`, `Route::resource`
    Web,
}

impl RouteStyle {
    pub const fn file_stem(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Web => "web",
        }
    }

    pub const fn route_method(self) -> &'static str {
        match self {
            Self::Api => "apiResource",
            Self::Web => "resource",
        }
    }
}

impl fmt::Display for RouteStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_name_is_required() {
        assert_eq!(EntityName::parse(None), Err(DomainError::MissingEntityName));
        assert_eq!(
            EntityName::parse(Some("   ")),
            Err(DomainError::MissingEntityName)
        );
    }

    #[test]
    fn entity_name_normalizes_to_pascal_case() {
        assert_eq!(EntityName::parse(Some("invoice")).unwrap().as_str(), "Invoice");
        assert_eq!(
            EntityName::parse(Some("order_line")).unwrap().as_str(),
            "OrderLine"
        );
    }

    #[test]
    fn entity_name_rejects_unusable_identifiers() {
        assert!(matches!(
            EntityName::parse(Some("9lives")),
            Err(DomainError::InvalidEntityName { .. })
        ));
        assert!(matches!(
            EntityName::parse(Some("App/Invoice")),
            Err(DomainError::InvalidEntityName { .. })
        ));
    }

    #[test]
    fn entity_naming_variants() {
        let name = EntityName::parse(Some("Invoice")).unwrap();
        assert_eq!(name.plural(), "Invoices");
        assert_eq!(name.variable(), "invoice");
        assert_eq!(name.kebab(), "invoice");
        assert_eq!(name.kebab_plural(), "invoices");
        assert_eq!(name.table(), "invoices");

        let name = EntityName::parse(Some("OrderCategory")).unwrap();
        assert_eq!(name.variable(), "orderCategory");
        assert_eq!(name.kebab_plural(), "order-categories");
        assert_eq!(name.table(), "order_categories");
    }

    #[test]
    fn module_name_parses() {
        let module = ModuleName::parse("billing").unwrap();
        assert_eq!(module.as_str(), "Billing");
        assert_eq!(module.alias(), "billing");
        assert_eq!(ModuleName::parse("OrderAdmin").unwrap().alias(), "order_admin");
        assert!(ModuleName::parse("").is_err());
    }

    #[test]
    fn template_name_rejects_traversal() {
        assert!(TemplateName::new("database/migration").is_ok());
        assert!(TemplateName::new("../secrets").is_err());
        assert!(TemplateName::new("/etc/passwd").is_err());
        assert!(TemplateName::new("model.stub").is_err());
        assert!(TemplateName::new("a//b").is_err());
    }

    #[test]
    fn template_name_file_name() {
        let name = TemplateName::new("tests/unit-test").unwrap();
        assert_eq!(name.file_name(), "tests/unit-test.stub");
    }

    #[test]
    fn route_style_maps_to_file_and_method() {
        assert_eq!(RouteStyle::Api.file_stem(), "api");
        assert_eq!(RouteStyle::Web.route_method(), "resource");
        assert_eq!(RouteStyle::default(), RouteStyle::Api);
    }
}
