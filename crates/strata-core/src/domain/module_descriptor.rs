//! `module.json` provider registration.
//!
//! The descriptor is JSON, so it is edited as structured data rather than
//! through the line locator. Key order is preserved and output is
//! pretty-printed with four-space indentation.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::domain::error::DomainError;
use crate::domain::value_objects::ModuleName;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorChange {
    /// No descriptor existed; this is the new file.
    Created(String),
    /// The provider was appended; this is the rewritten file.
    Updated(String),
    /// The provider is already listed.
    Unchanged,
}

/// Ensure `provider` is listed in the descriptor's `providers` array.
///
/// # Errors
///
/// [`DomainError::MalformedDescriptor`] when the existing text is not a JSON
/// object or its `providers` entry is not an array.
pub fn register_provider(
    existing: Option<&str>,
    module: &ModuleName,
    provider: &str,
) -> Result<DescriptorChange, DomainError> {
    let Some(text) = existing else {
        let fresh = json!({
            "name": module.as_str(),
            "alias": module.alias(),
            "description": "",
            "providers": [provider],
        });
        return Ok(DescriptorChange::Created(pretty(&fresh)?));
    };

    let mut root: Value = serde_json::from_str(text).map_err(|e| malformed(e.to_string()))?;
    let object: &mut Map<String, Value> = root
        .as_object_mut()
        .ok_or_else(|| malformed("top level must be an object".into()))?;

    let providers = object
        .entry("providers")
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(|| malformed("'providers' must be an array".into()))?;

    if providers.iter().any(|p| p.as_str() == Some(provider)) {
        return Ok(DescriptorChange::Unchanged);
    }
    providers.push(Value::String(provider.to_string()));

    Ok(DescriptorChange::Updated(pretty(&root)?))
}

fn malformed(reason: String) -> DomainError {
    DomainError::MalformedDescriptor { reason }
}

fn pretty(value: &Value) -> Result<String, DomainError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| malformed(e.to_string()))?;
    let mut out = String::from_utf8(buf).map_err(|e| malformed(e.to_string()))?;
    out.push('\n');
    Ok(out)
}
