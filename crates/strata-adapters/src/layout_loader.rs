//! Load a custom artifact layout from a TOML file.
//!
//! ```toml
//! version = 1
//! directories = ["{{appDir}}/Services/Contracts"]
//!
//! [[artifact]]
//! kind = "model"
//! template = "model"
//! path = "{{appDir}}/Domain/{{model}}.php"
//! ```

use std::fs;
use std::path::Path;

use tracing::{info, instrument};

use strata_core::{
    domain::ArtifactLayout,
    error::{Context as _, StrataError, StrataResult},
};

/// Read, parse and validate a layout file.
///
/// # Errors
///
/// [`StrataError::Configuration`] when the file cannot be read or parsed;
/// the layout's own validation errors otherwise.
#[instrument]
pub fn load_layout(path: &Path) -> StrataResult<ArtifactLayout> {
    let raw = fs::read_to_string(path).map_err(|e| StrataError::Configuration {
        message: format!("cannot read layout file '{}': {e}", path.display()),
    })?;
    let layout = parse_layout(&raw).map_err(|e| match e {
        StrataError::Configuration { message } => StrataError::Configuration {
            message: format!("{}: {message}", path.display()),
        },
        other => other,
    })?;
    info!(artifacts = layout.artifacts.len(), "Loaded custom layout");
    Ok(layout)
}

/// Parse and validate layout TOML.
pub fn parse_layout(raw: &str) -> StrataResult<ArtifactLayout> {
    let layout: ArtifactLayout = toml::from_str(raw).map_err(|e| StrataError::Configuration {
        message: format!("invalid layout: {e}"),
    })?;
    layout.validate()?;
    Ok(layout)
}

/// The standard layout as TOML, a starting point for customisation.
pub fn standard_layout_toml() -> StrataResult<String> {
    toml::to_string_pretty(&ArtifactLayout::standard()).context("serialising standard layout")
}
