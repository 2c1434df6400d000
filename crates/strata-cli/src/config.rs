//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `STRATA__*` environment variables (`STRATA__AUGMENT__RELAXED_RETRY=true`)
//! 3. `.strata.toml` in the project root (`--root`), or the current directory
//! 4. The user config file, or the file passed with `--config`
//! 5. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// File name of the project-local config.
pub const LOCAL_CONFIG: &str = ".strata.toml";

/// Default override directory, relative to the project root.
pub const DEFAULT_OVERRIDE_DIR: &str = "stubs/vendor/strata";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Template settings.
    pub templates: TemplateConfig,
    /// Host-file augmentation settings.
    pub augment: AugmentConfig,
    /// Artifact layout settings.
    pub layout: LayoutConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory searched before the built-in templates.
    pub override_dir: PathBuf,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            override_dir: PathBuf::from(DEFAULT_OVERRIDE_DIR),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    pub relaxed_retry: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// TOML layout replacing the standard one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration for one command.
    ///
    /// `config_file` is the path the user passed via `--config`; it must
    /// exist.  Without it the user config file is read when present.  The
    /// project-local `.strata.toml` is read from `project_root` (relative to
    /// the current directory), or from the current directory for commands
    /// that have no project.
    pub fn load(config_file: Option<&PathBuf>, project_root: Option<&Path>) -> anyhow::Result<Self> {
        let cwd = std::env::current_dir().context("cannot determine current directory")?;
        let project = match project_root {
            Some(root) => cwd.join(root),
            None => cwd,
        };
        Self::load_from(config_file, &project)
    }

    /// Same as [`Self::load`] with the local config directory resolved.
    pub fn load_from(config_file: Option<&PathBuf>, project: &Path) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let (user_file, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        debug!(user = %user_file.display(), required, "Loading configuration");

        let config = Config::builder()
            .set_default(
                "templates.override_dir",
                defaults.templates.override_dir.to_string_lossy().into_owned(),
            )?
            .set_default("augment.relaxed_retry", defaults.augment.relaxed_retry)?
            .set_default("output.no_color", defaults.output.no_color)?
            .set_default("output.format", defaults.output.format)?
            .add_source(
                File::from(user_file.as_path())
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                File::from(project.join(LOCAL_CONFIG))
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("STRATA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("cannot read configuration from {}", user_file.display()))?;

        config
            .try_deserialize()
            .context("configuration has an invalid shape")
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.strata.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "strata", "strata")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG))
    }

    /// Override directory for a project rooted at `root`.
    pub fn override_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.templates.override_dir)
    }

    /// Configured layout file resolved against `root`, if any.
    pub fn layout_file(&self, root: &Path) -> Option<PathBuf> {
        self.layout.file.as_ref().map(|f| root.join(f))
    }
}
