//! `strata init` - create a default configuration file.

use std::path::{Path, PathBuf};

use strata_adapters::layout_loader::standard_layout_toml;

use crate::{
    cli::InitArgs,
    config::{AppConfig, LOCAL_CONFIG},
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// File written by `strata init --layout`.
pub const LAYOUT_FILE: &str = "strata.layout.toml";

pub fn execute(args: InitArgs, output: OutputManager) -> CliResult<()> {
    output.info("Initialising configuration...")?;

    let config_path = if args.local {
        PathBuf::from(LOCAL_CONFIG)
    } else {
        AppConfig::config_path()
    };

    let mut config = AppConfig::default();
    if args.layout {
        config.layout.file = Some(PathBuf::from(LAYOUT_FILE));
    }
    let toml = toml::to_string_pretty(&config)
        .with_cli_context(|| "Failed to serialise default config")?;
    write_file(&config_path, &toml, args.force, &output)?;

    if args.layout {
        let layout = standard_layout_toml()?;
        write_file(Path::new(LAYOUT_FILE), &layout, args.force, &output)?;
    }

    Ok(())
}

fn write_file(path: &Path, content: &str, force: bool, output: &OutputManager) -> CliResult<()> {
    if path.exists() && !force {
        output.warning(&format!(
            "{} already exists (use --force to overwrite)",
            path.display(),
        ))?;
        return Ok(());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_cli_context(|| format!("Failed to write '{}'", path.display()))?;

    output.success(&format!("Created {}", path.display()))?;
    Ok(())
}
