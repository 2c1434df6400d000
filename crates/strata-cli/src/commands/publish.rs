//! `strata publish` - copy the built-in templates into the override
//! directory so they can be customised per project.

use tracing::instrument;

use strata_adapters::{BuiltinStore, LocalFilesystem, SimpleRenderer};
use strata_core::application::{PublishStatus, TemplateService};

use crate::{cli::PublishArgs, config::AppConfig, error::CliResult, output::OutputManager};

#[instrument(skip_all, fields(force = args.force))]
pub fn execute(args: PublishArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| config.override_dir(&args.root));

    // Only built-ins are published; overrides already live in `dest`.
    let templates = TemplateService::new(Box::new(BuiltinStore::new()), Box::new(SimpleRenderer::new()));
    let results = templates.publish(&LocalFilesystem::new(), &dest, args.force)?;

    let count = |status: PublishStatus| results.iter().filter(|(_, s)| *s == status).count();
    let written = count(PublishStatus::Written);
    let overwritten = count(PublishStatus::Overwritten);
    let kept = count(PublishStatus::Kept);

    if output.is_json() {
        let items: Vec<_> = results
            .iter()
            .map(|(name, status)| {
                serde_json::json!({ "name": name.as_str(), "status": format!("{status:?}").to_lowercase() })
            })
            .collect();
        output.json(&serde_json::json!({ "dest": dest, "templates": items }))?;
        return Ok(());
    }

    for (name, status) in &results {
        let label = match status {
            PublishStatus::Written => "written",
            PublishStatus::Overwritten => "overwritten",
            PublishStatus::Kept => "kept",
        };
        output.detail(&format!("{label:<12} {}", dest.join(name.file_name()).display()))?;
    }

    output.success(&format!(
        "Published to {}: {written} written, {overwritten} overwritten, {kept} kept",
        dest.display()
    ))?;
    if kept > 0 {
        output.info("Existing stubs were kept; use --force to overwrite them.")?;
    }
    Ok(())
}
