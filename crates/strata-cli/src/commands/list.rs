//! Implementation of the `strata list` command.

use serde_json::json;

use strata_adapters::{LayeredStore, SimpleRenderer};
use strata_core::application::TemplateService;

use crate::{
    cli::{ListArgs, ListFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let store = LayeredStore::with_override(config.override_dir(&args.root));
    let service = TemplateService::new(Box::new(store), Box::new(SimpleRenderer::new()));
    let templates = service.list()?;

    match args.format {
        ListFormat::Table => {
            output.header("Available Templates:")?;
            let width = templates.iter().map(|t| t.name.len()).max().unwrap_or(0);
            for t in &templates {
                let source = match &t.path {
                    Some(path) => format!("{} ({})", t.origin, path.display()),
                    None => t.origin.clone(),
                };
                output.print(&format!("  {:<width$}  {source}", t.name))?;
            }
        }

        ListFormat::Json => {
            let items: Vec<_> = templates
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name,
                        "origin": t.origin,
                        "path": t.path,
                        "placeholders": t.placeholders,
                    })
                })
                .collect();
            output.json(&json!(items))?;
        }

        ListFormat::List => {
            for t in &templates {
                output.print(&t.name)?;
            }
        }
    }

    Ok(())
}
