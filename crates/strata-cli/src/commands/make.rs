//! Implementation of the `strata make` command.
//!
//! Responsibility: translate CLI arguments into a `ScaffoldRequest`, wire the
//! adapters, call the core scaffold service, and display the run summary.

use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::{debug, info, instrument};

use strata_adapters::{LayeredStore, LocalFilesystem, SimpleRenderer, load_layout};
use strata_core::{
    application::{ArtifactStatus, ScaffoldReport, ScaffoldRequest, ScaffoldService},
    domain::{EntityName, ModuleName, RouteStyle},
};

use crate::{
    cli::MakeArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Migration timestamp format, `2025_03_14_092653`.
const TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H%M%S";

/// Execute the `strata make` command.
#[instrument(skip_all, fields(model = args.model.as_deref().unwrap_or("")))]
pub fn execute(args: MakeArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let request = build_request(&args, &config)?;
    let service = build_service(&args, &config, &request.root)?;

    debug!(
        entity = %request.entity,
        module = request.module.as_ref().map(ModuleName::as_str).unwrap_or("-"),
        routes = %request.route_style,
        root = %request.root.display(),
        "Request resolved"
    );

    let report = service.scaffold(&request)?;
    info!(
        created = report.created(),
        existing = report.existing(),
        "Scaffold completed"
    );

    if output.is_json() {
        output.json(&summary_json(&request, &report))?;
    } else {
        print_summary(&request, &report, &output)?;
    }
    Ok(())
}

fn build_request(args: &MakeArgs, config: &AppConfig) -> CliResult<ScaffoldRequest> {
    let entity = EntityName::parse(args.model.as_deref())?;
    let module = args.module.as_deref().map(ModuleName::parse).transpose()?;

    if !args.root.is_dir() {
        return Err(CliError::ProjectRootNotFound {
            path: args.root.clone(),
        });
    }

    let style = if args.view {
        RouteStyle::Web
    } else {
        RouteStyle::Api
    };
    let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();

    Ok(ScaffoldRequest::new(entity, args.root.clone(), timestamp)
        .module(module)
        .route_style(style)
        .relaxed_retry(args.relaxed_retry || config.augment.relaxed_retry))
}

fn build_service(args: &MakeArgs, config: &AppConfig, root: &Path) -> CliResult<ScaffoldService> {
    let override_dir = config.override_dir(root);
    debug!(dir = %override_dir.display(), "Template override directory");

    let service = ScaffoldService::new(
        Box::new(LayeredStore::with_override(override_dir)),
        Box::new(SimpleRenderer::new()),
        Box::new(LocalFilesystem::new()),
    );

    // A --layout flag is relative to the CWD; a configured one to the root.
    let layout_file: Option<PathBuf> = args.layout.clone().or_else(|| config.layout_file(root));
    match layout_file {
        Some(path) => {
            info!(layout = %path.display(), "Using custom artifact layout");
            Ok(service.with_layout(load_layout(&path)?)?)
        }
        None => Ok(service),
    }
}

// ── Summary ───────────────────────────────────────────────────────────────────

fn print_summary(
    request: &ScaffoldRequest,
    report: &ScaffoldReport,
    out: &OutputManager,
) -> CliResult<()> {
    let scope = match &request.module {
        Some(m) => format!("{} (module {m})", request.entity),
        None => request.entity.to_string(),
    };

    if report.is_noop() {
        out.info(&format!("{scope} is already fully scaffolded; nothing to do."))?;
    } else {
        out.success(&format!("Scaffolded {scope}"))?;
    }

    out.header("Files")?;
    for artifact in &report.artifacts {
        let line = match &artifact.status {
            ArtifactStatus::Created => format!("created  {}", artifact.path.display()),
            ArtifactStatus::Exists(found) => format!("exists   {}", found.display()),
        };
        out.detail(&line)?;
    }
    for (dir, created) in &report.directories {
        if *created {
            out.detail(&format!("created  {}/", dir.display()))?;
        }
    }

    out.header("Registrations")?;
    for reg in &report.registrations {
        out.detail(&format!(
            "{:<12} {:<13} {}",
            reg.step.as_str(),
            reg.outcome.label(),
            reg.host.display()
        ))?;
    }

    out.print("")?;
    out.print(&format!(
        "Artifacts: {} created, {} already present",
        report.created(),
        report.existing()
    ))?;
    out.print(&format!(
        "Registrations: {} applied, {} skipped, {} degraded, {} unplaced, {} host missing",
        report.count("applied"),
        report.count("skipped"),
        report.count("degraded"),
        report.count("unplaced"),
        report.count("host-missing"),
    ))?;

    for reg in report.attention() {
        out.warning(&format!(
            "{}: {} in {} needs manual attention ({})",
            reg.step,
            reg.token,
            reg.host.display(),
            reg.outcome
        ))?;
    }
    Ok(())
}

fn summary_json(request: &ScaffoldRequest, report: &ScaffoldReport) -> serde_json::Value {
    let artifacts: Vec<_> = report
        .artifacts
        .iter()
        .map(|a| {
            let (status, path) = match &a.status {
                ArtifactStatus::Created => ("created", &a.path),
                ArtifactStatus::Exists(found) => ("exists", found),
            };
            json!({ "kind": a.kind.label(), "path": path, "status": status })
        })
        .collect();

    let registrations: Vec<_> = report
        .registrations
        .iter()
        .map(|r| {
            json!({
                "step": r.step.as_str(),
                "host": r.host,
                "token": r.token,
                "outcome": r.outcome.label(),
            })
        })
        .collect();

    json!({
        "entity": request.entity.as_str(),
        "module": request.module.as_ref().map(ModuleName::as_str),
        "routes": request.route_style.file_stem(),
        "created": report.created(),
        "existing": report.existing(),
        "artifacts": artifacts,
        "registrations": registrations,
    })
}
