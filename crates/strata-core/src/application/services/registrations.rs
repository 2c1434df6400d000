//! The fixed registration plan for one entity.
//!
//! Each step is plain data: a host path, a token, a fragment, an anchor and a
//! fallback policy. The engine has no knowledge of what any of them mean.

use std::fmt;
use std::path::PathBuf;

use crate::domain::{
    Anchor, Augmentation, FallbackPolicy, Fragment, MissingHost, ModuleName, ProjectContext,
    ProjectDirs, RouteStyle, TemplateName, UniquenessToken, markers,
};

use super::augmentation_engine::HostAugmentation;

/// Registration steps, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Model,
    Bindings,
    Providers,
    Routes,
    Seeders,
    Policies,
    TestManifest,
}

impl Step {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Bindings => "bindings",
            Self::Providers => "providers",
            Self::Routes => "routes",
            Self::Seeders => "seeders",
            Self::Policies => "policies",
            Self::TestManifest => "test-manifest",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Host(HostAugmentation),
    /// JSON module descriptor, edited structurally.
    Descriptor {
        path: PathBuf,
        module: ModuleName,
        provider: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub step: Step,
    pub target: Target,
}

impl Registration {
    fn host(step: Step, host: HostAugmentation) -> Self {
        Self {
            step,
            target: Target::Host(host),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match &self.target {
            Target::Host(h) => &h.path,
            Target::Descriptor { path, .. } => path,
        }
    }
}

const ROUTE_FACADE: &str = "use Illuminate\\Support\\Facades\\Route;";
const GATE_FACADE: &str = "use Illuminate\\Support\\Facades\\Gate;";
const HAS_FACTORY_IMPORT: &str = "use Illuminate\\Database\\Eloquent\\Factories\\HasFactory;";

/// Build every registration for `ctx`, in run order.
pub fn plan(ctx: &ProjectContext, routes: RouteStyle, relaxed_retry: bool) -> Vec<Registration> {
    let policy = FallbackPolicy::default().relaxed(relaxed_retry);

    let mut out = Vec::new();
    model_wiring(ctx, &policy, &mut out);
    out.push(bindings(ctx, &policy));
    out.push(providers(ctx, &policy));
    out.extend(route_table(ctx, routes, &policy));
    out.push(seeder(ctx, &policy));
    out.extend(policy_registry(ctx, &policy));
    test_manifest(ctx, &policy, &mut out);
    out
}

fn seed(template: &'static str, ctx: &ProjectContext) -> (TemplateName, crate::domain::Bindings) {
    (TemplateName::from_static(template), ctx.bindings())
}

fn model_wiring(ctx: &ProjectContext, policy: &FallbackPolicy, out: &mut Vec<Registration>) {
    let model = ctx.entity().as_str();
    let path = ProjectDirs::join(&ctx.dirs().app, &format!("Models/{model}.php"));
    let manual = policy.clone().manual();

    out.push(Registration::host(
        Step::Model,
        HostAugmentation::new(
            &path,
            Augmentation::new(
                UniquenessToken::new(HAS_FACTORY_IMPORT),
                Fragment::new(HAS_FACTORY_IMPORT),
                Anchor::after_line("namespace ", true),
            )
            .with_policy(manual.clone().with_marker("<?php")),
            MissingHost::Skip,
        ),
    ));
    out.push(Registration::host(
        Step::Model,
        HostAugmentation::new(
            &path,
            Augmentation::new(
                UniquenessToken::new("use HasFactory"),
                Fragment::new("    use HasFactory;"),
                Anchor::class_body_start(model),
            )
            .with_policy(manual.clone()),
            MissingHost::Skip,
        ),
    ));

    if ctx.is_grouped() {
        let factory = ctx.database_class(&format!("Factories\\{model}Factory"));
        out.push(Registration::host(
            Step::Model,
            HostAugmentation::new(
                &path,
                Augmentation::new(
                    UniquenessToken::new("function newFactory("),
                    Fragment::new(format!(
                        "\n    protected static function newFactory()\n    {{\n        return \\{factory}::new();\n    }}"
                    )),
                    Anchor::class_body_end(model),
                )
                .with_policy(manual),
                MissingHost::Skip,
            ),
        ));
    }
}

fn bindings(ctx: &ProjectContext, policy: &FallbackPolicy) -> Registration {
    let model = ctx.entity().as_str();
    let interface = ctx.app_class(&format!("Repositories\\Contracts\\{model}RepositoryInterface"));
    let concrete = ctx.app_class(&format!("Repositories\\{model}Repository"));
    let (template, bindings) = seed("providers/repository-provider", ctx);

    Registration::host(
        Step::Bindings,
        HostAugmentation::new(
            ProjectDirs::join(&ctx.dirs().providers, "RepositoryServiceProvider.php"),
            Augmentation::new(
                UniquenessToken::new(format!("{model}RepositoryInterface::class")),
                Fragment::new(format!(
                    "        $this->app->bind(\n            \\{interface}::class,\n            \\{concrete}::class\n        );"
                )),
                Anchor::method_body_end("function register("),
            )
            .with_policy(policy.clone().with_marker(markers::BINDINGS_MARKER)),
            MissingHost::Seed { template, bindings },
        ),
    )
}

fn providers(ctx: &ProjectContext, policy: &FallbackPolicy) -> Registration {
    let provider = ctx.app_class("Providers\\RepositoryServiceProvider");

    match ctx.module() {
        Some(module) => Registration {
            step: Step::Providers,
            target: Target::Descriptor {
                path: PathBuf::from(ProjectDirs::join(&ctx.dirs().base, "module.json")),
                module: module.clone(),
                provider,
            },
        },
        None => Registration::host(
            Step::Providers,
            HostAugmentation::new(
                "bootstrap/providers.php",
                Augmentation::new(
                    UniquenessToken::new(format!("{provider}::class")),
                    Fragment::new(format!("    {provider}::class,")),
                    Anchor::before_first("];"),
                )
                .with_policy(policy.clone().manual()),
                MissingHost::Skip,
            ),
        ),
    }
}

fn route_table(ctx: &ProjectContext, style: RouteStyle, policy: &FallbackPolicy) -> [Registration; 2] {
    let model = ctx.entity().as_str();
    let name = ctx.entity().kebab_plural();
    let controller = ctx.app_class(&format!("Http\\Controllers\\{model}Controller"));
    let path = ProjectDirs::join(&ctx.dirs().routes, &format!("{}.php", style.file_stem()));

    let import = format!("use {controller};");
    let route = format!(
        "Route::{}('{name}', {model}Controller::class)->names('{name}');",
        style.route_method()
    );
    let (template, mut bindings) = seed("routes/routes", ctx);
    bindings.insert("ROUTE_IMPORT", import.as_str());
    bindings.insert("ROUTE_REGISTRATION", format!("{}\n{route}", markers::AUTO_GEN_TAG));
    let missing = MissingHost::Seed { template, bindings };

    [
        Registration::host(
            Step::Routes,
            HostAugmentation::new(
                &path,
                Augmentation::new(
                    UniquenessToken::new(import.as_str()),
                    Fragment::new(import.as_str()),
                    Anchor::after_line(ROUTE_FACADE, false),
                )
                .with_policy(policy.clone().with_marker("<?php").manual()),
                missing.clone(),
            ),
        ),
        Registration::host(
            Step::Routes,
            HostAugmentation::new(
                &path,
                Augmentation::new(
                    UniquenessToken::new(format!("('{name}', {model}Controller::class)")),
                    Fragment::new(format!("\n{}\n{route}", markers::AUTO_GEN_TAG)),
                    Anchor::EndOfFile,
                )
                .with_policy(policy.clone()),
                missing,
            ),
        ),
    ]
}

fn seeder(ctx: &ProjectContext, policy: &FallbackPolicy) -> Registration {
    let model = ctx.entity().as_str();
    let seeder = ctx.database_class(&format!("Seeders\\{model}Seeder"));
    let registry = match ctx.module() {
        Some(m) => format!("{m}DatabaseSeeder"),
        None => "DatabaseSeeder".to_string(),
    };
    let fragment = format!("        $this->call(\\{seeder}::class); {}", markers::AUTO_GEN_TAG);

    let (template, mut bindings) = seed("database/database-seeder", ctx);
    bindings.insert("seederClass", registry.as_str());
    bindings.insert("SEEDER_CALLS", fragment.as_str());

    Registration::host(
        Step::Seeders,
        HostAugmentation::new(
            ProjectDirs::join(&ctx.dirs().seeders, &format!("{registry}.php")),
            Augmentation::new(
                UniquenessToken::new(format!("{model}Seeder::class")),
                Fragment::new(fragment),
                Anchor::method_body_end("function run("),
            )
            .with_policy(policy.clone()),
            MissingHost::Seed { template, bindings },
        ),
    )
}

fn policy_registry(ctx: &ProjectContext, policy: &FallbackPolicy) -> [Registration; 2] {
    let model = ctx.entity().as_str();
    let model_class = ctx.app_class(&format!("Models\\{model}"));
    let policy_class = ctx.app_class(&format!("Policies\\{model}Policy"));
    let provider = match ctx.module() {
        Some(m) => m.as_str().to_string(),
        None => "App".to_string(),
    };
    let path = ProjectDirs::join(&ctx.dirs().providers, &format!("{provider}ServiceProvider.php"));
    let fragment = format!(
        "        Gate::policy(\\{model_class}::class, \\{policy_class}::class); {}",
        markers::POLICY_MARKER
    );

    let (template, mut bindings) = seed("providers/module-service-provider", ctx);
    bindings.insert("module", provider.as_str());
    bindings.insert("POLICY_REGISTRATION", fragment.as_str());
    let missing = MissingHost::Seed { template, bindings };

    [
        Registration::host(
            Step::Policies,
            HostAugmentation::new(
                &path,
                Augmentation::new(
                    UniquenessToken::new(format!("{model}Policy::class")),
                    Fragment::new(fragment.as_str()),
                    Anchor::method_body_end("function boot("),
                )
                .with_policy(policy.clone().with_marker(markers::POLICY_MARKER)),
                missing.clone(),
            ),
        ),
        Registration::host(
            Step::Policies,
            HostAugmentation::new(
                &path,
                Augmentation::new(
                    UniquenessToken::new(GATE_FACADE),
                    Fragment::new(GATE_FACADE),
                    Anchor::after_line("namespace ", true),
                )
                .with_policy(policy.clone().with_marker("<?php").manual()),
                missing,
            ),
        ),
    ]
}

fn test_manifest(ctx: &ProjectContext, policy: &FallbackPolicy, out: &mut Vec<Registration>) {
    if !ctx.is_grouped() {
        return;
    }
    for suite in ["Unit", "Feature"] {
        let dir = format!("<directory>Modules/*/tests/{suite}</directory>");
        out.push(Registration::host(
            Step::TestManifest,
            HostAugmentation::new(
                "phpunit.xml",
                Augmentation::new(
                    UniquenessToken::new(dir.as_str()),
                    Fragment::new(format!("            {dir}")),
                    Anchor::section_end(format!("<testsuite name=\"{suite}\""), "</testsuite>"),
                )
                .with_policy(policy.clone().manual()),
                MissingHost::Skip,
            ),
        ));
    }
}
