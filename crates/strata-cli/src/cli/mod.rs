//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "strata",
    bin_name = "strata",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Layered entity scaffolding for Laravel",
    long_about = "Strata generates the full layer stack for one entity (migration, \
                  model, controller, repository, service, tests) and registers it \
                  in the project's providers, routes and seeders. Every run is \
                  idempotent: existing files are never overwritten and nothing is \
                  registered twice.",
    after_help = "EXAMPLES:\n\
        \x20 strata make --model Invoice\n\
        \x20 strata make --model Invoice --module Billing\n\
        \x20 strata make --model Post --view --root ../blog\n\
        \x20 strata completions bash > /usr/share/bash-completion/completions/strata",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scaffold every layer for one entity.
    #[command(
        visible_alias = "m",
        about = "Scaffold an entity",
        after_help = "EXAMPLES:\n\
            \x20 strata make --model Invoice\n\
            \x20 strata make --model Invoice --module Billing\n\
            \x20 strata make --model Post --view"
    )]
    Make(MakeArgs),

    /// Copy the built-in templates into the override directory.
    #[command(
        about = "Publish templates for customisation",
        after_help = "EXAMPLES:\n\
            \x20 strata publish\n\
            \x20 strata publish --force\n\
            \x20 strata publish --dest resources/stubs"
    )]
    Publish(PublishArgs),

    /// List templates and where each resolves from.
    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 strata list\n\
            \x20 strata list --format json"
    )]
    List(ListArgs),

    /// Initialise a Strata configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 strata init                 # user config location\n\
            \x20 strata init --local         # .strata.toml in CWD\n\
            \x20 strata init --local --layout"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 strata completions bash > ~/.local/share/bash-completion/completions/strata\n\
            \x20 strata completions zsh  > ~/.zfunc/_strata\n\
            \x20 strata completions fish > ~/.config/fish/completions/strata.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the effective configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 strata config get templates.override_dir\n\
            \x20 strata config list\n\
            \x20 strata config path"
    )]
    Config(ConfigCommands),
}

impl Commands {
    /// Project directory the command works on, for commands that take `--root`.
    pub fn project_root(&self) -> Option<&Path> {
        match self {
            Self::Make(args) => Some(&args.root),
            Self::Publish(args) => Some(&args.root),
            Self::List(args) => Some(&args.root),
            Self::Init(_) | Self::Completions(_) | Self::Config(_) => None,
        }
    }
}

// ── make ──────────────────────────────────────────────────────────────────────

/// Arguments for `strata make`.
#[derive(Debug, Args)]
pub struct MakeArgs {
    /// Entity name, normalised to PascalCase (`invoice_item` → `InvoiceItem`).
    #[arg(long = "model", value_name = "NAME", help = "Entity to scaffold")]
    pub model: Option<String>,

    /// Place everything under `Modules/<NAME>` instead of the flat layout.
    #[arg(
        long = "module",
        value_name = "NAME",
        help = "Group the entity inside a module"
    )]
    pub module: Option<String>,

    /// Register a web resource route in `web.php` instead of an API route.
    #[arg(long = "view", help = "Use web routes instead of API routes")]
    pub view: bool,

    /// Project root.
    #[arg(
        long = "root",
        value_name = "DIR",
        default_value = ".",
        help = "Project root directory"
    )]
    pub root: PathBuf,

    /// Artifact layout file replacing the standard layout.
    #[arg(long = "layout", value_name = "FILE", help = "Custom layout file")]
    pub layout: Option<PathBuf>,

    /// Try a loosened anchor before falling back to markers.
    #[arg(long = "relaxed-retry", help = "Retry anchors with loosened matching")]
    pub relaxed_retry: bool,
}

// ── publish ───────────────────────────────────────────────────────────────────

/// Arguments for `strata publish`.
#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Overwrite stubs that were already published.
    #[arg(short = 'f', long = "force", help = "Overwrite existing stubs")]
    pub force: bool,

    /// Destination directory (default: the configured override directory).
    #[arg(long = "dest", value_name = "DIR", help = "Destination directory")]
    pub dest: Option<PathBuf>,

    /// Project root the override directory is resolved against.
    #[arg(
        long = "root",
        value_name = "DIR",
        default_value = ".",
        help = "Project root directory"
    )]
    pub root: PathBuf,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `strata list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,

    /// Project root the override directory is resolved against.
    #[arg(
        long = "root",
        value_name = "DIR",
        default_value = ".",
        help = "Project root directory"
    )]
    pub root: PathBuf,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `strata init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.strata.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Also write the standard artifact layout to `strata.layout.toml`.
    #[arg(long = "layout", help = "Also write the standard layout file")]
    pub layout: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `strata completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `strata config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `augment.relaxed_retry`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the user configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
