use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "tokenscope")]
#[command(about = "tokenscope — converge GitLab CI/CD job token scopes to configuration")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the YAML configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "TOKENSCOPE_CONFIG",
        default_value = "tokenscope.yml"
    )]
    pub config: PathBuf,

    /// GitLab instance URL (overrides gitlab.url from the config file)
    #[arg(long, global = true, env = "GITLAB_URL")]
    pub gitlab_url: Option<String>,

    /// Access token with api scope (overrides gitlab.token from the config file)
    #[arg(long, global = true, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile job token scopes of configured projects
    Apply(ApplyArgs),
    /// Show the live job token scope of a project
    Show(ShowArgs),
}

#[derive(clap::Args)]
pub struct ApplyArgs {
    /// Only process these projects (keys under projects_and_groups)
    pub projects: Vec<String>,
    /// Read remote state but only log the changes that would be made
    #[arg(long)]
    pub dry_run: bool,
    /// Keep processing other projects after a failure
    #[arg(long)]
    pub continue_on_error: bool,
}

#[derive(clap::Args)]
pub struct ShowArgs {
    /// Project path (e.g. group/project) or numeric id
    pub project: String,
}
