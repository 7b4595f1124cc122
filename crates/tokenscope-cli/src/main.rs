mod cli;
mod commands;
mod config;
mod observability;
mod output;
#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::Parser;
use tokenscope_core::{DryRun, GitLabApi};
use tokenscope_gitlab::GitLabClient;

use cli::{Cli, Commands};
use output::print_error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    observability::init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let format = cli.format.unwrap_or_default();

    match &cli.command {
        Commands::Apply(args) => {
            let cfg = config::load(&cli.config)?;
            let client = make_client(&cli, &cfg.gitlab, args.dry_run)?;
            commands::apply::apply(client.as_ref(), &cfg, args, format).await?;
        }
        Commands::Show(args) => {
            let cfg = config::load_or_default(&cli.config)?;
            let client = make_client(&cli, &cfg.gitlab, false)?;
            commands::show::show(client.as_ref(), &args.project, format).await?;
        }
    }

    Ok(())
}

fn make_client(
    cli: &Cli,
    section: &config::GitLabSection,
    dry_run: bool,
) -> Result<Box<dyn GitLabApi>> {
    let connection = config::resolve_connection(&cli.gitlab_url, &cli.token, section)?;
    let client = GitLabClient::new(connection)?;
    if dry_run {
        Ok(Box::new(DryRun::new(client)))
    } else {
        Ok(Box::new(client))
    }
}
