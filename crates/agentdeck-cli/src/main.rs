mod cli;
mod commands;
mod completions;
mod error;
mod output;
mod setup;

use agentdeck_core::LoadOutcome;
use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        completions::write_completions(shell, &mut std::io::stdout());
        return;
    }

    if let Err(err) = run(cli).await {
        error::handle_error(err);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let _guard = setup::init_logging(cli.verbose)?;
    let config = setup::resolve_config(&cli);
    let core = setup::prepare_core(config).await?;

    if !cli.format.is_json() {
        match core.load_outcome {
            LoadOutcome::Cached(count) => eprintln!(
                "{} backend unavailable, showing {} cached resource(s)",
                "Warning:".yellow().bold(),
                count
            ),
            LoadOutcome::Empty => eprintln!(
                "{} backend unavailable, no resources loaded",
                "Warning:".yellow().bold()
            ),
            LoadOutcome::Fresh(_) => {}
        }
    }

    commands::resource::run(&core, cli.command, cli.format).await
}
