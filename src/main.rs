use clap::Parser;
use tracing_subscriber::EnvFilter;

use deck_solver::cli;
use deck_solver::web;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("deck_solver=debug,info")
    } else {
        EnvFilter::new("deck_solver=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Match(args) => {
            cli::solve::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Cards(args) => {
            cli::cards::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Serve(args) => {
            web::server::run(args)?;
        }
    }

    Ok(())
}
