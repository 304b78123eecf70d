use clap::Parser;
use tracing_subscriber::EnvFilter;

mod catalog;
mod cli;
mod config;
mod core;
mod engine;
mod navigation;
mod parsing;
mod utils;
mod view;
mod web;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("facet_view=debug,info")
    } else {
        EnvFilter::new("facet_view=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let settings = config::Settings::load(cli.config.as_deref())?;

    match cli.command {
        cli::Commands::Region(args) => {
            cli::region::run(&args, cli.format)?;
        }
        cli::Commands::Navigate(args) => {
            cli::navigate::run(args, &settings, cli.format)?;
        }
        cli::Commands::Datasets(args) => {
            cli::datasets::run(&args, &settings, cli.format)?;
        }
        cli::Commands::Compose(args) => {
            cli::compose::run(args, &settings, cli.format, cli.verbose)?;
        }
        cli::Commands::Serve(args) => {
            web::server::run(args, settings)?;
        }
    }

    Ok(())
}
