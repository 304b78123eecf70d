use std::path::PathBuf;

use clap::Args;

use crate::cli::{load_viewconf, OutputFormat};
use crate::config::Settings;
use crate::engine::session::SessionEngine;
use crate::navigation::{NavigationCommand, NavigationOutcome};
use crate::parsing::chrom_sizes::RemoteChromosomeSource;

#[derive(Args)]
pub struct NavigateArgs {
    /// Region expression, e.g. chr2:1000-chr2:2000
    #[arg(required = true, allow_hyphen_values = true)]
    pub region: String,

    /// Chrom sizes URL or path (defaults to the configured assembly)
    #[arg(long)]
    pub chrom_sizes: Option<String>,

    /// Base view configuration (defaults to the embedded one)
    #[arg(long)]
    pub viewconf: Option<PathBuf>,
}

pub fn run(args: NavigateArgs, settings: &Settings, format: OutputFormat) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let command = rt.block_on(navigate(&args, settings))?;

    match format {
        OutputFormat::Text => print_text_command(&args.region, &command),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&command)?),
        OutputFormat::Tsv => print_tsv_command(&command),
    }

    Ok(())
}

async fn navigate(args: &NavigateArgs, settings: &Settings) -> anyhow::Result<NavigationCommand> {
    let engine = SessionEngine::new(load_viewconf(args.viewconf.as_deref())?);
    let mut controller = settings.navigation_controller()?;
    let source = RemoteChromosomeSource::default();
    let chrom_sizes = args
        .chrom_sizes
        .as_deref()
        .unwrap_or(&settings.assembly_chrom_sizes_url);

    match controller
        .navigate_with_source(Some(&engine), &args.region, &source, chrom_sizes)
        .await?
    {
        NavigationOutcome::Issued(command) => Ok(command),
        NavigationOutcome::Failed(failure) => Err(failure.into()),
        NavigationOutcome::EngineUnavailable => anyhow::bail!("Visualization engine unavailable"),
    }
}

fn print_text_command(region: &str, command: &NavigationCommand) {
    println!("Navigation to {region}");
    println!("  View: {}", command.view_id);
    println!("  Start: {}", command.start);
    println!("  End: {}", command.end);
    println!(
        "  Reference window: {}-{}",
        command.reference_start, command.reference_end
    );
    println!("  Duration: {}ms", command.duration_ms);
}

fn print_tsv_command(command: &NavigationCommand) {
    println!("view_id\tstart\tend\treference_start\treference_end\tduration_ms");
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        command.view_id,
        command.start,
        command.end,
        command.reference_start,
        command.reference_end,
        command.duration_ms
    );
}
