use std::path::{Path, PathBuf};

use clap::Args;

use crate::catalog::store::DatasetCatalog;
use crate::cli::{load_viewconf, OutputFormat};
use crate::config::Settings;
use crate::engine::export_snapshot;
use crate::engine::session::SessionEngine;
use crate::navigation::NavigationOutcome;
use crate::parsing::chrom_sizes::RemoteChromosomeSource;
use crate::utils::validation::validate_filename;
use crate::view::ids::UuidGenerator;
use crate::view::manager::{SelectionOutcome, ViewConfigManager};

#[derive(Args)]
pub struct ComposeArgs {
    /// Dataset label to add, in stacking order (repeatable)
    #[arg(short, long = "select")]
    pub select: Vec<String>,

    /// Catalog URL or path (defaults to the configured catalog)
    #[arg(long)]
    pub catalog: Option<String>,

    /// Base view configuration (defaults to the embedded one)
    #[arg(long)]
    pub viewconf: Option<PathBuf>,

    /// Region to navigate to after composing
    #[arg(short, long, allow_hyphen_values = true)]
    pub region: Option<String>,

    /// Chrom sizes URL or path used with --region
    #[arg(long)]
    pub chrom_sizes: Option<String>,

    /// Write the view configuration here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write an SVG snapshot of the composed view
    #[arg(long)]
    pub export: Option<PathBuf>,
}

pub fn run(
    args: ComposeArgs,
    settings: &Settings,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let engine = rt.block_on(compose(&args, settings, verbose))?;

    let config = engine.config();
    let json = config.to_json()?;
    match &args.output {
        Some(path) => {
            std::fs::write(checked_path(path)?, &json)?;
            if verbose {
                eprintln!("Wrote view configuration to {}", path.display());
            }
        }
        None => match format {
            OutputFormat::Json | OutputFormat::Text => println!("{json}"),
            OutputFormat::Tsv => {
                println!("view_id\tindex\tuid\ttype\tname\tsource_url");
                for view in &config.views {
                    for (i, track) in view.tracks.top.iter().enumerate() {
                        let kind: String = track.kind.clone().into();
                        println!(
                            "{}\t{}\t{}\t{}\t{}\t{}",
                            view.uid,
                            i,
                            track.id,
                            kind,
                            track.name().unwrap_or(""),
                            track.source_url().unwrap_or("")
                        );
                    }
                }
            }
        },
    }

    if let Some(path) = &args.export {
        if let Some(svg) = export_snapshot(Some(&engine))? {
            std::fs::write(checked_path(path)?, svg)?;
            if verbose {
                eprintln!("Exported snapshot to {}", path.display());
            }
        }
    }

    Ok(())
}

async fn compose(args: &ComposeArgs, settings: &Settings, verbose: bool) -> anyhow::Result<SessionEngine> {
    let engine = SessionEngine::new(load_viewconf(args.viewconf.as_deref())?);

    let catalog = if args.select.is_empty() {
        DatasetCatalog::new()
    } else {
        let location = args.catalog.as_deref().unwrap_or(&settings.catalog_url);
        let client = reqwest::Client::new();
        DatasetCatalog::load(&client, location).await?
    };
    // An empty selection still trims the view back to its fixed prefix
    let selected = catalog.select(args.select.as_slice())?;

    let manager = ViewConfigManager::new(
        settings.view_id(),
        settings.fixed_prefix_count,
        settings.track_chrom_sizes_url.clone(),
        UuidGenerator,
    );
    let outcome = manager.apply_selection(Some(&engine), &selected).await?;
    if verbose {
        if let SelectionOutcome::Applied { tracks, .. } = outcome {
            eprintln!("Applied {} datasets ({tracks} tracks)", selected.len());
        }
    }

    if let Some(region) = &args.region {
        let mut controller = settings.navigation_controller()?;
        let source = RemoteChromosomeSource::default();
        let chrom_sizes = args
            .chrom_sizes
            .as_deref()
            .unwrap_or(&settings.assembly_chrom_sizes_url);

        match controller
            .navigate_with_source(Some(&engine), region, &source, chrom_sizes)
            .await?
        {
            NavigationOutcome::Issued(command) => {
                if verbose {
                    eprintln!("Zoomed to [{}, {}]", command.start, command.end);
                }
            }
            NavigationOutcome::Failed(failure) => return Err(failure.into()),
            NavigationOutcome::EngineUnavailable => {
                anyhow::bail!("Visualization engine unavailable")
            }
        }
    }

    Ok(engine)
}

/// Validate the file name component of an output path
fn checked_path(path: &Path) -> anyhow::Result<PathBuf> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Output path has no file name: {}", path.display()))?;
    let sanitized = validate_filename(name)?;
    Ok(path.with_file_name(sanitized))
}
