//! Command-line interface for facet-view.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **region**: Validate a region expression and show its parts
//! - **navigate**: Translate a region into a zoom command for the view
//! - **datasets**: List the datasets in the catalog
//! - **compose**: Build a view configuration from selected datasets
//! - **serve**: Start the JSON API
//!
//! ## Usage
//!
//! ```text
//! # Check a region
//! facet-view region chr2:1000-chr2:2000
//!
//! # Zoom command against a local chrom sizes file
//! facet-view navigate chr1:0-chr1:1000 --chrom-sizes hg19.chrom.sizes --format json
//!
//! # Add two datasets to the default view and export a snapshot
//! facet-view compose --select "Sample A" --select "Sample B" --export cohort.svg
//!
//! # Start the API
//! facet-view serve --port 8080 --open
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::view::config::ViewConfig;

pub mod compose;
pub mod datasets;
pub mod navigate;
pub mod region;

#[derive(Parser)]
#[command(name = "facet-view")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Compose multi-track genome views and navigate them by region")]
#[command(
    long_about = "facet-view builds a genome browser view configuration from a catalog of bigWig datasets.\n\nSelected datasets are stacked below the view's reserved tracks, each followed by a spacer, and regions such as chr2:1000-chr2:2000 are translated into absolute coordinates for an animated zoom."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Settings file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a region expression
    Region(region::RegionArgs),

    /// Translate a region into a zoom command
    Navigate(navigate::NavigateArgs),

    /// List datasets in the catalog
    Datasets(datasets::DatasetsArgs),

    /// Build a view configuration from selected datasets
    Compose(compose::ComposeArgs),

    /// Start the web server
    Serve(ServeArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Base view configuration (defaults to the embedded one)
    #[arg(long)]
    pub viewconf: Option<PathBuf>,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load a base view configuration from `path`, or the embedded default
pub(crate) fn load_viewconf(path: Option<&Path>) -> anyhow::Result<ViewConfig> {
    Ok(match path {
        Some(path) => ViewConfig::load_from_file(path)?,
        None => ViewConfig::load_embedded()?,
    })
}
