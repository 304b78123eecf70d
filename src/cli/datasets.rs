use clap::Args;

use crate::catalog::store::DatasetCatalog;
use crate::cli::OutputFormat;
use crate::config::Settings;

#[derive(Args)]
pub struct DatasetsArgs {
    /// Catalog URL or path (defaults to the configured catalog)
    #[arg(long)]
    pub catalog: Option<String>,
}

pub fn run(args: &DatasetsArgs, settings: &Settings, format: OutputFormat) -> anyhow::Result<()> {
    let location = args.catalog.as_deref().unwrap_or(&settings.catalog_url);
    let rt = tokio::runtime::Runtime::new()?;
    let client = reqwest::Client::new();
    let catalog = rt.block_on(DatasetCatalog::load(&client, location))?;

    match format {
        OutputFormat::Text => {
            println!("Datasets ({}):", catalog.len());
            for dataset in &catalog.datasets {
                println!("  {}", dataset.label);
                println!("    {}", dataset.source_url);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "count": catalog.len(),
                "datasets": catalog.datasets,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("label\tsource_url");
            for dataset in &catalog.datasets {
                println!("{}\t{}", dataset.label, dataset.source_url);
            }
        }
    }

    Ok(())
}
