use clap::Args;

use crate::cli::OutputFormat;
use crate::core::region::{parse_region, Region};

#[derive(Args)]
pub struct RegionArgs {
    /// Region expression, e.g. chr2:1000-chr2:2000
    #[arg(required = true, allow_hyphen_values = true)]
    pub region: String,
}

pub fn run(args: &RegionArgs, format: OutputFormat) -> anyhow::Result<()> {
    let region = parse_region(&args.region)?;

    match format {
        OutputFormat::Text => print_text_region(&region),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&region)?),
        OutputFormat::Tsv => {
            println!("start_chrom\tstart_pos\tend_chrom\tend_pos");
            println!(
                "{}\t{}\t{}\t{}",
                region.start_chrom, region.start_pos, region.end_chrom, region.end_pos
            );
        }
    }

    Ok(())
}

fn print_text_region(region: &Region) {
    println!("Region: {region}");
    println!("  Start: {}:{}", region.start_chrom, region.start_pos);
    println!("  End:   {}:{}", region.end_chrom, region.end_pos);
}
