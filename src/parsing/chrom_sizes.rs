//! Parser and loaders for chrom sizes files.
//!
//! Format: `name\tlength[\t...]`, one chromosome per line, in the order the
//! chromosomes are laid out in the linear genome. Blank lines and `#` comments
//! are skipped; columns after the length are ignored.

use std::io::Read;

use flate2::read::GzDecoder;
use thiserror::Error;

use crate::core::chrom::ChromosomeTable;
use crate::utils::fetch::{fetch_bytes, FetchError};
use crate::utils::validation::check_chromosome_limit;

#[derive(Error, Debug)]
pub enum ChromSizesError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to decompress chrom sizes: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid chrom sizes: {0}")]
    InvalidFormat(String),

    #[error("Too many chromosomes (>{0})")]
    TooManyChromosomes(usize),

    #[error("No chromosomes found in chrom sizes")]
    Empty,
}

/// Supplier of chromosome tables keyed by assembly location
#[allow(async_fn_in_trait)]
pub trait ChromosomeSource {
    /// Load the table for the assembly at `assembly_url`.
    async fn load(&self, assembly_url: &str) -> Result<ChromosomeTable, ChromSizesError>;
}

/// Loads chrom sizes over HTTP(S) or from the local filesystem
#[derive(Debug, Clone, Default)]
pub struct RemoteChromosomeSource {
    client: reqwest::Client,
}

impl RemoteChromosomeSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ChromosomeSource for RemoteChromosomeSource {
    async fn load(&self, assembly_url: &str) -> Result<ChromosomeTable, ChromSizesError> {
        let bytes = fetch_bytes(&self.client, assembly_url).await?;
        let table = parse_chrom_sizes_bytes(&bytes)?;
        tracing::debug!(
            "Loaded {} chromosomes ({} bp) from {}",
            table.len(),
            table.total_length(),
            assembly_url
        );
        Ok(table)
    }
}

/// A preloaded table serves every assembly request
impl ChromosomeSource for ChromosomeTable {
    async fn load(&self, _assembly_url: &str) -> Result<ChromosomeTable, ChromSizesError> {
        Ok(self.clone())
    }
}

/// Parse chrom sizes from raw bytes, decompressing gzip input.
///
/// # Errors
///
/// Returns `ChromSizesError::Io` if gzip decoding fails or the content is not
/// UTF-8, plus any error from [`parse_chrom_sizes_text`].
pub fn parse_chrom_sizes_bytes(bytes: &[u8]) -> Result<ChromosomeTable, ChromSizesError> {
    // Gzip magic number
    let text = if bytes.starts_with(&[0x1f, 0x8b]) {
        let mut decoded = String::new();
        GzDecoder::new(bytes).read_to_string(&mut decoded)?;
        decoded
    } else {
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.utf8_error())
        })?
    };

    parse_chrom_sizes_text(&text)
}

/// Parse chrom sizes text into a table with cumulative offsets.
///
/// # Errors
///
/// Returns `ChromSizesError::InvalidFormat` for lines with fewer than 2 fields
/// or a non-numeric length, `ChromSizesError::TooManyChromosomes` if the limit
/// is exceeded, or `ChromSizesError::Empty` if no chromosomes are found.
pub fn parse_chrom_sizes_text(text: &str) -> Result<ChromosomeTable, ChromSizesError> {
    let mut table = ChromosomeTable::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 2 {
            return Err(ChromSizesError::InvalidFormat(format!(
                "Line {line_num} has fewer than 2 fields"
            )));
        }

        // Check chromosome limit for DOS protection
        if check_chromosome_limit(table.len()).is_some() {
            return Err(ChromSizesError::TooManyChromosomes(table.len()));
        }

        let name = fields[0].trim();
        let length: u64 = fields[1].trim().parse().map_err(|_| {
            ChromSizesError::InvalidFormat(format!(
                "Invalid length on line {}: '{}'",
                line_num, fields[1]
            ))
        })?;

        table.push(name, length);
    }

    if table.is_empty() {
        return Err(ChromSizesError::Empty);
    }

    Ok(table)
}
