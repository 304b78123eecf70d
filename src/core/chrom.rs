use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::core::types::AbsoluteCoordinate;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    #[error("Unknown chromosome: {0}")]
    UnknownChromosome(String),

    #[error("Position {pos} on {chrom} exceeds the absolute coordinate range")]
    Overflow { chrom: String, pos: u64 },
}

/// Placement of one chromosome in the linear genome space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChromosomeEntry {
    /// Sum of the lengths of all chromosomes loaded before this one
    pub offset: u64,
    pub length: u64,
}

/// Chromosome name to offset lookup used to translate loci into absolute coordinates.
///
/// Offsets are cumulative in load order, so the table built from a chrom sizes
/// file lays chromosomes end to end in the order the file lists them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChromosomeTable {
    /// Chromosome names in load order
    order: Vec<String>,

    /// Index: name -> placement
    entries: HashMap<String, ChromosomeEntry>,

    total_length: u64,
}

impl ChromosomeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, length)` pairs in genome order
    pub fn from_sizes<I, S>(sizes: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, length) in sizes {
            table.push(name, length);
        }
        table
    }

    /// Append a chromosome after the ones already loaded.
    ///
    /// Returns `false` and leaves the table unchanged if the name is already present.
    pub fn push(&mut self, name: impl Into<String>, length: u64) -> bool {
        let name = name.into();
        if self.entries.contains_key(&name) {
            tracing::debug!("Ignoring duplicate chromosome '{}'", name);
            return false;
        }

        let entry = ChromosomeEntry {
            offset: self.total_length,
            length,
        };
        self.total_length = self.total_length.saturating_add(length);
        self.entries.insert(name.clone(), entry);
        self.order.push(name);
        true
    }

    pub fn get(&self, name: &str) -> Option<&ChromosomeEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Translate a locus into an absolute coordinate: the chromosome's offset plus `pos`.
    ///
    /// Positions are not checked against the chromosome length.
    ///
    /// # Errors
    ///
    /// Returns `CoordinateError::UnknownChromosome` if `chrom` is not in the table,
    /// or `CoordinateError::Overflow` if the sum does not fit in `u64`.
    pub fn to_absolute(&self, chrom: &str, pos: u64) -> Result<AbsoluteCoordinate, CoordinateError> {
        let entry = self
            .get(chrom)
            .ok_or_else(|| CoordinateError::UnknownChromosome(chrom.to_string()))?;

        entry
            .offset
            .checked_add(pos)
            .ok_or_else(|| CoordinateError::Overflow {
                chrom: chrom.to_string(),
                pos,
            })
    }

    /// Chromosome names in load order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn total_length(&self) -> u64 {
        self.total_length
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hg19_head() -> ChromosomeTable {
        ChromosomeTable::from_sizes([
            ("chr1", 249_250_621),
            ("chr2", 243_199_373),
            ("chr3", 198_022_430),
        ])
    }

    #[test]
    fn test_offsets_are_cumulative() {
        let table = hg19_head();
        assert_eq!(table.get("chr1").unwrap().offset, 0);
        assert_eq!(table.get("chr2").unwrap().offset, 249_250_621);
        assert_eq!(table.get("chr3").unwrap().offset, 249_250_621 + 243_199_373);
        assert_eq!(
            table.total_length(),
            249_250_621 + 243_199_373 + 198_022_430
        );
    }

    #[test]
    fn test_to_absolute() {
        let table = hg19_head();
        assert_eq!(table.to_absolute("chr1", 0).unwrap(), 0);
        assert_eq!(table.to_absolute("chr1", 1000).unwrap(), 1000);
        assert_eq!(table.to_absolute("chr2", 1000).unwrap(), 249_251_621);
    }

    #[test]
    fn test_to_absolute_strictly_monotonic() {
        let table = hg19_head();
        let positions = [0_u64, 1, 2, 999, 1000, 1_000_000, 300_000_000];
        for chrom in ["chr1", "chr2", "chr3"] {
            let coords: Vec<u64> = positions
                .iter()
                .map(|&p| table.to_absolute(chrom, p).unwrap())
                .collect();
            assert!(coords.windows(2).all(|w| w[0] < w[1]), "{chrom}: {coords:?}");
        }
    }

    #[test]
    fn test_unknown_chromosome() {
        let table = hg19_head();
        for name in ["chrX", "chr4", "Chr1", "1", ""] {
            assert_eq!(
                table.to_absolute(name, 10),
                Err(CoordinateError::UnknownChromosome(name.to_string()))
            );
        }
    }

    #[test]
    fn test_overflow() {
        let table = ChromosomeTable::from_sizes([("chr1", 10_u64), ("chr2", 10)]);
        assert!(matches!(
            table.to_absolute("chr2", u64::MAX),
            Err(CoordinateError::Overflow { .. })
        ));
    }

    #[test]
    fn test_duplicate_ignored() {
        let mut table = hg19_head();
        assert!(!table.push("chr1", 5));
        assert_eq!(table.len(), 3);
        assert_eq!(table.names().collect::<Vec<_>>(), ["chr1", "chr2", "chr3"]);
    }
}
