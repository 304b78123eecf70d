//! Core data types for region navigation.
//!
//! - [`Region`](region::Region): two chromosome/position pairs parsed from user input
//! - [`ChromosomeTable`](chrom::ChromosomeTable): chromosome name to offset lookup
//! - [`TrackId`], [`ViewId`]: identifiers shared with the visualization engine
//!
//! ## Region Syntax
//!
//! Regions are written as `chrA:POS-chrB:POS`, for example `chr2:1000-chr2:2000`.
//! Only UCSC-style names are accepted:
//!
//! | Token | Chromosomes |
//! |-------|-------------|
//! | `chr1` .. `chr22` | Autosomes |
//! | `chrX`, `chrY` | Sex chromosomes |
//! | `chrMT` | Mitochondrion |
//!
//! Names are case-sensitive and must match the chromosome table exactly.

pub mod chrom;
pub mod region;
pub mod types;

pub use types::{AbsoluteCoordinate, TrackId, ViewId};
