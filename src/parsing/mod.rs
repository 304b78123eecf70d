//! Parsers for the files the navigation core consumes.
//!
//! - **Chrom sizes files**: `name<TAB>length` per line, in genome order,
//!   optionally gzip-compressed. These build the [`ChromosomeTable`] used to
//!   translate loci into absolute coordinates.
//!
//! ## Example
//!
//! ```rust
//! use facet_view::parsing::chrom_sizes::parse_chrom_sizes_text;
//!
//! let table = parse_chrom_sizes_text("chr1\t249250621\nchr2\t243199373\n").unwrap();
//! assert_eq!(table.to_absolute("chr2", 10).unwrap(), 249_250_631);
//! ```
//!
//! [`ChromosomeTable`]: crate::core::chrom::ChromosomeTable

pub mod chrom_sizes;
