//! # facet-view
//!
//! Track configuration and region navigation for a genome browser view.
//!
//! A view shows a few reserved tracks (chromosome labels, gene annotations)
//! followed by one data track and one spacer per dataset the user selects
//! from a catalog. Users navigate by typing region expressions such as
//! `chr1:1000-chr2:5000`, which are translated into absolute genome
//! coordinates against a table of chromosome sizes.
//!
//! ## Example
//!
//! ```rust
//! use facet_view::core::chrom::ChromosomeTable;
//! use facet_view::core::region::parse_region;
//!
//! let table = ChromosomeTable::from_sizes([("chr1", 1000_u64), ("chr2", 500)]);
//! let region = parse_region("chr1:10-chr2:20").unwrap();
//!
//! assert_eq!(table.to_absolute(&region.start_chrom, region.start_pos).unwrap(), 10);
//! assert_eq!(table.to_absolute(&region.end_chrom, region.end_pos).unwrap(), 1020);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Region parsing and coordinate translation
//! - [`catalog`]: Dataset catalog
//! - [`view`]: View configuration and track composition
//! - [`navigation`]: Region navigation state machine
//! - [`engine`]: Visualization engine seam and a headless implementation
//! - [`parsing`]: Chromosome sizes loading
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: JSON API server

pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod navigation;
pub mod parsing;
pub mod utils;
pub mod view;
pub mod web;

// Re-export commonly used types for convenience
pub use catalog::store::{CatalogState, Dataset, DatasetCatalog};
pub use config::Settings;
pub use core::chrom::ChromosomeTable;
pub use core::region::{parse_region, Region};
pub use core::types::*;
pub use engine::{session::SessionEngine, VisualizationEngine};
pub use navigation::{NavigationCommand, NavigationController, NavigationOutcome};
pub use view::manager::ViewConfigManager;
pub use view::track::{Track, TrackSequence};
