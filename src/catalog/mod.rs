//! Dataset catalog: the list of tracks a user can add to the view.
//!
//! The catalog is a JSON array published alongside the data files, one entry
//! per bigWig dataset:
//!
//! ```json
//! [
//!   { "s3_url": "https://bucket.s3.amazonaws.com/cohort/sample_a.bw", "label": "Sample A" },
//!   { "s3_url": "https://bucket.s3.amazonaws.com/cohort/sample_b.bw", "label": "Sample B" }
//! ]
//! ```
//!
//! It is fetched once at startup. Until the fetch resolves the catalog is
//! [`CatalogState::Loading`]; a failed fetch leaves it
//! [`CatalogState::Unavailable`] rather than loading forever.
//!
//! ## Example
//!
//! ```rust
//! use facet_view::catalog::store::DatasetCatalog;
//!
//! let json = r#"[{"s3_url": "https://example.org/a.bw", "label": "A"}]"#;
//! let catalog = DatasetCatalog::from_json(json).unwrap();
//!
//! let selection = catalog.select(&["A"]).unwrap();
//! assert_eq!(selection[0].source_url, "https://example.org/a.bw");
//! ```
//!
//! [`CatalogState::Loading`]: store::CatalogState::Loading
//! [`CatalogState::Unavailable`]: store::CatalogState::Unavailable

pub mod store;
