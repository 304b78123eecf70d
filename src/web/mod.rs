//! Web server exposing the composed view over a JSON API.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! facet-view serve
//!
//! # Custom port and auto-open browser
//! facet-view serve --port 3000 --open
//!
//! # Bind to all interfaces
//! facet-view serve --address 0.0.0.0
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /api/datasets` - Catalog status and selectable datasets
//! - `POST /api/selection` - Rebuild the view from `{"labels": [...]}`
//! - `POST /api/navigate` - Zoom to `{"region": "chr1:100-chr2:200"}`
//! - `GET /api/viewconf` - The live view configuration
//! - `GET /api/export` - SVG snapshot of the view

pub mod server;
