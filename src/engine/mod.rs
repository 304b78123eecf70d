//! Interface to the visualization engine.
//!
//! The engine owns rendering and the live view configuration. Core operations
//! receive it explicitly as `Option<&E>`; `None` models an engine that has not
//! finished initializing, which callers treat as a logged no-op.
//!
//! [`SessionEngine`](session::SessionEngine) is the headless, in-process
//! implementation used by the command line and the HTTP API.

use thiserror::Error;

use crate::core::types::{TrackId, ViewId};
use crate::navigation::NavigationCommand;
use crate::view::track::TrackSequence;

pub mod session;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Visualization engine is not available")]
    Unavailable,

    #[error("Unknown view: {0}")]
    UnknownView(ViewId),

    #[error("Engine rejected the request: {0}")]
    Rejected(String),
}

/// Operations the core needs from a visualization engine
#[allow(async_fn_in_trait)]
pub trait VisualizationEngine {
    /// The live top track list of a view
    fn current_configuration(&self, view_id: &ViewId) -> Result<TrackSequence, EngineError>;

    /// Replace a view's top track list; resolves once the engine has adopted it.
    async fn apply_configuration(
        &self,
        view_id: &ViewId,
        sequence: TrackSequence,
        animate: bool,
    ) -> Result<(), EngineError>;

    /// Resize the presentation around the given track
    fn resize_for_track(&self, view_id: &ViewId, track_id: &TrackId);

    /// Animated pan/zoom; resolves when the engine has accepted the command.
    async fn zoom_to(&self, command: &NavigationCommand) -> Result<(), EngineError>;

    /// Serialized SVG snapshot of the current view
    fn export_svg(&self) -> Result<String, EngineError>;
}

/// Export the current view as SVG.
///
/// Returns `Ok(None)` without error when no engine is available.
///
/// # Errors
///
/// Returns whatever error the engine reports while exporting.
pub fn export_snapshot<E: VisualizationEngine>(engine: Option<&E>) -> Result<Option<String>, EngineError> {
    let Some(engine) = engine else {
        tracing::warn!("Visualization engine not found; skipping export");
        return Ok(None);
    };
    engine.export_svg().map(Some)
}
