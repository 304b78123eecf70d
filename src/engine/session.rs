use std::sync::{Mutex, MutexGuard, PoisonError};

use svg::node::element::{Group, Rectangle, Text};
use svg::node::Comment;
use svg::Document;

use crate::core::types::{TrackId, ViewId};
use crate::engine::{EngineError, VisualizationEngine};
use crate::navigation::NavigationCommand;
use crate::view::config::{View, ViewConfig};
use crate::view::track::{TrackKind, TrackSequence};

/// Width used for exported views whose tracks declare none
const DEFAULT_EXPORT_WIDTH: u32 = 568;

#[derive(Debug, Clone)]
struct SessionState {
    config: ViewConfig,
    last_command: Option<NavigationCommand>,
    last_resize: Option<(ViewId, TrackId)>,
    presentation_height: u32,
    applied_count: u64,
}

/// Headless engine holding a view configuration in memory.
///
/// It adopts configurations, records zoom commands and resize hints, and
/// exports an outline SVG with one box per stacked track. It renders no data.
#[derive(Debug)]
pub struct SessionEngine {
    state: Mutex<SessionState>,
}

impl SessionEngine {
    pub fn new(config: ViewConfig) -> Self {
        let presentation_height = config.views.first().map_or(0, stacked_height);
        Self {
            state: Mutex::new(SessionState {
                config,
                last_command: None,
                last_resize: None,
                presentation_height,
                applied_count: 0,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the full view configuration
    pub fn config(&self) -> ViewConfig {
        self.state().config.clone()
    }

    pub fn last_command(&self) -> Option<NavigationCommand> {
        self.state().last_command.clone()
    }

    pub fn last_resize(&self) -> Option<(ViewId, TrackId)> {
        self.state().last_resize.clone()
    }

    /// Height of the presentation after the most recent resize
    pub fn presentation_height(&self) -> u32 {
        self.state().presentation_height
    }

    /// Number of configurations adopted so far
    pub fn applied_count(&self) -> u64 {
        self.state().applied_count
    }
}

impl VisualizationEngine for SessionEngine {
    fn current_configuration(&self, view_id: &ViewId) -> Result<TrackSequence, EngineError> {
        self.state()
            .config
            .view(view_id)
            .map(|v| v.tracks.top.clone())
            .ok_or_else(|| EngineError::UnknownView(view_id.clone()))
    }

    async fn apply_configuration(
        &self,
        view_id: &ViewId,
        sequence: TrackSequence,
        animate: bool,
    ) -> Result<(), EngineError> {
        // Adoption completes on a later turn of the event loop
        tokio::task::yield_now().await;

        let mut state = self.state();
        let view = state
            .config
            .view_mut(view_id)
            .ok_or_else(|| EngineError::UnknownView(view_id.clone()))?;
        tracing::debug!(
            "View {} adopted {} tracks (animate: {})",
            view_id,
            sequence.len(),
            animate
        );
        view.tracks.top = sequence;
        state.applied_count += 1;
        Ok(())
    }

    fn resize_for_track(&self, view_id: &ViewId, track_id: &TrackId) {
        let mut state = self.state();
        let Some(view) = state.config.view(view_id) else {
            tracing::warn!("Resize requested for unknown view {}", view_id);
            return;
        };
        if !view.tracks.top.iter().any(|t| &t.id == track_id) {
            tracing::warn!("Resize requested for unknown track {} in view {}", track_id, view_id);
            return;
        }

        let height = stacked_height(view);
        tracing::debug!("Resized view {} around track {} to {}px", view_id, track_id, height);
        state.presentation_height = height;
        state.last_resize = Some((view_id.clone(), track_id.clone()));
    }

    async fn zoom_to(&self, command: &NavigationCommand) -> Result<(), EngineError> {
        let mut state = self.state();
        if state.config.view(&command.view_id).is_none() {
            return Err(EngineError::UnknownView(command.view_id.clone()));
        }
        tracing::info!(
            "Zooming view {} to [{}, {}] over {}ms",
            command.view_id,
            command.start,
            command.end,
            command.duration_ms
        );
        state.last_command = Some(command.clone());
        Ok(())
    }

    fn export_svg(&self) -> Result<String, EngineError> {
        let state = self.state();
        Ok(render_outline(&state.config, state.last_command.as_ref()))
    }
}

fn stacked_height(view: &View) -> u32 {
    view.tracks
        .top
        .iter()
        .map(|t| t.height.unwrap_or_default())
        .sum()
}

fn render_outline(config: &ViewConfig, location: Option<&NavigationCommand>) -> String {
    let width = config
        .views
        .iter()
        .flat_map(|v| v.tracks.top.iter())
        .filter_map(|t| t.width)
        .max()
        .unwrap_or(DEFAULT_EXPORT_WIDTH)
        .max(DEFAULT_EXPORT_WIDTH);
    let height: u32 = config.views.iter().map(stacked_height).sum();

    let mut doc = Document::new()
        .set("viewBox", (0, 0, width, height))
        .set("width", width)
        .set("height", height)
        .add(Comment::new(format!(
            "facet-view export {}",
            chrono::Utc::now().to_rfc3339()
        )));

    let mut y = 0;
    for view in &config.views {
        let mut group = Group::new().set("id", format!("view-{}", view.uid));
        if let Some(cmd) = location.filter(|c| c.view_id == view.uid) {
            group = group
                .set("data-start", cmd.start)
                .set("data-end", cmd.end);
        }

        for track in &view.tracks.top {
            let h = track.height.unwrap_or_default();
            let kind: String = track.kind.clone().into();
            group = group.add(
                Rectangle::new()
                    .set("x", 0)
                    .set("y", y)
                    .set("width", width)
                    .set("height", h)
                    .set("fill", "none")
                    .set("stroke", "#cccccc")
                    .set("data-uid", track.id.as_str())
                    .set("data-type", kind),
            );
            if track.kind == TrackKind::DataTrack {
                if let Some(name) = track.name() {
                    group = group.add(
                        Text::new(name)
                            .set("x", 4)
                            .set("y", y + h.saturating_sub(4))
                            .set("font-family", "Arial")
                            .set("font-size", 10),
                    );
                }
            }
            y += h;
        }
        doc = doc.add(group);
    }

    doc.to_string()
}
