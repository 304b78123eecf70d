use thiserror::Error;

use crate::catalog::store::Dataset;
use crate::core::types::{TrackId, ViewId};
use crate::engine::{EngineError, VisualizationEngine};
use crate::utils::validation::check_selection_limit;
use crate::view::ids::IdGenerator;
use crate::view::track::{Track, TrackSequence};

/// Reserved tracks at the top of the default view (chromosome labels, genes)
pub const DEFAULT_FIXED_PREFIX: usize = 2;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("{0}")]
    TooManyDatasets(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result of applying a selection to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    Applied {
        /// Length of the adopted track sequence
        tracks: usize,
        /// Track the presentation was resized around
        resized_around: Option<TrackId>,
    },
    /// No engine yet; nothing was changed
    EngineUnavailable,
}

/// Rebuild a track sequence from a dataset selection.
///
/// Keeps the first `fixed_prefix_count` tracks of `current` verbatim (all of
/// them if there are fewer), drops the rest, then appends one data track and
/// one spacer per selected dataset in selection order. Every appended track
/// gets a fresh identifier from `ids`.
pub fn rebuild<G: IdGenerator>(
    current: &[Track],
    fixed_prefix_count: usize,
    selected: &[&Dataset],
    chrom_sizes_url: &str,
    ids: &G,
) -> TrackSequence {
    let keep = fixed_prefix_count.min(current.len());
    let mut tracks = Vec::with_capacity(keep + 2 * selected.len());
    tracks.extend_from_slice(&current[..keep]);

    for dataset in selected {
        tracks.push(Track::data_track(ids.next_id(), dataset, chrom_sizes_url));
        tracks.push(Track::spacer(ids.next_id()));
    }

    tracks
}

/// Maintains one view's track sequence from the user's dataset selection
#[derive(Debug)]
pub struct ViewConfigManager<G> {
    view_id: ViewId,
    fixed_prefix_count: usize,
    chrom_sizes_url: String,
    ids: G,
}

impl<G: IdGenerator> ViewConfigManager<G> {
    pub fn new(
        view_id: ViewId,
        fixed_prefix_count: usize,
        chrom_sizes_url: impl Into<String>,
        ids: G,
    ) -> Self {
        Self {
            view_id,
            fixed_prefix_count,
            chrom_sizes_url: chrom_sizes_url.into(),
            ids,
        }
    }

    pub fn view_id(&self) -> &ViewId {
        &self.view_id
    }

    pub fn fixed_prefix_count(&self) -> usize {
        self.fixed_prefix_count
    }

    /// Rebuild `current` for `selected` with this manager's prefix and identifiers
    pub fn rebuild(&self, current: &[Track], selected: &[&Dataset]) -> TrackSequence {
        rebuild(
            current,
            self.fixed_prefix_count,
            selected,
            &self.chrom_sizes_url,
            &self.ids,
        )
    }

    /// Rebuild the engine's live sequence for `selected`, apply it, then resize.
    ///
    /// The resize is issued only after the engine has adopted the new
    /// sequence. It targets the first newly added track, or the first track
    /// of the sequence when the selection is empty.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::TooManyDatasets` for oversized selections and
    /// `ViewError::Engine` if the engine fails to supply or adopt the sequence.
    pub async fn apply_selection<E: VisualizationEngine>(
        &self,
        engine: Option<&E>,
        selected: &[&Dataset],
    ) -> Result<SelectionOutcome, ViewError> {
        let Some(engine) = engine else {
            tracing::warn!("Visualization engine not found; selection not applied");
            return Ok(SelectionOutcome::EngineUnavailable);
        };

        if let Some(msg) = check_selection_limit(selected.len()) {
            return Err(ViewError::TooManyDatasets(msg));
        }

        let current = engine.current_configuration(&self.view_id)?;
        let first_new = self.fixed_prefix_count.min(current.len());
        let sequence = self.rebuild(&current, selected);

        let resize_target = sequence
            .get(first_new)
            .or_else(|| sequence.first())
            .map(|t| t.id.clone());
        let tracks = sequence.len();

        tracing::debug!(
            "Applying {} tracks ({} datasets) to view {}",
            tracks,
            selected.len(),
            self.view_id
        );
        engine
            .apply_configuration(&self.view_id, sequence, true)
            .await?;

        if let Some(track_id) = &resize_target {
            engine.resize_for_track(&self.view_id, track_id);
        }

        Ok(SelectionOutcome::Applied {
            tracks,
            resized_around: resize_target,
        })
    }
}
