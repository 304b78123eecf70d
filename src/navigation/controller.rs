use std::time::Duration;

use thiserror::Error;

use crate::config::DEFAULT_VIEW_ID;
use crate::core::chrom::{ChromosomeTable, CoordinateError};
use crate::core::region::{parse_region, Region, RegionError};
use crate::core::types::ViewId;
use crate::engine::{EngineError, VisualizationEngine};
use crate::navigation::{default_reference_window, NavigationCommand, DEFAULT_ANIMATION_MS};
use crate::parsing::chrom_sizes::{ChromSizesError, ChromosomeSource};

/// Why a region could not be navigated to; shown to the user as a flag on the input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error(transparent)]
    InvalidFormat(#[from] RegionError),

    #[error(transparent)]
    UnknownChromosome(#[from] CoordinateError),
}

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Failed to load chromosome table: {0}")]
    ChromSizes(#[from] ChromSizesError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationState {
    Idle,
    Validating,
    Failed,
    Translating,
    Issuing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The command was handed to the engine
    Issued(NavigationCommand),
    /// The region was rejected; the error flag is set
    Failed(ValidationFailure),
    /// No engine yet; nothing was validated or issued
    EngineUnavailable,
}

/// Turns region input into zoom commands for one view
#[derive(Debug, Clone)]
pub struct NavigationController {
    view_id: ViewId,
    duration: Duration,
    reference_window: Region,
    state: NavigationState,
    region_error: Option<ValidationFailure>,
}

impl NavigationController {
    pub fn new(view_id: ViewId) -> Self {
        Self {
            view_id,
            duration: Duration::from_millis(DEFAULT_ANIMATION_MS),
            reference_window: default_reference_window(),
            state: NavigationState::Idle,
            region_error: None,
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn with_reference_window(mut self, window: Region) -> Self {
        self.reference_window = window;
        self
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    /// The failure from the last attempt, cleared by the next valid region
    pub fn region_error(&self) -> Option<&ValidationFailure> {
        self.region_error.as_ref()
    }

    pub fn view_id(&self) -> &ViewId {
        &self.view_id
    }

    fn transition(&mut self, next: NavigationState) {
        tracing::trace!("Navigation {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Parse the input; on failure record the flag and settle back to `Idle`
    fn validate(&mut self, input: &str) -> Result<Region, NavigationOutcome> {
        self.transition(NavigationState::Validating);
        match parse_region(input) {
            Ok(region) => {
                self.region_error = None;
                Ok(region)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    fn fail(&mut self, failure: ValidationFailure) -> NavigationOutcome {
        tracing::debug!("Region rejected: {}", failure);
        self.transition(NavigationState::Failed);
        self.region_error = Some(failure.clone());
        self.transition(NavigationState::Idle);
        NavigationOutcome::Failed(failure)
    }

    /// Translate both loci and the reference window into a zoom command.
    ///
    /// # Errors
    ///
    /// Returns `CoordinateError::UnknownChromosome` if any locus names a
    /// chromosome absent from `table`.
    pub fn build_command(
        &self,
        region: &Region,
        table: &ChromosomeTable,
    ) -> Result<NavigationCommand, CoordinateError> {
        let window = &self.reference_window;
        Ok(NavigationCommand {
            view_id: self.view_id.clone(),
            start: table.to_absolute(&region.start_chrom, region.start_pos)?,
            end: table.to_absolute(&region.end_chrom, region.end_pos)?,
            reference_start: table.to_absolute(&window.start_chrom, window.start_pos)?,
            reference_end: table.to_absolute(&window.end_chrom, window.end_pos)?,
            duration_ms: u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX),
        })
    }

    async fn translate_and_issue<E: VisualizationEngine>(
        &mut self,
        engine: &E,
        region: &Region,
        table: &ChromosomeTable,
    ) -> Result<NavigationOutcome, EngineError> {
        self.transition(NavigationState::Translating);
        let command = match self.build_command(region, table) {
            Ok(command) => command,
            Err(e) => return Ok(self.fail(e.into())),
        };

        self.transition(NavigationState::Issuing);
        let result = engine.zoom_to(&command).await;
        self.transition(NavigationState::Idle);
        result?;

        Ok(NavigationOutcome::Issued(command))
    }

    /// Navigate to `input` using an already loaded chromosome table.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` only if the engine refuses the command; invalid
    /// regions are reported as `NavigationOutcome::Failed`.
    pub async fn navigate<E: VisualizationEngine>(
        &mut self,
        engine: Option<&E>,
        input: &str,
        table: &ChromosomeTable,
    ) -> Result<NavigationOutcome, EngineError> {
        let Some(engine) = engine else {
            tracing::warn!("Visualization engine not found; ignoring navigation to '{}'", input);
            return Ok(NavigationOutcome::EngineUnavailable);
        };

        let region = match self.validate(input) {
            Ok(region) => region,
            Err(outcome) => return Ok(outcome),
        };

        self.translate_and_issue(engine, &region, table).await
    }

    /// Navigate to `input`, loading the chromosome table for `assembly_url` first.
    ///
    /// The table is loaded only after the region validates.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::ChromSizes` if the table cannot be loaded and
    /// `NavigationError::Engine` if the engine refuses the command.
    pub async fn navigate_with_source<E: VisualizationEngine, S: ChromosomeSource>(
        &mut self,
        engine: Option<&E>,
        input: &str,
        source: &S,
        assembly_url: &str,
    ) -> Result<NavigationOutcome, NavigationError> {
        let Some(engine) = engine else {
            tracing::warn!("Visualization engine not found; ignoring navigation to '{}'", input);
            return Ok(NavigationOutcome::EngineUnavailable);
        };

        let region = match self.validate(input) {
            Ok(region) => region,
            Err(outcome) => return Ok(outcome),
        };

        let table = match source.load(assembly_url).await {
            Ok(table) => table,
            Err(e) => {
                self.transition(NavigationState::Idle);
                return Err(e.into());
            }
        };

        Ok(self.translate_and_issue(engine, &region, &table).await?)
    }
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new(ViewId::new(DEFAULT_VIEW_ID))
    }
}
