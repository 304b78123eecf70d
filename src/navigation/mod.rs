//! Region navigation: parse a region, translate it, and issue a zoom command.
//!
//! ```text
//! Idle -> Validating -> Failed -> Idle            (region invalid)
//!                    -> Translating -> Issuing -> Idle
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::region::Region;
use crate::core::types::{AbsoluteCoordinate, ViewId};

pub mod controller;

pub use controller::{NavigationController, NavigationError, NavigationOutcome, NavigationState, ValidationFailure};

/// Animation length of a navigation
pub const DEFAULT_ANIMATION_MS: u64 = 2500;

/// Secondary reference range sent with every zoom: `chr1:0-chr1:1000`
#[must_use]
pub fn default_reference_window() -> Region {
    Region::new("chr1", 0, "chr1", 1000)
}

/// A bounded-duration pan/zoom request for one view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationCommand {
    pub view_id: ViewId,
    pub start: AbsoluteCoordinate,
    pub end: AbsoluteCoordinate,
    pub reference_start: AbsoluteCoordinate,
    pub reference_end: AbsoluteCoordinate,
    pub duration_ms: u64,
}

impl NavigationCommand {
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}
