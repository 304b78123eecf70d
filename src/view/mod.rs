//! View configuration and track composition.
//!
//! A view's top track list is split in two: a fixed prefix of reserved
//! tracks (chromosome labels, gene annotations) that is never touched, and
//! a variable region rebuilt from the dataset selection. Each selected
//! dataset contributes a data track followed by a spacer:
//!
//! ```text
//! [labels] [genes] [data A] [spacer] [data B] [spacer] ...
//! ```

pub mod config;
pub mod ids;
pub mod manager;
pub mod track;
