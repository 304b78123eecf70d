//! Shared helpers: input limits, file-name validation and location fetching.

pub mod fetch;
pub mod validation;
