//! Centralized validation and helper functions.

/// Maximum length of a region expression accepted from user input
pub const MAX_REGION_INPUT_LENGTH: usize = 256;

/// Maximum number of chromosomes loaded from a single chrom sizes file (DOS protection)
pub const MAX_CHROMOSOMES: usize = 100_000;

/// Maximum number of datasets a single selection may add to a view
pub const MAX_SELECTED_DATASETS: usize = 500;

/// Maximum number of datasets read from a catalog
pub const MAX_CATALOG_DATASETS: usize = 100_000;

/// Maximum size of a fetched catalog or chrom sizes file
pub const MAX_FETCH_SIZE: usize = 64 * 1024 * 1024; // 64MB

/// Security-related constants for input validation
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Check if adding another chromosome would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new chromosome.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_chromosome_limit(count: usize) -> Option<String> {
    if count >= MAX_CHROMOSOMES {
        Some(format!(
            "Too many chromosomes: adding another would exceed maximum of {MAX_CHROMOSOMES}"
        ))
    } else {
        None
    }
}

/// Check that a selection is small enough to be turned into tracks.
///
/// Returns an error message if the selection exceeds the limit, None if it fits.
#[must_use]
pub fn check_selection_limit(count: usize) -> Option<String> {
    if count > MAX_SELECTED_DATASETS {
        Some(format!(
            "Too many datasets selected: {count} exceeds maximum of {MAX_SELECTED_DATASETS}"
        ))
    } else {
        None
    }
}

/// Security validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Filename too long: exceeds {MAX_FILENAME_LENGTH} characters")]
    FilenameTooLong,
    #[error("Invalid filename: contains path traversal or invalid characters")]
    InvalidFilename,
    #[error("Empty filename provided")]
    EmptyFilename,
}

/// Validate the file name offered for an exported snapshot or view configuration.
///
/// Rejects empty or over-long names, path separators and traversal, control
/// characters, and names without a `.svg` or `.json` extension. Returns the
/// name with anything outside `[A-Za-z0-9._- ]` removed.
///
/// # Errors
///
/// Returns `ValidationError::EmptyFilename` if the filename is empty,
/// `ValidationError::FilenameTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidFilename` if it contains invalid characters.
pub fn validate_filename(filename: &str) -> Result<String, ValidationError> {
    if filename.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(ValidationError::FilenameTooLong);
    }

    // Prevent directory traversal attacks
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(ValidationError::InvalidFilename);
    }

    if filename.contains('\0') || filename.chars().any(|c| ('\x01'..='\x1F').contains(&c)) {
        return Err(ValidationError::InvalidFilename);
    }

    let sanitized = filename
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '-' || *c == '_' || *c == ' ')
        .collect::<String>();

    if sanitized.trim().is_empty() || sanitized.starts_with('.') {
        return Err(ValidationError::InvalidFilename);
    }

    if !has_known_extension(&sanitized) {
        return Err(ValidationError::InvalidFilename);
    }

    Ok(sanitized)
}

/// Check if filename has an extension we write
fn has_known_extension(filename: &str) -> bool {
    let safe_extensions = [".svg", ".json"];

    safe_extensions
        .iter()
        .any(|ext| filename.to_lowercase().ends_with(ext))
}
