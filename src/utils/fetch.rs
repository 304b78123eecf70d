//! Fetching catalogs and chrom sizes files from URLs or local paths.
//!
//! Locations may be:
//!
//! - `https://host/path` or `http://host/path`
//! - `//host/path` (protocol-relative, fetched over https)
//! - `file:///abs/path` or a plain filesystem path

use thiserror::Error;

use crate::utils::validation::MAX_FETCH_SIZE;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{location} exceeds the maximum fetch size of {MAX_FETCH_SIZE} bytes")]
    TooLarge { location: String },
}

/// Resolved form of a location string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Remote(String),
    Local(String),
}

impl Location {
    #[must_use]
    pub fn parse(location: &str) -> Self {
        if location.starts_with("https://") || location.starts_with("http://") {
            Self::Remote(location.to_string())
        } else if let Some(rest) = location.strip_prefix("//") {
            Self::Remote(format!("https://{rest}"))
        } else if let Some(path) = location.strip_prefix("file://") {
            Self::Local(path.to_string())
        } else {
            Self::Local(location.to_string())
        }
    }
}

/// Fetch the full contents of a location.
///
/// # Errors
///
/// Returns `FetchError::Http` or `FetchError::Status` for failed requests,
/// `FetchError::Io` for unreadable files, and `FetchError::TooLarge` if the
/// body exceeds `MAX_FETCH_SIZE`.
pub async fn fetch_bytes(client: &reqwest::Client, location: &str) -> Result<Vec<u8>, FetchError> {
    match Location::parse(location) {
        Location::Remote(url) => {
            tracing::debug!("Fetching {}", url);
            let response = client.get(&url).send().await.map_err(|source| FetchError::Http {
                url: url.clone(),
                source,
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    url,
                    status: status.as_u16(),
                });
            }

            if response
                .content_length()
                .is_some_and(|len| len > MAX_FETCH_SIZE as u64)
            {
                return Err(FetchError::TooLarge { location: url });
            }

            let body = response
                .bytes()
                .await
                .map_err(|source| FetchError::Http {
                    url: url.clone(),
                    source,
                })?;
            if body.len() > MAX_FETCH_SIZE {
                return Err(FetchError::TooLarge { location: url });
            }
            Ok(body.to_vec())
        }
        Location::Local(path) => {
            tracing::debug!("Reading {}", path);
            let metadata = tokio::fs::metadata(&path)
                .await
                .map_err(|source| FetchError::Io {
                    path: path.clone(),
                    source,
                })?;
            if metadata.len() > MAX_FETCH_SIZE as u64 {
                return Err(FetchError::TooLarge { location: path });
            }
            tokio::fs::read(&path)
                .await
                .map_err(|source| FetchError::Io { path, source })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_location_parse() {
        assert_eq!(
            Location::parse("https://example.org/files.json"),
            Location::Remote("https://example.org/files.json".to_string())
        );
        assert_eq!(
            Location::parse("//s3.amazonaws.com/pkerp/data/hg19/chromSizes.tsv"),
            Location::Remote("https://s3.amazonaws.com/pkerp/data/hg19/chromSizes.tsv".to_string())
        );
        assert_eq!(
            Location::parse("file:///tmp/sizes.tsv"),
            Location::Local("/tmp/sizes.tsv".to_string())
        );
        assert_eq!(
            Location::parse("data/sizes.tsv"),
            Location::Local("data/sizes.tsv".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetch_local_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"chr1\t100\n").unwrap();

        let client = reqwest::Client::new();
        let bytes = fetch_bytes(&client, file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(bytes, b"chr1\t100\n");
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let client = reqwest::Client::new();
        let result = fetch_bytes(&client, "/nonexistent/facet-view/sizes.tsv").await;
        assert!(matches!(result, Err(FetchError::Io { .. })));
    }
}
