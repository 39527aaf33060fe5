//! Error taxonomy for a region snapshot run.
//!
//! None of these are recovered locally. The first one raised aborts the run
//! and no snapshot file is produced.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = core::result::Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure or a non-success HTTP status from the upstream API.
    #[error("transport error on page {page}: {source}")]
    Transport {
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    /// The body was not JSON or did not carry `response.body.items` / `totalCount`.
    #[error("parse error on page {page}: {reason}")]
    Parse { page: u32, reason: String },

    /// Creating the output directory or writing the snapshot failed.
    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl FetchError {
    pub(crate) fn parse(page: u32, reason: impl Into<String>) -> Self {
        FetchError::Parse {
            page,
            reason: reason.into(),
        }
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FetchError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Short label used in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport { .. } => "transport",
            FetchError::Parse { .. } => "parse",
            FetchError::Filesystem { .. } => "filesystem",
            FetchError::Config(_) => "config",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message_names_page() {
        let err = FetchError::parse(3, "missing `response.body.items`");

        assert_eq!(err.kind(), "parse");
        assert_eq!(
            err.to_string(),
            "parse error on page 3: missing `response.body.items`"
        );
    }

    #[test]
    fn test_filesystem_error_message_names_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = FetchError::filesystem("assets/data", io);

        assert_eq!(err.kind(), "filesystem");
        assert!(err.to_string().contains("assets/data"));
        assert!(err.to_string().contains("denied"));
    }
}
