//! Content ingestion errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while parsing front matter or querying the registry
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Malformed front-matter: {reason}")]
    MalformedFrontMatter { reason: String },

    #[error("Missing required front-matter field: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Duplicate source identifier: {source_id}")]
    DuplicateIdentifier { source_id: String },

    #[error("Document not found: {source_id}")]
    NotFound { source_id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContentError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ContentError::MalformedFrontMatter {
            reason: reason.into(),
        }
    }
}

/// A file that could not be ingested, with the reason
#[derive(Debug)]
pub struct IngestFailure {
    pub path: PathBuf,
    pub error: ContentError,
}

impl std::fmt::Display for IngestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

impl std::error::Error for IngestFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
