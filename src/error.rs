//! Error types for manifest detection
//!
//! Every failure surfaced by the detection core is a [`DetectError`]. A parse,
//! download or unknown-file error is never folded into a failing verdict.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("Unknown requirements file '{file_name}', supported are {supported:?}")]
    UnknownFile {
        file_name: String,
        supported: Vec<&'static str>,
    },

    #[error("The given path {path} is not a file, directory or URL")]
    UnknownPath { path: String },

    #[error("Failed to parse {kind} file '{path}': {source}")]
    FileParse {
        kind: &'static str,
        path: String,
        source: ParseFailure,
    },

    #[error("Unable to download {url} ({status}): {body}")]
    Download {
        url: String,
        status: u16,
        body: String,
    },

    #[error("{url} not found, check full path (404): {body}")]
    DownloadNotFound { url: String, body: String },

    #[error("Unable to download {url}: {source}")]
    DownloadTransport {
        url: String,
        source: Box<ureq::Error>,
    },

    #[error("Unable to download {url} due to rate limit ({status}): {body}")]
    GithubRateLimit {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Failed to store downloaded copy of {url}: {source}")]
    ScratchFile {
        url: String,
        source: std::io::Error,
    },

    #[error("Failed to walk directory {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl DetectError {
    /// Whether the input was not a recognized manifest name, file, directory or URL.
    pub fn is_unknown_file(&self) -> bool {
        matches!(
            self,
            DetectError::UnknownFile { .. } | DetectError::UnknownPath { .. }
        )
    }

    /// Whether this error comes from retrieving a remote manifest.
    ///
    /// [`DetectError::GithubRateLimit`] is part of this family so callers can treat
    /// it as a download failure or single it out for backoff.
    pub fn is_download(&self) -> bool {
        matches!(
            self,
            DetectError::Download { .. }
                | DetectError::DownloadNotFound { .. }
                | DetectError::DownloadTransport { .. }
                | DetectError::GithubRateLimit { .. }
        )
    }
}

/// The underlying reason a manifest could not be parsed.
#[derive(Error, Debug)]
pub enum ParseFailure {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("line {line}: {message}")]
    Ini { line: usize, message: String },

    #[error("{0}")]
    Python(String),

    #[error("{path}: {message}")]
    Requirements { path: PathBuf, message: String },
}
