use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by a remote store adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connect failed: {address} - {reason}")]
    Connect { address: String, reason: String },

    #[error("list failed: {path} - {reason}")]
    List { path: String, reason: String },

    #[error("open failed: {path} - {reason}")]
    Open { path: String, reason: String },
}

/// Failures while scanning one candidate file. Both are non-fatal to the
/// overall search; the coordinator records the file as a non-match.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to open {path}: {source}")]
    OpenFailed { path: String, source: StoreError },

    #[error("failed to read {path}: {source}")]
    ReadFailed { path: String, source: std::io::Error },
}

/// Failures while copying a remote file to local storage.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to open remote {path}: {source}")]
    OpenFailed { path: String, source: StoreError },

    #[error("failed to create local {}: {source}", .path.display())]
    CreateFailed { path: PathBuf, source: std::io::Error },

    #[error("copy failed for {path}: {source}")]
    CopyFailed { path: String, source: std::io::Error },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Invalid(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
