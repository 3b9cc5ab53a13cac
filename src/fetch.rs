use std::path::Path;

use tokio::fs::File;
use tracing::info;

use crate::error::FetchError;
use crate::store::{to_store_path, RemoteStore};

/// Stream one remote file to a local destination, returning the bytes
/// copied.
///
/// The destination is created or truncated. There is no rollback: a
/// failed copy leaves the partial file behind, so callers needing
/// atomicity should write to a temporary name and rename on success.
pub async fn fetch(
    store: &dyn RemoteStore,
    remote: &str,
    dest: &Path,
) -> Result<u64, FetchError> {
    let mut reader = store
        .open(&to_store_path(remote))
        .await
        .map_err(|e| FetchError::OpenFailed {
            path: remote.to_string(),
            source: e,
        })?;

    let mut writer = File::create(dest)
        .await
        .map_err(|e| FetchError::CreateFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;

    let copied = tokio::io::copy(&mut reader, &mut writer)
        .await
        .map_err(|e| FetchError::CopyFailed {
            path: remote.to_string(),
            source: e,
        })?;

    info!("copied {} bytes from {}", copied, remote);
    Ok(copied)
}

/// Final path segment of a remote path, under either separator
/// convention. Used to name the fetched file locally.
pub fn local_name(remote: &str) -> &str {
    remote
        .rsplit(|c| c == '\\' || c == '/')
        .next()
        .unwrap_or(remote)
}
