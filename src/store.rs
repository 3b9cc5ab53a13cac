use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use tokio::fs::File;
use tokio::io::AsyncRead;
use walkdir::WalkDir;

use crate::error::StoreError;
use crate::model::{Credentials, Entry};

/// Capability surface of a connected remote share.
///
/// The search pipeline only ever talks to the store through this trait;
/// adapters own the wire protocol. A session is closed by dropping the
/// adapter.
#[async_trait]
pub trait RemoteStore: Send + Sync + 'static {
    /// Recursively list every entry beneath `path`.
    ///
    /// An `Err` return means the listing could not start at all. `Err`
    /// items inside the stream are walk-step failures; callers skip the
    /// affected branch and keep consuming.
    async fn list_recursive(
        &self,
        path: &str,
    ) -> Result<BoxStream<'static, Result<Entry, StoreError>>, StoreError>;

    /// Open `path` for sequential reading.
    async fn open(&self, path: &str) -> Result<Box<dyn AsyncRead + Send + Unpin>, StoreError>;
}

/// Rewrite a path to the separator the store expects. Must be applied to
/// every path handed to a store call.
pub fn to_store_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Rewrite a path to the presentation separator used in output and logs.
pub fn to_display_path(path: &str) -> String {
    path.replace('/', "\\")
}

/// Adapter over a locally mounted share directory.
///
/// `connect` takes the mount point as the address; credentials are part
/// of the interface but the mount already carries the session, so they
/// go unused here. A protocol adapter would consume them.
#[derive(Debug)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub async fn connect(address: &Path, _credentials: &Credentials) -> Result<Self, StoreError> {
        let meta = tokio::fs::metadata(address)
            .await
            .map_err(|e| StoreError::Connect {
                address: address.display().to_string(),
                reason: e.to_string(),
            })?;
        if !meta.is_dir() {
            return Err(StoreError::Connect {
                address: address.display().to_string(),
                reason: "not a directory".to_string(),
            });
        }
        Ok(Self {
            root: address.to_path_buf(),
        })
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

#[async_trait]
impl RemoteStore for LocalStore {
    async fn list_recursive(
        &self,
        path: &str,
    ) -> Result<BoxStream<'static, Result<Entry, StoreError>>, StoreError> {
        let base = self.resolve(path);
        let root = self.root.clone();
        let requested = path.to_string();

        let entries = tokio::task::spawn_blocking(move || {
            std::fs::metadata(&base).map_err(|e| StoreError::List {
                path: requested.clone(),
                reason: e.to_string(),
            })?;

            let items: Vec<Result<Entry, StoreError>> = WalkDir::new(&base)
                .into_iter()
                .map(|item| match item {
                    Ok(entry) => {
                        let rel = entry.path().strip_prefix(&root).unwrap_or(entry.path());
                        Ok(Entry {
                            path: rel.to_string_lossy().replace('\\', "/"),
                            name: entry.file_name().to_string_lossy().into_owned(),
                            is_dir: entry.file_type().is_dir(),
                        })
                    }
                    Err(e) => Err(StoreError::List {
                        path: requested.clone(),
                        reason: e.to_string(),
                    }),
                })
                .collect();
            Ok(items)
        })
        .await
        .map_err(|e| StoreError::List {
            path: path.to_string(),
            reason: e.to_string(),
        })??;

        Ok(Box::pin(stream::iter(entries)))
    }

    async fn open(&self, path: &str) -> Result<Box<dyn AsyncRead + Send + Unpin>, StoreError> {
        let file = File::open(self.resolve(path))
            .await
            .map_err(|e| StoreError::Open {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Box::new(file))
    }
}
