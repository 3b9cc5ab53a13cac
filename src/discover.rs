use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::model::SearchRoot;
use crate::store::{to_display_path, to_store_path, RemoteStore};

/// Walks server roots in parallel and collects candidate files by
/// name suffix.
#[derive(Debug, Clone)]
pub struct DiscoveryEngine {
    suffix: String,
}

impl DiscoveryEngine {
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_lowercase(),
        }
    }

    /// Enumerate every root concurrently and return the converged
    /// candidate list, display-normalized.
    ///
    /// A root that fails to list, or a branch that errors mid-walk, is
    /// logged and skipped; the remaining roots are unaffected. Candidate
    /// order carries no meaning.
    pub async fn discover(
        &self,
        store: Arc<dyn RemoteStore>,
        roots: &[SearchRoot],
    ) -> Vec<String> {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        for root in roots {
            let store = store.clone();
            let tx = tx.clone();
            let suffix = self.suffix.clone();
            let root = root.clone();
            tokio::spawn(async move {
                info!(
                    "discovering files on {} (path: {})",
                    root.server, root.base_path
                );
                let listing = store.list_recursive(&to_store_path(&root.base_path)).await;
                let mut entries = match listing {
                    Ok(entries) => entries,
                    Err(e) => {
                        warn!("failed to list {}: {}", root.server, e);
                        return;
                    }
                };

                let mut found = 0usize;
                while let Some(item) = entries.next().await {
                    match item {
                        Ok(entry) => {
                            if entry.is_dir || !entry.name.to_lowercase().ends_with(&suffix) {
                                continue;
                            }
                            found += 1;
                            if tx.send(to_display_path(&entry.path)).is_err() {
                                return;
                            }
                        }
                        Err(e) => warn!("walk error under {}: {}", root.server, e),
                    }
                }
                info!("finished discovering {} files on {}", found, root.server);
            });
        }
        drop(tx);

        // The collector owns the candidate set; the channel closing once
        // every producer hangs up is the join barrier.
        let mut candidates = Vec::new();
        while let Some(path) = rx.recv().await {
            candidates.push(path);
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Credentials;
    use crate::store::LocalStore;

    async fn store_over(dir: &std::path::Path) -> Arc<dyn RemoteStore> {
        let creds = Credentials {
            username: "u".into(),
            password: "p".into(),
        };
        Arc::new(LocalStore::connect(dir, &creds).await.unwrap())
    }

    fn root(server: &str) -> SearchRoot {
        SearchRoot {
            server: server.to_string(),
            base_path: server.to_string(),
        }
    }

    #[tokio::test]
    async fn suffix_match_is_case_insensitive_and_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("A");
        std::fs::create_dir_all(base.join("app.log")).unwrap();
        std::fs::write(base.join("APP.LOG"), b"x").unwrap();
        std::fs::write(base.join("app.logx"), b"x").unwrap();
        std::fs::write(base.join("app.log").join("inner.log"), b"x").unwrap();

        let store = store_over(dir.path()).await;
        let engine = DiscoveryEngine::new(".log");
        let mut candidates = engine.discover(store, &[root("A")]).await;
        candidates.sort();

        assert_eq!(
            candidates,
            vec![r"A\APP.LOG".to_string(), r"A\app.log\inner.log".to_string()]
        );
    }

    #[tokio::test]
    async fn failed_root_does_not_affect_others() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("A");
        std::fs::create_dir_all(&base).unwrap();
        std::fs::write(base.join("only.log"), b"x").unwrap();

        let store = store_over(dir.path()).await;
        let engine = DiscoveryEngine::new(".log");
        let candidates = engine
            .discover(store, &[root("A"), root("missing")])
            .await;

        assert_eq!(candidates, vec![r"A\only.log".to_string()]);
    }

    #[tokio::test]
    async fn roots_are_walked_in_parallel_and_converged() {
        let dir = tempfile::tempdir().unwrap();
        for server in ["A", "B", "C"] {
            let base = dir.path().join(server);
            std::fs::create_dir_all(&base).unwrap();
            std::fs::write(base.join("one.log"), b"x").unwrap();
            std::fs::write(base.join("two.log"), b"x").unwrap();
        }

        let store = store_over(dir.path()).await;
        let engine = DiscoveryEngine::new(".log");
        let candidates = engine
            .discover(store, &[root("A"), root("B"), root("C")])
            .await;

        assert_eq!(candidates.len(), 6);
    }
}
