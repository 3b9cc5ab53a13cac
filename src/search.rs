use std::sync::Arc;

use futures::{stream, StreamExt};
use tokio::time::{timeout, Duration};
use tracing::{info, warn};

use crate::error::ScanError;
use crate::model::SearchOutcome;
use crate::scan::Scanner;
use crate::store::RemoteStore;

/// Fans candidate files out to concurrent scans and converges the
/// results.
pub struct SearchCoordinator {
    scanner: Scanner,
    max_concurrent: usize,
    scan_timeout: Option<Duration>,
}

enum Scanned {
    Hit,
    Miss,
    TimedOut,
    Failed(ScanError),
}

impl SearchCoordinator {
    pub fn new(scanner: Scanner, max_concurrent: usize, scan_timeout: Option<Duration>) -> Self {
        Self {
            scanner,
            max_concurrent: max_concurrent.max(1),
            scan_timeout,
        }
    }

    /// Scan every candidate and report the matching subset.
    ///
    /// Scans complete in arbitrary order. A scan that fails or times out
    /// is logged and counted as a non-match; it never aborts the run.
    /// Returns only once every dispatched scan has finished.
    pub async fn run(
        &self,
        store: Arc<dyn RemoteStore>,
        candidates: Vec<String>,
        needle: &str,
    ) -> SearchOutcome {
        let discovered = candidates.len();

        let mut tasks = stream::iter(candidates.into_iter())
            .map(|path| {
                let store = store.clone();
                let scanner = self.scanner.clone();
                let needle = needle.to_string();
                let limit = self.scan_timeout;
                async move {
                    let scan = scanner.scan(store.as_ref(), &path, &needle);
                    let outcome = match limit {
                        Some(limit) => match timeout(limit, scan).await {
                            Ok(Ok(true)) => Scanned::Hit,
                            Ok(Ok(false)) => Scanned::Miss,
                            Ok(Err(e)) => Scanned::Failed(e),
                            Err(_) => Scanned::TimedOut,
                        },
                        None => match scan.await {
                            Ok(true) => Scanned::Hit,
                            Ok(false) => Scanned::Miss,
                            Err(e) => Scanned::Failed(e),
                        },
                    };
                    (path, outcome)
                }
            })
            .buffer_unordered(self.max_concurrent);

        let mut matches = Vec::new();
        while let Some((path, outcome)) = tasks.next().await {
            match outcome {
                Scanned::Hit => {
                    info!("found: {}", path);
                    matches.push(path);
                }
                Scanned::Miss => {}
                Scanned::TimedOut => warn!("scan timed out: {}", path),
                Scanned::Failed(e) => warn!("error searching {}: {}", path, e),
            }
        }

        SearchOutcome {
            discovered,
            matches,
        }
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

    fn coordinator() -> SearchCoordinator {
        SearchCoordinator::new(Scanner::new(16 * 1024), 8, None)
    }

    #[tokio::test]
    async fn matches_are_a_subset_of_candidates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hit.log"), "an ERROR line\n").unwrap();
        std::fs::write(dir.path().join("miss.log"), "all quiet\n").unwrap();

        let store = store_over(dir.path()).await;
        let candidates = vec!["hit.log".to_string(), "miss.log".to_string()];
        let outcome = coordinator().run(store, candidates, "ERROR").await;

        assert_eq!(outcome.discovered, 2);
        assert_eq!(outcome.matches, vec!["hit.log".to_string()]);
    }

    #[tokio::test]
    async fn unreadable_candidate_does_not_abort_the_run() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.log", "b.log", "c.log"] {
            std::fs::write(dir.path().join(name), "nothing here\n").unwrap();
        }
        std::fs::write(dir.path().join("d.log"), "the ERROR we want\n").unwrap();

        let store = store_over(dir.path()).await;
        let candidates = vec![
            "a.log".to_string(),
            "b.log".to_string(),
            "c.log".to_string(),
            "d.log".to_string(),
            "ghost.log".to_string(),
        ];
        let outcome = coordinator().run(store, candidates, "ERROR").await;

        assert_eq!(outcome.discovered, 5);
        assert_eq!(outcome.matches, vec!["d.log".to_string()]);
    }

    #[tokio::test]
    async fn empty_candidate_set_reports_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_over(dir.path()).await;
        let outcome = coordinator().run(store, Vec::new(), "ERROR").await;
        assert_eq!(outcome.discovered, 0);
        assert!(outcome.matches.is_empty());
    }
}
