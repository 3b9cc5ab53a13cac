use std::fmt;

/// One logical subtree to scan, mapped to a single server. The base path
/// is derived from the configured path template and stays fixed for the
/// lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchRoot {
    pub server: String,
    pub base_path: String,
}

/// A single item produced by the store's recursive listing.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Store-relative path, store separator convention.
    pub path: String,
    /// Final path segment.
    pub name: String,
    pub is_dir: bool,
}

/// Credentials handed to a store adapter at connect time.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Aggregate result of one search run. Matches are in completion order,
/// which varies between runs; compare as a set.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub discovered: usize,
    pub matches: Vec<String>,
}
