use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::ScanError;
use crate::store::{to_store_path, RemoteStore};

/// Line-oriented substring scanner with best-effort UTF-16 handling.
#[derive(Debug, Clone)]
pub struct Scanner {
    buffer_size: usize,
}

impl Scanner {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    /// Report whether any line of `path` contains `needle`, stopping at
    /// the first hit.
    ///
    /// Memory use is bounded by the buffer capacity plus the current
    /// line, so file size never matters. Reaching end of stream without
    /// a hit is a negative result, not an error.
    pub async fn scan(
        &self,
        store: &dyn RemoteStore,
        path: &str,
        needle: &str,
    ) -> Result<bool, ScanError> {
        let file = store
            .open(&to_store_path(path))
            .await
            .map_err(|e| ScanError::OpenFailed {
                path: path.to_string(),
                source: e,
            })?;

        let mut reader = BufReader::with_capacity(self.buffer_size, file);
        let mut line = Vec::new();
        loop {
            line.clear();
            let n = reader
                .read_until(b'\n', &mut line)
                .await
                .map_err(|e| ScanError::ReadFailed {
                    path: path.to_string(),
                    source: e,
                })?;
            if n == 0 {
                return Ok(false);
            }
            if decode_line(&line).contains(needle) {
                return Ok(true);
            }
        }
    }
}

/// Decode one raw line. A two-byte UTF-16 byte-order marker picks the
/// decoder; anything else passes through as UTF-8/ASCII. Malformed input
/// degrades to replacement characters instead of failing the scan.
fn decode_line(raw: &[u8]) -> String {
    if raw.starts_with(&[0xFF, 0xFE]) {
        let (decoded, _, _) = encoding_rs::UTF_16LE.decode(raw);
        return decoded.into_owned();
    }
    if raw.starts_with(&[0xFE, 0xFF]) {
        let (decoded, _, _) = encoding_rs::UTF_16BE.decode(raw);
        return decoded.into_owned();
    }
    String::from_utf8_lossy(raw).into_owned()
}
