use std::sync::LazyLock;

use regex::Regex;
use storfetch_fetch::Sha256Digest;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Split};

static DIGEST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[a-fA-F0-9]{64}").expect("digest pattern is valid"));

/// Every 64-hex-character run in `line`, in order of appearance.
pub fn extract_digests(line: &str) -> impl Iterator<Item = Sha256Digest> + '_ {
    DIGEST.find_iter(line).filter_map(|m| match m.as_str().parse() {
        Ok(digest) => Some(digest),
        Err(e) => {
            tracing::error!(candidate = m.as_str(), error = %e, "invalid sha256");
            None
        }
    })
}

/// Input split into lines of raw bytes.
///
/// Lines need not be UTF-8: invalid bytes are replaced before matching, so a
/// stray binary line never hides the digests that follow it.
pub struct DigestLines<R> {
    lines: Split<R>,
}

impl<R: AsyncBufRead + Unpin> DigestLines<R> {
    pub fn new(reader: R) -> Self { Self { lines: reader.split(b'\n') } }

    /// Digests on the next line, or `None` at the end of input. A read error
    /// is logged and ends the input.
    pub async fn next_line(&mut self) -> Option<Vec<Sha256Digest>> {
        match self.lines.next_segment().await {
            Ok(Some(line)) => Some(extract_digests(&String::from_utf8_lossy(&line)).collect()),
            Ok(None) => None,
            Err(e) => {
                tracing::error!(error = %e, "failed to read input, no further digests are read");
                None
            }
        }
    }
}
