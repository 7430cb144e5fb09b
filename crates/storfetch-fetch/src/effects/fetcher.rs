use std::path::Path;
use std::time::SystemTime;

use bytes::Bytes;
use futures_util::StreamExt;
use storfetch_fs::StagedFile;
use storfetch_verify::{Hasher, Sha256Digest, Sha256Hasher};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::core::parse_http_date;
use crate::effects::http::{BoxStream, HttpClient};
use crate::error::{Error, Result};

const HTTP_OK: u16 = 200;

/// Where verified bytes end up.
#[derive(Debug, Clone, Copy)]
pub enum Placement<'a> {
    /// Hash only; nothing is written.
    Discard,
    /// Stage next to this path and rename into place once verified.
    File(&'a Path),
}

/// One attempt of fetch, verify and store.
pub struct Fetcher<C: HttpClient> {
    client: C,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self { Self { client } }

    pub fn client(&self) -> &C { &self.client }

    /// Download `url`, check it hashes to `expected` and place it.
    ///
    /// Returns the number of body bytes received. On any failure the staged
    /// temp file is removed and the destination is left untouched.
    pub async fn fetch(
        &self,
        url: &str,
        expected: &Sha256Digest,
        placement: Placement<'_>,
    ) -> Result<u64> {
        let response = self.client.get(url).await.map_err(|e| Error::Network(e.to_string()))?;

        if response.status != HTTP_OK {
            return Err(Error::Status {
                status: response.status,
                reason: response.reason,
                url:    url.to_string(),
            });
        }

        let destination = match placement {
            Placement::Discard => {
                return stream_verified(response.body, &mut tokio::io::sink(), expected).await;
            }
            Placement::File(destination) => destination,
        };

        let staged = StagedFile::new(destination, &format!("{expected}_"))?;
        let mut file = tokio::fs::File::create(staged.path()).await?;
        let size = stream_verified(response.body, &mut file, expected).await?;
        file.sync_all().await?;
        drop(file);

        let modified = modified_time(response.last_modified.as_deref(), url);
        tokio::task::spawn_blocking(move || staged.promote(modified))
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))??;

        tracing::debug!(%url, digest = %expected, size, "stored");
        Ok(size)
    }
}

async fn stream_verified<E, W>(
    mut body: BoxStream<'static, std::result::Result<Bytes, E>>,
    out: &mut W,
    expected: &Sha256Digest,
) -> Result<u64>
where
    E: std::error::Error,
    W: AsyncWrite + Unpin,
{
    let mut hasher = Sha256Hasher::new();
    let mut size = 0u64;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| Error::Network(e.to_string()))?;
        hasher.update(&chunk);
        out.write_all(&chunk).await?;
        size += chunk.len() as u64;
    }
    out.flush().await?;

    let actual = hasher.finish();
    if actual != *expected {
        return Err(Error::DigestMismatch {
            expected: *expected,
            actual,
        });
    }
    Ok(size)
}

/// `Last-Modified` as a timestamp, or now when absent or unparseable.
fn modified_time(last_modified: Option<&str>, url: &str) -> SystemTime {
    let Some(value) = last_modified else {
        return SystemTime::now();
    };

    parse_http_date(value).unwrap_or_else(|| {
        tracing::warn!(%url, last_modified = value, "ignoring unparseable Last-Modified");
        SystemTime::now()
    })
}
