use std::time::Duration;

use storfetch_verify::Sha256Digest;

use crate::core::{Endpoint, Verdict, classify, retry_delay};
use crate::data::{EngineOptions, Endpoints};
use crate::effects::fetcher::{Fetcher, Placement};
use crate::effects::http::HttpClient;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub base_delay:   Duration,
}

impl From<&EngineOptions> for RetryPolicy {
    fn from(options: &EngineOptions) -> Self {
        Self {
            max_attempts: options.max_attempts,
            base_delay:   options.retry_delay,
        }
    }
}

/// Runs fetch attempts for one digest with backoff and endpoint fallback.
pub struct Downloader<C: HttpClient> {
    fetcher:   Fetcher<C>,
    endpoints: Endpoints,
    policy:    RetryPolicy,
}

impl<C: HttpClient> Downloader<C> {
    pub fn new(fetcher: Fetcher<C>, endpoints: Endpoints, policy: RetryPolicy) -> Self {
        Self {
            fetcher,
            endpoints,
            policy,
        }
    }

    /// Fetch `digest` into `placement`, returning the bytes received by the
    /// successful attempt.
    ///
    /// The secondary endpoint, when configured, is tried first. A 404 there
    /// switches this digest to the primary for the remaining attempts; a 404
    /// from the primary ends the attempts at once.
    pub async fn download(&self, digest: &Sha256Digest, placement: Placement<'_>) -> Result<u64> {
        let mut use_secondary = self.endpoints.secondary.is_some();
        let mut last_error = None;

        for attempt in 0..self.policy.max_attempts {
            let (endpoint, url) = self.choose_url(digest, use_secondary)?;
            tracing::debug!(digest = %digest, %endpoint, %url, attempt = attempt + 1, "fetching");

            let error = match self.fetcher.fetch(&url, digest, placement).await {
                Ok(size) => return Ok(size),
                Err(error) => error,
            };

            match classify(&error, endpoint) {
                Verdict::GiveUp => return Err(error),
                Verdict::FallBack => {
                    tracing::debug!(digest = %digest, "not found on secondary, falling back to primary");
                    use_secondary = false;
                }
                Verdict::Retry => {}
            }

            if attempt + 1 < self.policy.max_attempts {
                let delay = retry_delay(attempt, self.policy.base_delay);
                tracing::debug!(digest = %digest, attempt = attempt + 1, ?delay, %error, "retrying");
                tokio::time::sleep(delay).await;
            }
            last_error = Some(error);
        }

        Err(last_error.unwrap_or_else(|| Error::InvalidOptions("max_attempts must be at least 1".into())))
    }

    /// The secondary URL if it is in use and can be built, else the primary.
    fn choose_url(&self, digest: &Sha256Digest, use_secondary: bool) -> Result<(Endpoint, String)> {
        if let (true, Some(secondary)) = (use_secondary, &self.endpoints.secondary) {
            match secondary.url(digest) {
                Ok(url) => return Ok((Endpoint::Secondary, url)),
                Err(e) => {
                    tracing::warn!(digest = %digest, error = %e, "secondary URL failed, using primary for this attempt");
                }
            }
        }
        Ok((Endpoint::Primary, self.endpoints.primary_url(digest)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Secondary;
    use crate::effects::testing::{MockClient, Reply};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use storfetch_verify::Sha256Hasher;
    use url::Url;

    const BODY: &[u8] = b"object body";

    fn digest() -> Sha256Digest { Sha256Hasher::digest(BODY) }

    fn primary() -> Endpoints { Endpoints::new(Url::parse("http://stor.local").unwrap()) }

    fn with_secondary() -> Endpoints {
        primary().with_secondary(Secondary::new(Url::parse("http://s3.local").unwrap()))
    }

    fn downloader(client: Arc<MockClient>, endpoints: Endpoints, max_attempts: u32) -> Downloader<Arc<MockClient>> {
        Downloader::new(Fetcher::new(client), endpoints, RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
        })
    }

    #[tokio::test]
    async fn test_primary_not_found_is_terminal() {
        let client = Arc::new(MockClient::always(Reply::status(404)));
        let downloader = downloader(Arc::clone(&client), primary(), 10);

        let err = downloader.download(&digest(), Placement::Discard).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(client.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let client = Arc::new(MockClient::script(
            [Reply::status(503), Reply::refused(), Reply::ok(b"garbage")],
            Reply::ok(BODY),
        ));
        let downloader = downloader(Arc::clone(&client), primary(), 10);

        let size = downloader.download(&digest(), Placement::Discard).await.unwrap();

        assert_eq!(size, BODY.len() as u64);
        assert_eq!(client.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_attempts_are_bounded() {
        let client = Arc::new(MockClient::always(Reply::status(500)));
        let downloader = downloader(Arc::clone(&client), primary(), 3);

        let err = downloader.download(&digest(), Placement::Discard).await.unwrap_err();

        assert_eq!(err.status_code(), Some(500));
        assert_eq!(client.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_secondary_falls_back_after_not_found() {
        let client = Arc::new(MockClient::script(
            [Reply::status(500), Reply::status(404)],
            Reply::ok(BODY),
        ));
        let downloader = downloader(Arc::clone(&client), with_secondary(), 10);

        downloader.download(&digest(), Placement::Discard).await.unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].starts_with("http://s3.local/"));
        assert!(calls[1].starts_with("http://s3.local/"));
        assert_eq!(calls[2], format!("http://stor.local/{}", digest()));
    }

    #[tokio::test]
    async fn test_secondary_and_primary_not_found() {
        let client = Arc::new(MockClient::always(Reply::status(404)));
        let downloader = downloader(Arc::clone(&client), with_secondary(), 10);

        let err = downloader.download(&digest(), Placement::Discard).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(client.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_secondary_url_failure_uses_primary_once() {
        let failures = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&failures);
        let flaky = Secondary::with_path(Url::parse("http://s3.local").unwrap(), move |digest| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(Error::InvalidOptions("template unavailable".into()))
            } else {
                Ok(digest.to_hex())
            }
        });
        let client = Arc::new(MockClient::script([Reply::status(500)], Reply::ok(BODY)));
        let downloader = downloader(Arc::clone(&client), primary().with_secondary(flaky), 10);

        downloader.download(&digest(), Placement::Discard).await.unwrap();

        let calls = client.calls();
        assert_eq!(calls[0], format!("http://stor.local/{}", digest()));
        assert_eq!(calls[1], format!("http://s3.local/{}", digest()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_doubles() {
        let client = Arc::new(MockClient::always(Reply::status(500)));
        let downloader = Downloader::new(Fetcher::new(Arc::clone(&client)), primary(), RetryPolicy {
            max_attempts: 4,
            base_delay:   Duration::from_millis(100),
        });

        let start = tokio::time::Instant::now();
        downloader.download(&digest(), Placement::Discard).await.unwrap_err();

        // 100 + 200 + 400, no sleep after the last attempt
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(700), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(800), "{elapsed:?}");
    }
}
