use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Response head plus a streaming body.
///
/// Non-success statuses are returned as responses, not errors, so the caller
/// can tell a definitive 404 from a transport failure.
pub struct HttpResponse<E> {
    pub status:        u16,
    /// Canonical reason phrase, e.g. `Not Found`.
    pub reason:        String,
    /// Raw `Last-Modified` header value.
    pub last_modified: Option<String>,
    pub body:          BoxStream<'static, Result<Bytes, E>>,
}

impl<E> std::fmt::Debug for HttpResponse<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("reason", &self.reason)
            .field("last_modified", &self.last_modified)
            .finish_non_exhaustive()
    }
}

/// Asynchronous HTTP client abstraction.
///
/// The engine needs exactly one operation: a GET whose body it can stream.
/// Implementations own redirect following and timeouts.
///
/// # Implementations
///
/// - [`ReqwestClient`]: production implementation using `reqwest`
/// - Mock implementations for testing
pub trait HttpClient: Send + Sync {
    /// Transport error type.
    type Error: std::error::Error + Send + 'static;

    /// Issue a GET and return the response head and body stream.
    ///
    /// # Errors
    ///
    /// Only transport failures (DNS, connect, timeout). HTTP error statuses
    /// are reported through [`HttpResponse::status`].
    fn get(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<HttpResponse<Self::Error>, Self::Error>> + Send;
}

impl<C: HttpClient> HttpClient for std::sync::Arc<C> {
    type Error = C::Error;

    fn get(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<HttpResponse<Self::Error>, Self::Error>> + Send {
        (**self).get(url)
    }
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::time::Duration;

    use super::*;

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        /// Client with connect, read and idle timeouts set to `timeout`;
        /// `None` leaves all three unbounded.
        pub fn new(timeout: Option<Duration>, max_idle_per_host: usize) -> Result<Self, reqwest::Error> {
            let mut builder = reqwest::Client::builder()
                .pool_max_idle_per_host(max_idle_per_host)
                .pool_idle_timeout(timeout);

            if let Some(timeout) = timeout {
                builder = builder.connect_timeout(timeout).read_timeout(timeout);
            }

            Ok(Self {
                client: builder.build()?,
            })
        }

        pub fn from_client(client: reqwest::Client) -> Self { Self { client } }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn get(&self, url: &str) -> Result<HttpResponse<Self::Error>, Self::Error> {
            let response = self.client.get(url).send().await?;
            let status = response.status();

            let last_modified = response
                .headers()
                .get(reqwest::header::LAST_MODIFIED)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            Ok(HttpResponse {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                last_modified,
                body: Box::pin(response.bytes_stream()),
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
