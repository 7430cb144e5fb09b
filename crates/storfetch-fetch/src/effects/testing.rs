//! Scripted HTTP client for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use bytes::Bytes;

use crate::effects::http::{BoxStream, HttpClient, HttpResponse};

#[derive(Debug)]
pub struct MockError(pub String);

impl std::fmt::Display for MockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

impl std::error::Error for MockError {}

#[derive(Debug, Clone)]
pub struct Reply {
    /// 0 means the connection itself fails.
    status:        u16,
    body:          Vec<u8>,
    last_modified: Option<String>,
    broken:        bool,
    delay:         Duration,
}

impl Reply {
    pub fn ok(body: &[u8]) -> Self {
        Self {
            status:        200,
            body:          body.to_vec(),
            last_modified: None,
            broken:        false,
            delay:         Duration::ZERO,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Self::ok(b"")
        }
    }

    pub fn refused() -> Self { Self::status(0) }

    /// Sends `prefix` then fails mid-body.
    pub fn broken(prefix: &[u8]) -> Self {
        Self {
            broken: true,
            ..Self::ok(prefix)
        }
    }

    pub fn last_modified(mut self, value: &str) -> Self {
        self.last_modified = Some(value.to_string());
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Replays `script` in order, then repeats `fallback` forever.
pub struct MockClient {
    script:   Mutex<VecDeque<Reply>>,
    fallback: Reply,
    calls:    Mutex<Vec<String>>,
}

impl MockClient {
    pub fn always(reply: Reply) -> Self { Self::script([], reply) }

    pub fn script(replies: impl IntoIterator<Item = Reply>, fallback: Reply) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> { self.calls.lock().unwrap().clone() }

    fn next_reply(&self, url: &str) -> Reply {
        self.calls.lock().unwrap().push(url.to_string());
        self.script.lock().unwrap().pop_front().unwrap_or_else(|| self.fallback.clone())
    }
}

impl HttpClient for MockClient {
    type Error = MockError;

    async fn get(&self, url: &str) -> Result<HttpResponse<Self::Error>, Self::Error> {
        let reply = self.next_reply(url);

        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        if reply.status == 0 {
            return Err(MockError("connection refused".to_string()));
        }

        let mut chunks: Vec<Result<Bytes, MockError>> = reply
            .body
            .chunks(4)
            .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
            .collect();
        if reply.broken {
            chunks.push(Err(MockError("connection reset".to_string())));
        }

        let body: BoxStream<'static, Result<Bytes, MockError>> =
            Box::pin(futures_util::stream::iter(chunks));

        Ok(HttpResponse {
            status: reply.status,
            reason: String::new(),
            last_modified: reply.last_modified,
            body,
        })
    }
}
