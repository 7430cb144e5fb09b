//! Concurrent downloader for content-addressed objects.
//!
//! Objects are named by the SHA-256 of their content. Each submitted digest
//! is fetched from a stor endpoint (optionally through a secondary endpoint
//! first), verified while streaming, and renamed into the destination
//! directory only once its hash matches.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - `data` - configuration, per-item outcomes and the final report
//! - `core` - pure decisions: backoff, failure classification, object paths
//! - `effects` - HTTP, filesystem and the worker pool behind [`Engine`]
//!
//! # Guarantees
//!
//! - A digest already on disk is never fetched again
//! - At most one transfer per digest is in flight at a time
//! - A file at the destination always hashes to its name
//! - Every submission ends up counted exactly once in the [`Report`]

mod core;
mod data;
mod effects;
mod error;

pub use crate::core::{
    DEFAULT_TEMPLATE, Endpoint, PathTemplate, Verdict, classify, join_url, parse_base_url, parse_http_date, retry_delay,
};
pub use data::{
    DEFAULT_QUEUE_CAPACITY, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT, DEFAULT_WORKERS,
    DownloadStatus, EngineOptions, Endpoints, Naming, Outcome, Report, Secondary, SecondaryPath,
};
pub use effects::{
    BoxStream, Claim, Downloader, Engine, Fetcher, HttpClient, HttpResponse, InFlight, Placement, RetryPolicy,
    aggregate,
};
#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;
pub use error::{Error, NOT_FOUND, Result};
pub use storfetch_verify::Sha256Digest;
