//! Network, filesystem and task effects.
//!
//! The HTTP client sits behind [`HttpClient`] so everything above it, from a
//! single fetch up to the whole [`Engine`], runs against a scripted client in
//! tests.

mod engine;
mod fetcher;
mod http;
mod policy;
mod pool;
mod registry;
mod stats;
#[cfg(test)]
mod testing;

pub use engine::Engine;
pub use fetcher::{Fetcher, Placement};
pub use http::{BoxStream, HttpClient, HttpResponse};
#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
pub use policy::{Downloader, RetryPolicy};
pub use registry::{Claim, InFlight};
pub use stats::aggregate;
