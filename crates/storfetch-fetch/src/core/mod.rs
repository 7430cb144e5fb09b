//! Pure transformations: backoff, failure classification, object paths.
//!
//! Nothing here performs I/O, so every decision the engine makes about
//! retrying or choosing an endpoint can be tested without a network.

mod classify;
mod http_date;
mod retry;
mod template;
mod location;

pub use classify::{Endpoint, Verdict, classify};
pub use http_date::parse_http_date;
pub use retry::retry_delay;
pub use template::{DEFAULT_TEMPLATE, PathTemplate};
pub use location::{join_url, parse_base_url};
