//! Plain data: engine configuration, per-item outcomes and the final report.

pub mod options;
pub mod report;

pub use options::{
    DEFAULT_QUEUE_CAPACITY, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT,
    DEFAULT_WORKERS, EngineOptions, Endpoints, Naming, Secondary, SecondaryPath,
};
pub use report::{DownloadStatus, Outcome, Report};
