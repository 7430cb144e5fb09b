use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use storfetch_verify::Sha256Digest;
use url::Url;

use crate::core::{PathTemplate, join_url};
use crate::error::{Error, Result};

pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 10;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Maps a digest to an object path relative to the secondary base URL.
pub type SecondaryPath = Arc<dyn Fn(&Sha256Digest) -> Result<String> + Send + Sync>;

/// How downloaded objects are named in the destination directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Naming {
    /// Upper case hex file names. Not applied to the suffix.
    pub upper_case: bool,
    /// Appended to the hex name, e.g. `.dat` gives `<sha>.dat`.
    pub suffix:     String,
}

impl Naming {
    pub fn upper_case(mut self, upper_case: bool) -> Self {
        self.upper_case = upper_case;
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn file_name(&self, digest: &Sha256Digest) -> String {
        let mut name = if self.upper_case {
            digest.to_hex_upper()
        } else {
            digest.to_hex()
        };
        name.push_str(&self.suffix);
        name
    }

    pub fn target_path(&self, dir: &Path, digest: &Sha256Digest) -> PathBuf {
        dir.join(self.file_name(digest))
    }
}

/// Optional fast-path endpoint tried before the primary.
#[derive(Clone)]
pub struct Secondary {
    pub base: Url,
    pub path: SecondaryPath,
}

impl Secondary {
    /// Secondary laid out as `ab/cd/ef/<digest>`.
    pub fn new(base: Url) -> Self { Self::with_template(base, PathTemplate::default()) }

    pub fn with_template(base: Url, template: PathTemplate) -> Self {
        Self::with_path(base, move |digest: &Sha256Digest| Ok(template.render(digest)))
    }

    pub fn with_path<F>(base: Url, path: F) -> Self
    where
        F: Fn(&Sha256Digest) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            base,
            path: Arc::new(path),
        }
    }

    pub fn url(&self, digest: &Sha256Digest) -> Result<String> {
        let path = (self.path)(digest)?;
        join_url(&self.base, &path)
    }
}

impl fmt::Debug for Secondary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secondary")
            .field("base", &self.base.as_str())
            .field("path", &"{ ... }")
            .finish()
    }
}

/// Where objects are fetched from.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub primary:   Url,
    pub secondary: Option<Secondary>,
}

impl Endpoints {
    pub fn new(primary: Url) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    pub fn with_secondary(mut self, secondary: Secondary) -> Self {
        self.secondary = Some(secondary);
        self
    }

    /// `<primary>/<lowercase hex digest>`.
    pub fn primary_url(&self, digest: &Sha256Digest) -> Result<String> {
        join_url(&self.primary, &digest.to_hex())
    }
}

/// Configuration for the download engine.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use storfetch_fetch::{EngineOptions, Naming};
///
/// let options = EngineOptions::default()
///     .workers(8)
///     .timeout(None)
///     .retry_delay(Duration::from_millis(50))
///     .naming(Naming::default().suffix(".dat"));
///
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Number of concurrent workers.
    ///
    /// Default: 4
    pub workers: usize,

    /// Connect, read and idle-connection timeout for a single HTTP call.
    /// `None` disables it. There is no deadline across retries.
    ///
    /// Default: 30s
    pub timeout: Option<Duration>,

    /// Delay after the first failed attempt; doubles after each further one.
    ///
    /// Default: 100ms
    pub retry_delay: Duration,

    /// Total attempts per digest, including the first.
    ///
    /// Default: 10
    pub max_attempts: u32,

    /// Hash the body and throw it away instead of storing it.
    ///
    /// Default: false
    pub discard: bool,

    pub naming: Naming,

    /// Capacity of the input and output queues.
    ///
    /// Default: 1024
    pub queue_capacity: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            workers:        DEFAULT_WORKERS,
            timeout:        Some(DEFAULT_TIMEOUT),
            retry_delay:    DEFAULT_RETRY_DELAY,
            max_attempts:   DEFAULT_RETRY_ATTEMPTS,
            discard:        false,
            naming:         Naming::default(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl EngineOptions {
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn discard(mut self, discard: bool) -> Self {
        self.discard = discard;
        self
    }

    pub fn naming(mut self, naming: Naming) -> Self {
        self.naming = naming;
        self
    }

    pub fn queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidOptions("workers must be at least 1".into()));
        }
        if self.max_attempts == 0 {
            return Err(Error::InvalidOptions("max_attempts must be at least 1".into()));
        }
        if self.queue_capacity == 0 {
            return Err(Error::InvalidOptions("queue_capacity must be at least 1".into()));
        }
        Ok(())
    }
}
