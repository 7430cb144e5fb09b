use std::path::PathBuf;
use std::sync::Arc;

use storfetch_verify::Sha256Digest;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use crate::data::{EngineOptions, Endpoints, Report};
use crate::effects::fetcher::Fetcher;
use crate::effects::http::HttpClient;
use crate::effects::policy::{Downloader, RetryPolicy};
use crate::effects::pool::{Job, Shared, run_worker};
use crate::effects::registry::InFlight;
use crate::effects::stats::spawn_aggregator;
use crate::error::{Error, Result};

/// A running download engine.
///
/// Digests go in through [`submit`](Self::submit); [`drain`](Self::drain)
/// stops the workers once the queue is empty and returns the totals.
/// Must be started inside a Tokio runtime.
///
/// # Examples
///
/// ```no_run
/// use storfetch_fetch::{Engine, EngineOptions, Endpoints, ReqwestClient, parse_base_url};
///
/// # async fn run() -> storfetch_fetch::Result<()> {
/// let options = EngineOptions::default();
/// let client = ReqwestClient::new(options.timeout, options.workers)
///     .map_err(|e| storfetch_fetch::Error::Network(e.to_string()))?;
/// let endpoints = Endpoints::new(parse_base_url("http://stor.example.com")?);
///
/// let mut engine = Engine::start(client, endpoints, "objects", options)?;
/// engine.submit("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855".parse()?).await?;
///
/// let report = engine.drain().await?;
/// assert_eq!(report.completed(), report.submitted);
/// # Ok(())
/// # }
/// ```
pub struct Engine<C: HttpClient + 'static> {
    jobs:       mpsc::Sender<Job>,
    workers:    Vec<JoinHandle<()>>,
    aggregator: JoinHandle<Report>,
    shared:     Arc<Shared<C>>,
    submitted:  u64,
}

impl<C: HttpClient + 'static> Engine<C> {
    /// Spawn the workers and the aggregator.
    ///
    /// `client` is shared by every worker; its timeouts apply per request.
    pub fn start(
        client: C,
        endpoints: Endpoints,
        destination_dir: impl Into<PathBuf>,
        options: EngineOptions,
    ) -> Result<Self> {
        options.validate()?;

        let shared = Arc::new(Shared {
            downloader:      Downloader::new(Fetcher::new(client), endpoints, RetryPolicy::from(&options)),
            in_flight:       InFlight::new(),
            destination_dir: destination_dir.into(),
            naming:          options.naming.clone(),
            discard:         options.discard,
        });

        let (jobs, job_rx) = mpsc::channel(options.queue_capacity);
        let (outcome_tx, outcome_rx) = mpsc::channel(options.queue_capacity);
        let job_rx = Arc::new(Mutex::new(job_rx));

        let workers = (0..options.workers)
            .map(|id| {
                tokio::spawn(run_worker(
                    id,
                    Arc::clone(&shared),
                    Arc::clone(&job_rx),
                    outcome_tx.clone(),
                ))
            })
            .collect();
        // Only workers hold senders, so the aggregator ends with the last one.
        drop(outcome_tx);

        tracing::debug!(
            workers = options.workers,
            dir = %shared.destination_dir.display(),
            discard = options.discard,
            "engine started"
        );

        Ok(Self {
            jobs,
            workers,
            aggregator: spawn_aggregator(outcome_rx),
            shared,
            submitted: 0,
        })
    }

    /// Queue `digest` for download. Waits only while the queue is full.
    pub async fn submit(&mut self, digest: Sha256Digest) -> Result<()> {
        self.jobs.send(Job::Fetch(digest)).await.map_err(|_| Error::Closed)?;
        self.submitted += 1;
        Ok(())
    }

    pub fn submitted(&self) -> u64 { self.submitted }

    /// Digests currently being transferred.
    pub fn in_flight(&self) -> usize { self.shared.in_flight.len() }

    /// Let the workers finish everything queued, then return the totals.
    ///
    /// A worker that panicked is logged; the digest it was holding is missing
    /// from the totals, so the report will not be a success.
    pub async fn drain(self) -> Result<Report> {
        let Self {
            jobs,
            workers,
            aggregator,
            submitted,
            ..
        } = self;

        for _ in 0..workers.len() {
            if jobs.send(Job::Shutdown).await.is_err() {
                break;
            }
        }
        drop(jobs);

        for (id, worker) in workers.into_iter().enumerate() {
            if let Err(e) = worker.await {
                tracing::error!(worker = id, error = %e, "worker stopped abnormally");
            }
        }

        let mut report = aggregator.await.map_err(|e| Error::Task(e.to_string()))?;
        report.submitted = submitted;

        tracing::debug!(
            ok = report.ok,
            skipped = report.skipped,
            failed = report.failed,
            submitted,
            "engine drained"
        );
        Ok(report)
    }
}
