use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use storfetch_verify::Sha256Digest;
use tokio::sync::{Mutex, mpsc};
use tracing::Instrument;

use crate::data::{Naming, Outcome};
use crate::effects::fetcher::Placement;
use crate::effects::http::HttpClient;
use crate::effects::policy::Downloader;
use crate::effects::registry::InFlight;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Fetch(Sha256Digest),
    /// Sent once per worker when draining.
    Shutdown,
}

/// Workers pull from one queue; the receiver is shared behind a lock.
pub type JobQueue = Arc<Mutex<mpsc::Receiver<Job>>>;

/// State shared by every worker of one engine.
pub struct Shared<C: HttpClient> {
    pub downloader:      Downloader<C>,
    pub in_flight:       InFlight,
    pub destination_dir: PathBuf,
    pub naming:          Naming,
    pub discard:         bool,
}

impl<C: HttpClient> Shared<C> {
    /// Skip, fetch or fail one digest. Never returns an error: failures are
    /// logged and reported as [`Outcome::failed`].
    pub async fn process(&self, digest: Sha256Digest) -> Outcome {
        let target = self.naming.target_path(&self.destination_dir, &digest);

        if self.on_disk(&digest, &target).await {
            return Outcome::skipped();
        }

        let Some(_claim) = self.in_flight.claim(digest) else {
            tracing::debug!(digest = %digest, "already in flight");
            return Outcome::skipped();
        };
        // A previous holder may have promoted the file and released its
        // claim between the first check and ours.
        if self.on_disk(&digest, &target).await {
            return Outcome::skipped();
        }

        let placement = if self.discard {
            Placement::Discard
        } else {
            Placement::File(&target)
        };

        let start = Instant::now();
        match self.downloader.download(&digest, placement).await {
            Ok(bytes) => {
                let elapsed = start.elapsed();
                tracing::debug!(digest = %digest, bytes, ?elapsed, "downloaded");
                Outcome::ok(bytes, elapsed)
            }
            Err(e) => {
                tracing::error!(digest = %digest, error = %e, elapsed = ?start.elapsed(), "download failed");
                Outcome::failed()
            }
        }
    }

    async fn on_disk(&self, digest: &Sha256Digest, target: &Path) -> bool {
        match tokio::fs::try_exists(target).await {
            Ok(true) => {
                tracing::debug!(digest = %digest, path = %target.display(), "already on disk");
                true
            }
            Ok(false) => false,
            Err(e) => {
                tracing::warn!(path = %target.display(), error = %e, "cannot check destination");
                false
            }
        }
    }
}

/// Process jobs until a [`Job::Shutdown`] arrives or the queue closes.
pub async fn run_worker<C: HttpClient>(
    id: usize,
    shared: Arc<Shared<C>>,
    jobs: JobQueue,
    outcomes: mpsc::Sender<Outcome>,
) {
    async move {
        tracing::debug!("worker started");
        loop {
            let job = jobs.lock().await.recv().await;
            let digest = match job {
                Some(Job::Fetch(digest)) => digest,
                Some(Job::Shutdown) | None => break,
            };

            let outcome = shared.process(digest).await;
            if outcomes.send(outcome).await.is_err() {
                tracing::warn!("outcome queue closed");
                break;
            }
        }
        tracing::debug!("worker stopped");
    }
    .instrument(tracing::debug_span!("worker", worker = id))
    .await
}
