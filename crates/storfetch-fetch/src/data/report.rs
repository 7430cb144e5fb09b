use std::time::Duration;

const MEGABYTE: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStatus {
    /// Fetched and verified by this call.
    Ok,
    /// Already on disk, or another worker is fetching it.
    Skipped,
    /// Attempts exhausted or a definitive failure.
    Failed,
}

impl std::fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DownloadStatus::Ok => write!(f, "ok"),
            DownloadStatus::Skipped => write!(f, "skipped"),
            DownloadStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Result of processing one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub status:  DownloadStatus,
    pub bytes:   u64,
    pub elapsed: Duration,
}

impl Outcome {
    pub fn ok(bytes: u64, elapsed: Duration) -> Self {
        Self {
            status: DownloadStatus::Ok,
            bytes,
            elapsed,
        }
    }

    pub fn skipped() -> Self {
        Self {
            status:  DownloadStatus::Skipped,
            bytes:   0,
            elapsed: Duration::ZERO,
        }
    }

    /// Time spent on failures is not counted.
    pub fn failed() -> Self {
        Self {
            status:  DownloadStatus::Failed,
            bytes:   0,
            elapsed: Duration::ZERO,
        }
    }
}

/// Totals over every submission of one engine run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    pub bytes:     u64,
    /// Time spent on successful downloads, summed across workers, not
    /// wall-clock.
    pub duration:  Duration,
    pub ok:        u64,
    pub skipped:   u64,
    pub failed:    u64,
    pub submitted: u64,
}

impl Report {
    pub fn record(&mut self, outcome: &Outcome) {
        self.bytes += outcome.bytes;
        self.duration += outcome.elapsed;
        match outcome.status {
            DownloadStatus::Ok => self.ok += 1,
            DownloadStatus::Skipped => self.skipped += 1,
            DownloadStatus::Failed => self.failed += 1,
        }
    }

    /// Every submitted digest is now on disk (or was hashed in discard mode).
    pub fn is_success(&self) -> bool { self.ok + self.skipped == self.submitted }

    pub fn completed(&self) -> u64 { self.ok + self.skipped + self.failed }

    pub fn megabytes(&self) -> f64 { self.bytes as f64 / MEGABYTE }

    /// Throughput over a wall-clock interval.
    pub fn rate_mb_per_sec(&self, wall: Duration) -> f64 {
        let secs = wall.as_secs_f64();
        if secs > 0.0 { self.megabytes() / secs } else { 0.0 }
    }
}
