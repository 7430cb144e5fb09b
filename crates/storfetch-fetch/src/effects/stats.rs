use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::data::{Outcome, Report};

/// Sum outcomes until every sender is dropped.
///
/// `submitted` is left at zero; only the engine knows it.
pub async fn aggregate(mut outcomes: mpsc::Receiver<Outcome>) -> Report {
    let mut report = Report::default();
    while let Some(outcome) = outcomes.recv().await {
        tracing::trace!(status = %outcome.status, bytes = outcome.bytes, "outcome");
        report.record(&outcome);
    }
    report
}

pub fn spawn_aggregator(outcomes: mpsc::Receiver<Outcome>) -> JoinHandle<Report> {
    tokio::spawn(aggregate(outcomes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_totals_after_senders_close() {
        let (tx, rx) = mpsc::channel(4);
        let handle = spawn_aggregator(rx);

        let other = tx.clone();
        tx.send(Outcome::ok(100, Duration::from_millis(10))).await.unwrap();
        other.send(Outcome::skipped()).await.unwrap();
        other.send(Outcome::failed()).await.unwrap();
        drop(tx);
        drop(other);

        let report = handle.await.unwrap();
        assert_eq!(report.bytes, 100);
        assert_eq!(report.duration, Duration::from_millis(10));
        assert_eq!(report.completed(), 3);
        assert_eq!(report.submitted, 0);
    }

    #[tokio::test]
    async fn test_no_outcomes() {
        let (tx, rx) = mpsc::channel::<Outcome>(1);
        drop(tx);
        assert_eq!(aggregate(rx).await, Report::default());
    }
}
