use std::time::Duration;

use serde::Serialize;
use storfetch_fetch::Report;

/// End-of-run figures as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub size_mb:         f64,
    pub wall_secs:       f64,
    pub rate_mb_per_sec: f64,
    pub expected:        u64,
    pub downloaded:      u64,
    pub skipped:         u64,
    pub failed:          u64,
    pub success:         bool,
}

impl Summary {
    pub fn new(report: &Report, wall: Duration) -> Self {
        Self {
            size_mb:         report.megabytes(),
            wall_secs:       wall.as_secs_f64(),
            rate_mb_per_sec: report.rate_mb_per_sec(wall),
            expected:        report.submitted,
            downloaded:      report.ok,
            skipped:         report.skipped,
            failed:          report.failed,
            success:         report.is_success(),
        }
    }

    pub fn log(&self) {
        tracing::info!(
            total_download_size = %format_args!("{:.3}MB", self.size_mb),
            total_time = %format_args!("{:.3}s", self.wall_secs),
            download_rate = %format_args!("{:.3}MB/s", self.rate_mb_per_sec),
            expected = self.expected,
            downloaded = self.downloaded,
            skipped = self.skipped,
            failed = self.failed,
            "statistics"
        );
    }

    pub fn to_json(&self) -> serde_json::Result<String> { serde_json::to_string(self) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> Report {
        Report {
            bytes: 4 * 1024 * 1024,
            ok: 3,
            skipped: 1,
            failed: 1,
            submitted: 5,
            ..Report::default()
        }
    }

    #[test]
    fn test_summary_figures() {
        let summary = Summary::new(&report(), Duration::from_secs(2));

        assert_eq!(summary.size_mb, 4.0);
        assert_eq!(summary.rate_mb_per_sec, 2.0);
        assert_eq!(summary.expected, 5);
        assert!(!summary.success);
    }

    #[test]
    fn test_json_fields() {
        let json = Summary::new(&report(), Duration::from_secs(2)).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["downloaded"], 3);
        assert_eq!(value["skipped"], 1);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["success"], false);
    }
}
