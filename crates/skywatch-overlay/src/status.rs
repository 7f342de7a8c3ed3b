//! The status readout: load-progress feed plus the per-frame summary line.

use chrono::{DateTime, Utc};
use tracing::info;

/// Append-only feed of load-progress and error lines.
///
/// Every pushed line also goes to the structured log; the latest line is
/// what the window title mirrors until the scene settles into its steady
/// per-frame [`StatusLine`] readout.
#[derive(Clone, Debug, Default)]
pub struct StatusFeed {
    lines: Vec<String>,
}

impl StatusFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line and log it.
    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        info!("{line}");
        self.lines.push(line);
    }

    /// The most recent line, if any.
    pub fn latest(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Static dataset counts plus per-frame clock state, formatted for display.
#[derive(Clone, Debug)]
pub struct StatusLine {
    pub star_count: usize,
    pub constellation_count: usize,
    pub segment_count: usize,
    pub missing_count: usize,
}

impl StatusLine {
    /// The dataset summary, fixed for the life of the scene.
    pub fn summary(&self) -> String {
        let mut line = format!(
            "Stars: {} | Constellations: {} ({} segments)",
            self.star_count, self.constellation_count, self.segment_count
        );
        if self.missing_count > 0 {
            line.push_str(&format!(" | {} unresolved ids", self.missing_count));
        }
        line
    }

    /// The full per-frame readout: summary plus UTC clock and rotation.
    pub fn format(&self, now: DateTime<Utc>, rotation_degrees: f32) -> String {
        format!(
            "{} | UTC {} | Rotation {:.2}\u{b0}",
            self.summary(),
            now.format("%H:%M:%S"),
            rotation_degrees
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn status() -> StatusLine {
        StatusLine {
            star_count: 9000,
            constellation_count: 12,
            segment_count: 80,
            missing_count: 0,
        }
    }

    #[test]
    fn test_summary_contains_counts() {
        let s = status().summary();
        assert!(s.contains("Stars: 9000"));
        assert!(s.contains("Constellations: 12"));
        assert!(s.contains("80 segments"));
    }

    #[test]
    fn test_summary_omits_missing_when_zero() {
        assert!(!status().summary().contains("unresolved"));
    }

    #[test]
    fn test_summary_reports_missing() {
        let s = StatusLine {
            missing_count: 3,
            ..status()
        };
        assert!(s.summary().contains("3 unresolved ids"));
    }

    #[test]
    fn test_format_includes_clock_and_rotation() {
        let now = Utc.with_ymd_and_hms(2024, 3, 21, 18, 30, 5).unwrap();
        let line = status().format(now, 192.5);
        assert!(line.contains("UTC 18:30:05"));
        assert!(line.contains("192.50"));
    }

    #[test]
    fn test_feed_keeps_lines_in_order() {
        let mut feed = StatusFeed::new();
        assert!(feed.latest().is_none());
        feed.push("Loading star catalog...");
        feed.push("Star catalog: 36 stars");
        assert_eq!(feed.latest(), Some("Star catalog: 36 stars"));
        assert_eq!(feed.lines().len(), 2);
        assert_eq!(feed.lines()[0], "Loading star catalog...");
    }
}
