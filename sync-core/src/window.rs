//! Rolling sync window and record selection.
//!
//! The window is never stored: every pass derives it from "now" so that two
//! passes never share a stale view of which records are in scope.

use chrono::{DateTime, Months, Utc};
use recsync_types::Record;

/// How far back a pass reaches, in calendar months.
pub const DEFAULT_RANGE_MONTHS: u32 = 2;

/// The closed interval `[now - range, now]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl SyncWindow {
    /// Build the window that ends at `now` and reaches back `months`
    /// calendar months.
    ///
    /// Month arithmetic clamps to the end of shorter months
    /// (2026-04-30 minus 2 months is 2026-02-28). Returns `None` if the
    /// start would fall outside the representable range.
    pub fn ending_at(now: DateTime<Utc>, months: u32) -> Option<Self> {
        let start = now.checked_sub_months(Months::new(months))?;
        Some(Self { start, end: now })
    }

    /// Oldest instant in the window (inclusive).
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Newest instant in the window (inclusive).
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Check whether an instant falls inside the window. Both ends inclusive.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// Per-record predicate handed to the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFilter {
    /// Only records whose `date` falls in this window match.
    pub window: SyncWindow,
    /// When set, only records with this `synced` flag match.
    pub synced: Option<bool>,
}

impl RecordFilter {
    /// Records in the window that still need uploading.
    pub fn pending_upload(window: SyncWindow) -> Self {
        Self {
            window,
            synced: Some(false),
        }
    }

    /// Every record in the window, synced or not.
    pub fn in_window(window: SyncWindow) -> Self {
        Self {
            window,
            synced: None,
        }
    }

    /// Evaluate the predicate against a record.
    pub fn matches(&self, record: &Record) -> bool {
        self.window.contains(record.date) && self.synced.map_or(true, |s| record.synced == s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use recsync_types::Hero;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn record_at(date: DateTime<Utc>, synced: bool) -> Record {
        let mut record = Record::new(Hero::new("h", "Hero"), 1, date);
        record.synced = synced;
        record
    }

    #[test]
    fn window_spans_two_calendar_months() {
        let now = at(2026, 10, 18);
        let window = SyncWindow::ending_at(now, DEFAULT_RANGE_MONTHS).unwrap();
        assert_eq!(window.start(), at(2026, 8, 18));
        assert_eq!(window.end(), now);
    }

    #[test]
    fn window_clamps_to_short_months() {
        let now = Utc.with_ymd_and_hms(2026, 4, 30, 0, 0, 0).unwrap();
        let window = SyncWindow::ending_at(now, 2).unwrap();
        assert_eq!(
            window.start(),
            Utc.with_ymd_and_hms(2026, 2, 28, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        let now = at(2026, 10, 18);
        let window = SyncWindow::ending_at(now, 2).unwrap();

        assert!(window.contains(window.start()));
        assert!(window.contains(now));
        assert!(!window.contains(window.start() - Duration::seconds(1)));
        assert!(!window.contains(now + Duration::seconds(1)));
    }

    #[test]
    fn pending_upload_matches_only_unsynced_in_window() {
        let now = at(2026, 10, 18);
        let filter = RecordFilter::pending_upload(SyncWindow::ending_at(now, 2).unwrap());

        assert!(filter.matches(&record_at(at(2026, 10, 1), false)));
        assert!(!filter.matches(&record_at(at(2026, 10, 1), true)));
        assert!(!filter.matches(&record_at(at(2026, 6, 1), false)));
    }

    #[test]
    fn in_window_ignores_synced_flag() {
        let now = at(2026, 10, 18);
        let filter = RecordFilter::in_window(SyncWindow::ending_at(now, 2).unwrap());

        assert!(filter.matches(&record_at(at(2026, 9, 1), false)));
        assert!(filter.matches(&record_at(at(2026, 9, 1), true)));
        assert!(!filter.matches(&record_at(at(2026, 11, 1), true)));
    }
}
