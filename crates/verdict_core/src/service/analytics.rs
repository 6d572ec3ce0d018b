//! Case analytics aggregation.
//!
//! # Responsibility
//! - Reduce a full verdict snapshot into per-court and per-month counts.
//! - Convert counts into parallel label/count arrays for charts.
//!
//! # Invariants
//! - Bucket order is first-occurrence order.
//! - Blank court names count under `UNKNOWN_COURT`.
//! - Undated verdicts count under the injected clock's month (UTC).

use crate::clock::Clock;
use crate::model::verdict::VerdictRecord;
use chrono::{DateTime, Utc};

pub const UNKNOWN_COURT: &str = "Unknown";
pub const COURT_SERIES_LABEL: &str = "Verdicts by Court";
pub const MONTH_SERIES_LABEL: &str = "Monthly Verdicts";

/// Insertion-ordered key → count mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountBuckets {
    entries: Vec<(String, u64)>,
}

impl CountBuckets {
    fn increment(&mut self, key: String) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((key, 1)),
        }
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, count)| *count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries
            .iter()
            .map(|(key, count)| (key.as_str(), *count))
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Splits buckets into chart-ready parallel arrays.
    pub fn to_series(&self, label: impl Into<String>) -> ChartSeries {
        let (labels, counts) = self.entries.iter().cloned().unzip();
        ChartSeries {
            label: label.into(),
            labels,
            counts,
        }
    }
}

/// One chart dataset: `labels[i]` has `counts[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSeries {
    pub label: String,
    pub labels: Vec<String>,
    pub counts: Vec<u64>,
}

/// Counts verdicts per court name.
///
/// Empty and whitespace-only names both count under `UNKNOWN_COURT`.
pub fn count_by_court(records: &[VerdictRecord]) -> CountBuckets {
    let mut buckets = CountBuckets::default();
    for record in records {
        let court = record.fields.court_name.as_str();
        let key = if court.trim().is_empty() {
            UNKNOWN_COURT
        } else {
            court
        };
        buckets.increment(key.to_string());
    }
    buckets
}

/// Counts verdicts per `YYYY-MM` of their `date`.
pub fn count_by_month(records: &[VerdictRecord], clock: &dyn Clock) -> CountBuckets {
    let mut buckets = CountBuckets::default();
    for record in records {
        let instant = record
            .fields
            .date
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or_else(|| clock.now());
        buckets.increment(month_key(instant));
    }
    buckets
}

/// Formats an instant as its `YYYY-MM` bucket key.
///
/// Buckets are UTC months, not device-local ones, so a verdict dated late on
/// the last day of a month may land in the next month for western offsets.
pub fn month_key(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m").to_string()
}

/// Both analytics views for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseAnalytics {
    pub by_court: ChartSeries,
    pub by_month: ChartSeries,
    pub total: usize,
}

impl CaseAnalytics {
    pub fn build(records: &[VerdictRecord], clock: &dyn Clock) -> Self {
        Self {
            by_court: count_by_court(records).to_series(COURT_SERIES_LABEL),
            by_month: count_by_month(records, clock).to_series(MONTH_SERIES_LABEL),
            total: records.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{count_by_court, count_by_month, month_key, CaseAnalytics, UNKNOWN_COURT};
    use crate::clock::FixedClock;
    use crate::model::verdict::{VerdictFields, VerdictRecord};
    use chrono::{TimeZone, Utc};

    fn record(court_name: &str, date: Option<i64>) -> VerdictRecord {
        VerdictRecord {
            id: format!("{court_name}-{date:?}"),
            fields: VerdictFields {
                court_name: court_name.to_string(),
                date,
                ..VerdictFields::default()
            },
        }
    }

    fn epoch_ms(year: i32, month: u32, day: u32) -> i64 {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn clock_in(year: i32, month: u32) -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn court_counts_bucket_blank_as_unknown() {
        let records = vec![record("A", None), record("A", None), record("", None)];
        let buckets = count_by_court(&records);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets.get("A"), Some(2));
        assert_eq!(buckets.get(UNKNOWN_COURT), Some(1));
    }

    #[test]
    fn whitespace_court_counts_as_unknown() {
        let records = vec![record("   ", None), record("\t", None)];
        assert_eq!(count_by_court(&records).get(UNKNOWN_COURT), Some(2));
    }

    #[test]
    fn month_key_uses_utc_calendar() {
        let last_minute = Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 0).unwrap();
        assert_eq!(month_key(last_minute), "2024-03");
        let offset = chrono::DateTime::parse_from_rfc3339("2024-03-31T22:30:00-05:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(month_key(offset), "2024-04");
    }

    #[test]
    fn court_order_follows_first_occurrence() {
        let records = vec![record("Z", None), record("B", None), record("Z", None)];
        let series = count_by_court(&records).to_series("courts");
        assert_eq!(series.labels, vec!["Z".to_string(), "B".to_string()]);
        assert_eq!(series.counts, vec![2, 1]);
    }

    #[test]
    fn same_day_records_share_month_bucket() {
        let day = epoch_ms(2024, 3, 15);
        let records = vec![record("A", Some(day)), record("B", Some(day))];
        let buckets = count_by_month(&records, &clock_in(2030, 1));
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets.get("2024-03"), Some(2));
    }

    #[test]
    fn undated_records_use_clock_month() {
        let records = vec![record("A", None), record("B", Some(epoch_ms(2023, 11, 2)))];
        let buckets = count_by_month(&records, &clock_in(2025, 7));
        assert_eq!(buckets.get("2025-07"), Some(1));
        assert_eq!(buckets.get("2023-11"), Some(1));
    }

    #[test]
    fn analytics_bundle_totals_match() {
        let records = vec![record("A", None), record("", Some(epoch_ms(2024, 1, 9)))];
        let analytics = CaseAnalytics::build(&records, &clock_in(2024, 1));
        assert_eq!(analytics.total, 2);
        assert_eq!(analytics.by_court.counts.iter().sum::<u64>(), 2);
        assert_eq!(analytics.by_month.labels, vec!["2024-01".to_string()]);
        assert_eq!(analytics.by_month.counts, vec![2]);
    }
}
