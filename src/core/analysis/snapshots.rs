use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use tracing::warn;

use crate::core::error::ReportError;
use crate::core::models::findings::SnapshotSummary;
use crate::core::models::inventory::SnapshotRecord;

const CREATE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const SECONDS_PER_DAY: i64 = 86_400;

/// A snapshot with its creation time parsed and age derived.
#[derive(Debug, Clone)]
pub struct AgedSnapshot<'a> {
    pub record: &'a SnapshotRecord,
    pub created: DateTime<Utc>,
    pub age_days: i64,
}

/// Whole days between `created` and `now`, rounded toward negative infinity.
pub fn age_in_days(created: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - created).num_seconds().div_euclid(SECONDS_PER_DAY)
}

pub fn parse_create_date(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw.trim(), CREATE_DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw.trim())
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
}

/// Attach ages to every snapshot with a readable creation date.
///
/// Records with a missing or unparseable date are skipped with a warning; a
/// list where no record has a `create_date` at all is a structural failure.
pub fn annotate_ages(
    records: &[SnapshotRecord],
    now: DateTime<Utc>,
) -> Result<Vec<AgedSnapshot<'_>>, ReportError> {
    if !records.is_empty() && records.iter().all(|r| r.create_date.is_none()) {
        return Err(ReportError::MissingField("create_date".to_string()));
    }

    let aged = records
        .iter()
        .filter_map(|record| {
            let Some(raw) = record.create_date.as_deref() else {
                warn!(
                    snapshot = record.name.as_deref().unwrap_or("<unnamed>"),
                    "skipping snapshot without create_date"
                );
                return None;
            };
            match parse_create_date(raw) {
                Some(created) => Some(AgedSnapshot {
                    record,
                    created,
                    age_days: age_in_days(created, now),
                }),
                None => {
                    warn!(
                        snapshot = record.name.as_deref().unwrap_or("<unnamed>"),
                        create_date = raw,
                        "skipping snapshot with unparseable create_date"
                    );
                    None
                }
            }
        })
        .collect();
    Ok(aged)
}

/// Summarize snapshot ages and sizes.
///
/// `total`, the before-cutoff share and the largest size cover every record.
/// Average age and the oldest snapshot only cover records with a readable date.
pub fn summarize(
    records: &[SnapshotRecord],
    now: DateTime<Utc>,
    cutoff_year: i32,
) -> Result<SnapshotSummary, ReportError> {
    let aged = annotate_ages(records, now)?;
    let Some(first) = aged.first() else {
        return Err(ReportError::EmptyInput("snapshots"));
    };

    let total = records.len();
    let age_sum: i64 = aged.iter().map(|s| s.age_days).sum();
    let average_age_days = age_sum / aged.len() as i64;

    let before_cutoff_count = aged
        .iter()
        .filter(|s| s.created.year() < cutoff_year)
        .count();
    let before_cutoff_percent = (before_cutoff_count * 100 / total) as u32;

    // Strict comparisons keep the first occurrence on ties.
    let mut oldest = first;
    for snapshot in &aged[1..] {
        if snapshot.age_days > oldest.age_days {
            oldest = snapshot;
        }
    }
    let largest_size_gb = records
        .iter()
        .map(|r| r.size.unwrap_or(0.0))
        .fold(0.0f64, |largest, size| if size > largest { size } else { largest });

    Ok(SnapshotSummary {
        total,
        average_age_days,
        cutoff_year,
        before_cutoff_count,
        before_cutoff_percent,
        oldest_snapshot_date: oldest.created.date_naive(),
        oldest_snapshot_name: oldest.record.name.clone(),
        largest_size_gb,
    })
}
