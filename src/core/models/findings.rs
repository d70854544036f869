use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub total: usize,
    pub average_age_days: i64,
    pub cutoff_year: i32,
    /// Snapshots created before `cutoff_year`
    pub before_cutoff_count: usize,
    pub before_cutoff_percent: u32,
    pub oldest_snapshot_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_snapshot_name: Option<String>,
    pub largest_size_gb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSavings {
    /// Volumes matching the savings predicate
    pub count: usize,
    /// Sum of monthly prices of the matching volumes (dollars)
    pub total_monthly_cost: f64,
    /// Estimated monthly savings (dollars)
    pub savings_estimate: f64,
    pub largest_size_gb: f64,
}
