use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::core::analysis::ratio::on_demand_ratio;
use crate::core::analysis::snapshots;
use crate::core::analysis::timeseries::{build_table, build_table_with_gaps};
use crate::core::analysis::volumes::{estimate_savings, VolumeFilter, UNATTACHED_SAVINGS_RATIO};
use crate::core::client::{OlapReport, RawReports};
use crate::core::config::PolicyConfig;
use crate::core::error::ReportError;
use crate::core::models::findings::{SnapshotSummary, VolumeSavings};
use crate::core::models::inventory::SnapshotRecord;
use crate::core::models::table::EntityCostTable;
use crate::core::months::{trailing_months, MonthLabel};

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationReport {
    pub customer: String,
    pub client_id: String,
    pub generated_at: DateTime<Utc>,
    pub months: [MonthLabel; 3],
    pub policy: PolicyConfig,
    pub service_costs: EntityCostTable,
    pub ec2_coverage: EntityCostTable,
    pub on_demand_ratio: EntityCostTable,
    /// Buckets with a reported cost (zero included) in the most recent month
    pub s3_buckets: EntityCostTable,
    pub s3_bucket_count: usize,
    /// `None` when the account has no active snapshots
    pub snapshots: Option<SnapshotSummary>,
    pub gp2_savings: VolumeSavings,
    pub unattached_savings: VolumeSavings,
}

/// Customer name from the first snapshot's account (`"Acme - Prod"` -> `"Acme"`).
pub fn customer_name(snapshots: &[SnapshotRecord], fallback: &str) -> String {
    snapshots
        .first()
        .and_then(SnapshotRecord::account_name)
        .and_then(|name| name.split('-').next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// Run every analysis over one fetched bundle.
pub fn analyze(
    raw: &RawReports,
    client_id: &str,
    now: DateTime<Utc>,
    policy: &PolicyConfig,
) -> Result<OptimizationReport, ReportError> {
    let months = trailing_months(now.date_naive());
    debug!(
        oldest = %months[0],
        newest = %months[2],
        "analysing trailing months"
    );

    let service_costs = build_table(
        &raw.service_costs,
        OlapReport::ServiceCosts.dimension(),
        months,
    )?;

    let ec2_coverage = build_table(
        &raw.ec2_coverage,
        OlapReport::Ec2Coverage.dimension(),
        months,
    )?
    .rounded(2);
    let on_demand_ratio = on_demand_ratio(&ec2_coverage)?;

    let s3_buckets =
        build_table_with_gaps(&raw.s3_costs, OlapReport::S3Costs.dimension(), months)?
            .retain_with_value_in_newest()
            .fill_missing(0.0);
    let s3_bucket_count = s3_buckets.len();

    let snapshots = match snapshots::summarize(&raw.snapshots, now, policy.snapshot_cutoff_year) {
        Ok(summary) => Some(summary),
        Err(ReportError::EmptyInput(_)) => {
            info!("no active snapshots with a readable create_date");
            None
        }
        Err(e) => return Err(e),
    };

    let gp2_savings = estimate_savings(
        &raw.gp2_volumes,
        VolumeFilter::AttachedUnder {
            size_threshold_gb: policy.gp2_size_threshold_gb,
        },
        policy.gp2_savings_ratio,
    )?;
    let unattached_savings = estimate_savings(
        &raw.all_volumes,
        VolumeFilter::Unattached,
        UNATTACHED_SAVINGS_RATIO,
    )?;

    Ok(OptimizationReport {
        customer: customer_name(&raw.snapshots, client_id),
        client_id: client_id.to_string(),
        generated_at: now,
        months,
        policy: policy.clone(),
        service_costs,
        ec2_coverage,
        on_demand_ratio,
        s3_buckets,
        s3_bucket_count,
        snapshots,
        gp2_savings,
        unattached_savings,
    })
}
