use tracing::{debug, warn};

use crate::core::error::ReportError;
use crate::core::models::findings::VolumeSavings;
use crate::core::models::inventory::VolumeRecord;
use crate::core::models::table::round_to;

/// Share of monthly cost saved by moving a gp2 volume to gp3.
pub const GP2_TO_GP3_SAVINGS_RATIO: f64 = 0.2;
/// Deleting an unattached volume saves its full cost.
pub const UNATTACHED_SAVINGS_RATIO: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VolumeFilter {
    /// Attached volumes strictly smaller than the threshold.
    AttachedUnder { size_threshold_gb: f64 },
    /// Volumes not attached to any instance.
    Unattached,
}

impl VolumeFilter {
    fn matches(&self, in_use: bool, size_gb: f64) -> bool {
        match self {
            Self::AttachedUnder { size_threshold_gb } => in_use && size_gb < *size_threshold_gb,
            Self::Unattached => !in_use,
        }
    }
}

fn require_field(
    volumes: &[VolumeRecord],
    field: &str,
    present: impl Fn(&VolumeRecord) -> bool,
) -> Result<(), ReportError> {
    if !volumes.is_empty() && !volumes.iter().any(present) {
        return Err(ReportError::MissingField(field.to_string()));
    }
    Ok(())
}

/// Count matching volumes, total their monthly cost and apply `savings_ratio`.
///
/// Records missing `in_use` or `size` are skipped. A matching record with an
/// unparseable price still counts toward `count` and the largest size, but adds
/// nothing to the cost total. `MissingField` is only raised when no record
/// carries the field.
pub fn estimate_savings(
    volumes: &[VolumeRecord],
    filter: VolumeFilter,
    savings_ratio: f64,
) -> Result<VolumeSavings, ReportError> {
    require_field(volumes, "in_use", |v| v.in_use.is_some())?;
    require_field(volumes, "size", |v| v.size.is_some())?;
    require_field(volumes, "price_per_month", |v| v.price_per_month.is_some())?;

    let mut count = 0usize;
    let mut total_monthly_cost = 0.0;
    let mut largest_size_gb = 0.0f64;

    for volume in volumes {
        let (Some(in_use), Some(size)) = (volume.in_use, volume.size) else {
            debug!(
                volume = volume.name.as_deref().unwrap_or("<unnamed>"),
                "volume missing in_use or size"
            );
            continue;
        };
        if !filter.matches(in_use, size) {
            continue;
        }
        count += 1;
        if size > largest_size_gb {
            largest_size_gb = size;
        }
        match volume.monthly_price() {
            Some(price) => total_monthly_cost += price,
            None => warn!(
                volume = volume.name.as_deref().unwrap_or("<unnamed>"),
                price = ?volume.price_per_month,
                "leaving volume with unparseable price_per_month out of the cost total"
            ),
        }
    }

    Ok(VolumeSavings {
        count,
        total_monthly_cost: round_to(total_monthly_cost, 2),
        savings_estimate: round_to(total_monthly_cost * savings_ratio, 2),
        largest_size_gb,
    })
}
