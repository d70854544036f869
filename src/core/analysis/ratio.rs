use crate::core::error::ReportError;
use crate::core::models::table::{EntityCostTable, TableRow};

pub const ON_DEMAND_ROW: &str = "On Demand";
pub const TOTAL_ROW: &str = "Total";
pub const RATIO_ROW: &str = "On Demand %";

fn ratio_percent(part: Option<f64>, whole: Option<f64>) -> Option<f64> {
    let (part, whole) = (part?, whole?);
    if whole == 0.0 {
        return None;
    }
    Some(part / whole * 100.0)
}

/// Single-row table of On Demand / Total × 100 per month, rounded to 2 places,
/// with its own change column.
pub fn on_demand_ratio(coverage: &EntityCostTable) -> Result<EntityCostTable, ReportError> {
    let on_demand = coverage
        .row(ON_DEMAND_ROW)
        .ok_or_else(|| ReportError::MissingRow(ON_DEMAND_ROW.to_string()))?;
    let total = coverage
        .row(TOTAL_ROW)
        .ok_or_else(|| ReportError::MissingRow(TOTAL_ROW.to_string()))?;

    let values = std::array::from_fn(|i| ratio_percent(on_demand.values[i], total.values[i]));
    let row = TableRow::new(RATIO_ROW, values);

    Ok(EntityCostTable::new(coverage.months, vec![row]).rounded(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analysis::timeseries::tests::months;

    fn coverage(rows: Vec<TableRow>) -> EntityCostTable {
        EntityCostTable::new(months(), rows)
    }

    #[test]
    fn ratio_of_fifty_over_two_hundred_is_twenty_five() {
        let table = coverage(vec![
            TableRow::new("Reserved", [Some(150.0), Some(150.0), Some(150.0)]),
            TableRow::new(ON_DEMAND_ROW, [Some(50.0), Some(60.0), Some(30.0)]),
            TableRow::new(TOTAL_ROW, [Some(200.0), Some(200.0), Some(200.0)]),
        ]);
        let ratio = on_demand_ratio(&table).unwrap();
        assert_eq!(ratio.len(), 1);
        assert_eq!(ratio.columns().len(), 4);
        let row = &ratio.rows[0];
        assert_eq!(row.label, RATIO_ROW);
        assert_eq!(row.values, [Some(25.0), Some(30.0), Some(15.0)]);
        assert_eq!(row.monthly_change, Some(-50.0));
    }

    #[test]
    fn ratio_is_rounded_to_two_places() {
        let table = coverage(vec![
            TableRow::new(ON_DEMAND_ROW, [Some(1.0), Some(2.0), Some(1.0)]),
            TableRow::new(TOTAL_ROW, [Some(3.0), Some(3.0), Some(3.0)]),
        ]);
        let row = on_demand_ratio(&table).unwrap().rows.remove(0);
        assert_eq!(row.values, [Some(33.33), Some(66.67), Some(33.33)]);
        assert_eq!(row.monthly_change, Some(-50.01));
    }

    #[test]
    fn zero_total_is_undefined_not_a_fault() {
        let table = coverage(vec![
            TableRow::new(ON_DEMAND_ROW, [Some(0.0), Some(0.0), Some(5.0)]),
            TableRow::new(TOTAL_ROW, [Some(0.0), Some(0.0), Some(10.0)]),
        ]);
        let row = on_demand_ratio(&table).unwrap().rows.remove(0);
        assert_eq!(row.values, [None, None, Some(50.0)]);
        assert_eq!(row.monthly_change, None);
    }

    #[test]
    fn missing_on_demand_row() {
        let table = coverage(vec![TableRow::new(TOTAL_ROW, [Some(1.0); 3])]);
        let err = on_demand_ratio(&table).unwrap_err();
        assert!(matches!(err, ReportError::MissingRow(label) if label == "On Demand"));
    }

    #[test]
    fn missing_total_row_is_case_sensitive() {
        let table = coverage(vec![
            TableRow::new(ON_DEMAND_ROW, [Some(1.0); 3]),
            TableRow::new("total", [Some(1.0); 3]),
        ]);
        let err = on_demand_ratio(&table).unwrap_err();
        assert!(matches!(err, ReportError::MissingRow(label) if label == "Total"));
    }
}
