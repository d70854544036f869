use tracing::debug;

use crate::core::error::ReportError;
use crate::core::models::report::{cell_value, DimensionBucketedReport};
use crate::core::models::table::{EntityCostTable, TableRow};
use crate::core::months::MonthLabel;

/// Indices into `data` for three-months-ago, two-months-ago and last month.
///
/// Fixed by the OLAP report API's time ordering; change here if the API does.
pub const TIME_OFFSETS: [usize; 3] = [10, 11, 12];

/// Build a row-per-entity table for the trailing three months.
///
/// Non-numeric cells become 0.0. A month column whose length differs from the
/// label list is rejected with `ShapeMismatch` rather than padded or truncated.
pub fn build_table(
    report: &DimensionBucketedReport,
    dimension: &str,
    months: [MonthLabel; 3],
) -> Result<EntityCostTable, ReportError> {
    Ok(build_table_with_gaps(report, dimension, months)?.fill_missing(0.0))
}

/// Like [`build_table`], but non-numeric cells stay `None` so callers can tell
/// an absent value from a real zero.
pub fn build_table_with_gaps(
    report: &DimensionBucketedReport,
    dimension: &str,
    months: [MonthLabel; 3],
) -> Result<EntityCostTable, ReportError> {
    let labels = report
        .labels(dimension)
        .ok_or_else(|| ReportError::MissingField(format!("dimensions.{}", dimension)))?;

    let mut columns: Vec<Vec<Option<f64>>> = Vec::with_capacity(TIME_OFFSETS.len());
    for offset in TIME_OFFSETS {
        let column = report.column(offset).ok_or(ReportError::ShapeMismatch {
            offset,
            expected: labels.len(),
            found: 0,
        })?;
        if column.len() != labels.len() {
            return Err(ReportError::ShapeMismatch {
                offset,
                expected: labels.len(),
                found: column.len(),
            });
        }
        columns.push(column.iter().map(cell_value).collect());
    }

    let rows: Vec<TableRow> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            TableRow::new(
                *label,
                [columns[0][i], columns[1][i], columns[2][i]],
            )
        })
        .collect();

    debug!(dimension, rows = rows.len(), "built time-series table");
    Ok(EntityCostTable::new(months, rows))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::{json, Value};

    pub(crate) fn months() -> [MonthLabel; 3] {
        [
            MonthLabel { year: 2024, month: 5 },
            MonthLabel { year: 2024, month: 6 },
            MonthLabel { year: 2024, month: 7 },
        ]
    }

    /// A report whose offsets 10..=12 hold `columns`; earlier offsets are filler.
    pub(crate) fn make_report(
        dimension: &str,
        labels: &[&str],
        columns: [Vec<Value>; 3],
    ) -> DimensionBucketedReport {
        let members: Vec<Value> = labels
            .iter()
            .map(|l| json!({ "name": l.to_lowercase(), "label": l }))
            .collect();
        let filler: Vec<Value> = labels.iter().map(|_| json!([999.0])).collect();
        let mut data: Vec<Value> = (0..TIME_OFFSETS[0]).map(|_| json!(filler)).collect();
        for column in columns {
            data.push(Value::Array(column));
        }
        let mut entities = serde_json::Map::new();
        entities.insert(dimension.to_string(), Value::Array(members));
        serde_json::from_value(json!({
            "dimensions": [ { "time": [] }, entities ],
            "data": data
        }))
        .unwrap()
    }

    #[test]
    fn one_row_per_label_and_four_columns() {
        let report = make_report(
            "AWS-Service-Category",
            &["EC2 - Direct", "S3", "RDS"],
            [
                vec![json!([10.0]), json!([20.0]), json!([30.0])],
                vec![json!([11.0]), json!([21.0]), json!([31.0])],
                vec![json!([12.0]), json!([22.0]), json!([32.0])],
            ],
        );
        let table = build_table(&report, "AWS-Service-Category", months()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.columns().len(), 4);
        let labels: Vec<&str> = table.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["EC2 - Direct", "S3", "RDS"]);
        assert_eq!(table.rows[1].values, [Some(20.0), Some(21.0), Some(22.0)]);
    }

    #[test]
    fn reads_offsets_ten_to_twelve_not_filler() {
        let report = make_report(
            "S3-Bucket",
            &["logs"],
            [vec![json!([1.0])], vec![json!([2.0])], vec![json!([3.0])]],
        );
        let table = build_table(&report, "S3-Bucket", months()).unwrap();
        assert_eq!(table.rows[0].values, [Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn monthly_change_matches_formula() {
        let report = make_report(
            "AWS-Service-Category",
            &["EC2", "Zero"],
            [
                vec![json!([50.0]), json!([5.0])],
                vec![json!([200.0]), json!([0.0])],
                vec![json!([250.0]), json!([7.0])],
            ],
        );
        let table = build_table(&report, "AWS-Service-Category", months()).unwrap();
        let change = table.rows[0].monthly_change.unwrap();
        assert!((change - 25.0).abs() < 1e-10);
        assert_eq!(table.rows[1].monthly_change, None);
    }

    #[test]
    fn non_numeric_cells_default_to_zero() {
        let report = make_report(
            "S3-Bucket",
            &["a", "b"],
            [
                vec![json!([null]), json!([""])],
                vec![json!(["oops"]), json!([4.0])],
                vec![json!([]), json!(["6.5"])],
            ],
        );
        let table = build_table(&report, "S3-Bucket", months()).unwrap();
        assert_eq!(table.rows[0].values, [Some(0.0), Some(0.0), Some(0.0)]);
        assert_eq!(table.rows[1].values, [Some(0.0), Some(4.0), Some(6.5)]);
    }

    #[test]
    fn gaps_are_kept_apart_from_zero() {
        let report = make_report(
            "S3-Bucket",
            &["zero", "null", "paid"],
            [
                vec![json!([1.0]), json!([1.0]), json!([1.0])],
                vec![json!([1.0]), json!([null]), json!([1.0])],
                vec![json!([0.0]), json!([null]), json!([2.0])],
            ],
        );
        let table = build_table_with_gaps(&report, "S3-Bucket", months()).unwrap();
        assert_eq!(table.rows[0].values[2], Some(0.0));
        assert_eq!(table.rows[1].values, [Some(1.0), None, None]);
        assert_eq!(table.rows[1].monthly_change, None);
    }

    #[test]
    fn ragged_column_is_shape_mismatch() {
        let report = make_report(
            "S3-Bucket",
            &["a", "b"],
            [
                vec![json!([1.0]), json!([1.0])],
                vec![json!([1.0])],
                vec![json!([1.0]), json!([1.0])],
            ],
        );
        let err = build_table(&report, "S3-Bucket", months()).unwrap_err();
        match err {
            ReportError::ShapeMismatch {
                offset,
                expected,
                found,
            } => {
                assert_eq!(offset, 11);
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_time_axis_is_shape_mismatch() {
        let mut report = make_report(
            "S3-Bucket",
            &["a"],
            [vec![json!([1.0])], vec![json!([1.0])], vec![json!([1.0])]],
        );
        report.data.truncate(12);
        let err = build_table(&report, "S3-Bucket", months()).unwrap_err();
        assert!(matches!(err, ReportError::ShapeMismatch { offset: 12, .. }));
    }

    #[test]
    fn missing_dimension_is_missing_field() {
        let report = make_report(
            "S3-Bucket",
            &["a"],
            [vec![json!([1.0])], vec![json!([1.0])], vec![json!([1.0])]],
        );
        let err = build_table(&report, "AWS-Service-Category", months()).unwrap_err();
        assert!(matches!(err, ReportError::MissingField(f) if f.contains("AWS-Service-Category")));
    }

    #[test]
    fn building_twice_is_identical() {
        let report = make_report(
            "S3-Bucket",
            &["a", "b"],
            [
                vec![json!([1.0]), json!([2.0])],
                vec![json!([3.0]), json!([4.0])],
                vec![json!([5.0]), json!([6.0])],
            ],
        );
        let first = build_table(&report, "S3-Bucket", months()).unwrap();
        let second = build_table(&report, "S3-Bucket", months()).unwrap();
        assert_eq!(first, second);
    }
}
