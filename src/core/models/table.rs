use serde::Serialize;

use crate::core::months::MonthLabel;

pub const MONTHLY_CHANGE: &str = "Monthly % Change";

/// Round half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Month-over-month change in percent. `None` when `middle` is zero or either
/// side is undefined.
pub fn percent_change(middle: Option<f64>, newest: Option<f64>) -> Option<f64> {
    let (middle, newest) = (middle?, newest?);
    if middle == 0.0 {
        return None;
    }
    let change = (newest - middle) / middle * 100.0;
    change.is_finite().then_some(change)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub label: String,
    /// Oldest, middle, newest month.
    pub values: [Option<f64>; 3],
    pub monthly_change: Option<f64>,
}

impl TableRow {
    pub fn new(label: impl Into<String>, values: [Option<f64>; 3]) -> Self {
        Self {
            label: label.into(),
            monthly_change: percent_change(values[1], values[2]),
            values,
        }
    }

    pub fn newest(&self) -> Option<f64> {
        self.values[2]
    }
}

/// Rows of entities against the three trailing months plus a derived change column.
///
/// Labels are an ordinary column, not a key: duplicates are kept as separate rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityCostTable {
    pub months: [MonthLabel; 3],
    pub rows: Vec<TableRow>,
}

impl EntityCostTable {
    pub fn new(months: [MonthLabel; 3], rows: Vec<TableRow>) -> Self {
        Self { months, rows }
    }

    /// Column headers: the three months then the change column.
    pub fn columns(&self) -> Vec<String> {
        let mut cols: Vec<String> = self.months.iter().map(|m| m.to_string()).collect();
        cols.push(MONTHLY_CHANGE.to_string());
        cols
    }

    /// First row whose label matches exactly.
    pub fn row(&self, label: &str) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Round month values, then recompute and round the change column.
    pub fn rounded(mut self, places: u32) -> Self {
        for row in &mut self.rows {
            for v in row.values.iter_mut() {
                *v = v.map(|x| round_to(x, places));
            }
            row.monthly_change =
                percent_change(row.values[1], row.values[2]).map(|c| round_to(c, places));
        }
        self
    }

    /// Keep only rows that carry a value in the most recent month. Zero counts.
    pub fn retain_with_value_in_newest(mut self) -> Self {
        self.rows.retain(|r| r.newest().is_some());
        self
    }

    /// Replace missing month values with `fill` and recompute the change column.
    pub fn fill_missing(mut self, fill: f64) -> Self {
        for row in &mut self.rows {
            for v in row.values.iter_mut() {
                v.get_or_insert(fill);
            }
            row.monthly_change = percent_change(row.values[1], row.values[2]);
        }
        self
    }
}
