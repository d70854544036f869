use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// One member of a report dimension (a service category, bucket, coverage type, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct DimensionMember {
    #[serde(default)]
    pub label: String,
}

/// An OLAP report: per-dimension member lists plus `data[time][row]` cells.
///
/// Each cell is normally a one-element measure array such as `[12.5]` or `[null]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DimensionBucketedReport {
    #[serde(default)]
    pub dimensions: Vec<HashMap<String, Vec<DimensionMember>>>,
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
}

impl DimensionBucketedReport {
    /// Row labels for `dimension`, in source order.
    pub fn labels(&self, dimension: &str) -> Option<Vec<&str>> {
        self.dimensions
            .iter()
            .find_map(|d| d.get(dimension))
            .map(|members| members.iter().map(|m| m.label.as_str()).collect())
    }

    pub fn column(&self, time_offset: usize) -> Option<&[Value]> {
        self.data.get(time_offset).map(Vec::as_slice)
    }
}

/// Read a numeric measure out of a report cell.
///
/// Unwraps measure arrays to their first element and accepts numeric strings.
/// Nulls, empty strings and anything else non-numeric yield `None`.
pub fn cell_value(cell: &Value) -> Option<f64> {
    match cell {
        Value::Array(measures) => measures.first().and_then(cell_value),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}
