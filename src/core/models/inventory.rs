use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// An active EBS snapshot from the asset search API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotRecord {
    #[serde(default)]
    pub name: Option<String>,
    /// Size in GB
    #[serde(default)]
    pub size: Option<f64>,
    /// UTC timestamp, e.g. `2022-03-01T12:00:00Z`
    #[serde(default)]
    pub create_date: Option<String>,
    #[serde(default)]
    pub account: Option<AccountRef>,
}

impl SnapshotRecord {
    pub fn account_name(&self) -> Option<&str> {
        self.account.as_ref()?.name.as_deref()
    }
}

/// An active EBS volume from the asset search API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VolumeRecord {
    #[serde(default)]
    pub volume_type: Option<String>,
    /// Size in GB
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
    /// Usually a currency string like `"$1,234.50"`, occasionally a bare number.
    #[serde(default)]
    pub price_per_month: Option<Value>,
    #[serde(default)]
    pub in_use: Option<bool>,
    #[serde(default)]
    pub account: Option<AccountRef>,
}

impl VolumeRecord {
    /// Parsed monthly price, or `None` if absent or malformed.
    pub fn monthly_price(&self) -> Option<f64> {
        match self.price_per_month.as_ref()? {
            Value::String(s) => parse_currency(s),
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

/// Parse `"$1,234.50"` style amounts: strips a leading currency symbol and
/// thousands separators.
pub fn parse_currency(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let unsigned = trimmed.trim_start_matches(|c: char| {
        !(c.is_ascii_digit() || c == '-' || c == '.')
    });
    if unsigned.is_empty() {
        return None;
    }
    let cleaned: String = unsigned.chars().filter(|&c| c != ',').collect();
    cleaned.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
