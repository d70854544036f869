use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::core::error::ReportError;
use crate::core::models::inventory::{SnapshotRecord, VolumeRecord};
use crate::core::models::report::DimensionBucketedReport;

pub const DEFAULT_BASE_URL: &str = "https://chapi.cloudhealthtech.com";

const SEARCH_PATH: &str = "api/search";
const SNAPSHOT_FIELDS: &str = "name,size,create_date,account.name";
const VOLUME_FIELDS: &str = "volume_type,size,name,price_per_month,in_use,account.name";

/// The time-bucketed OLAP reports the optimization report is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OlapReport {
    ServiceCosts,
    Ec2Coverage,
    S3Costs,
}

impl OlapReport {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ServiceCosts => "service cost history",
            Self::Ec2Coverage => "EC2 coverage",
            Self::S3Costs => "S3 bucket costs",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::ServiceCosts => "olap_reports/cost/history",
            Self::Ec2Coverage => "olap_reports/usage/instance",
            Self::S3Costs => "olap_reports/cost/s3",
        }
    }

    /// The row dimension; the column dimension is always `time`.
    pub fn dimension(&self) -> &'static str {
        match self {
            Self::ServiceCosts => "AWS-Service-Category",
            Self::Ec2Coverage => "AWS-Coverage-Type",
            Self::S3Costs => "S3-Bucket",
        }
    }

    fn measure(&self) -> (&'static str, &'static str) {
        match self {
            Self::ServiceCosts => ("measure[]", "cost"),
            Self::Ec2Coverage => ("measures[]", "nf_instances"),
            Self::S3Costs => ("measure[]", "s3_cost_storage"),
        }
    }

    fn time_filter(&self) -> &'static str {
        match self {
            Self::ServiceCosts | Self::Ec2Coverage => "time:select:-2,-3,-4",
            Self::S3Costs => "time:select:-1,-2,-3",
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let (measure_key, measure) = self.measure();
        let mut params = vec![
            ("dimensions[]", "time".to_string()),
            ("dimensions[]", self.dimension().to_string()),
            (measure_key, measure.to_string()),
            ("interval", "monthly".to_string()),
            ("filters[]", self.time_filter().to_string()),
        ];
        if matches!(self, Self::Ec2Coverage) {
            params.push(("query", "is_active=1".to_string()));
        }
        params
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeScope {
    Gp2Only,
    All,
}

impl VolumeScope {
    fn query(&self) -> &'static str {
        match self {
            Self::Gp2Only => "volume_type='gp2' and is_active=1",
            Self::All => "is_active=1",
        }
    }
}

/// Everything one report run needs, fetched in a single pass.
#[derive(Debug, Clone, Default)]
pub struct RawReports {
    pub snapshots: Vec<SnapshotRecord>,
    pub service_costs: DimensionBucketedReport,
    pub ec2_coverage: DimensionBucketedReport,
    pub s3_costs: DimensionBucketedReport,
    pub gp2_volumes: Vec<VolumeRecord>,
    pub all_volumes: Vec<VolumeRecord>,
}

/// Validate that a resolved endpoint URL uses HTTPS.
///
/// Checked before any request so the API token never leaves over plain HTTP.
pub fn validate_endpoint(url: &str) -> Result<(), ReportError> {
    if !url.starts_with("https://") {
        return Err(ReportError::InvalidEndpoint(url.to_string()));
    }
    Ok(())
}

/// Map a non-success HTTP status to the error taxonomy.
///
/// Bad tokens and unknown client ids surface as 401/403/404/422 depending on the endpoint.
fn classify_status(status: u16, endpoint: &str, body: String) -> ReportError {
    match status {
        401 | 403 | 404 | 422 => ReportError::AuthOrIdentifierInvalid {
            status,
            endpoint: endpoint.to_string(),
        },
        _ => ReportError::Http {
            status,
            endpoint: endpoint.to_string(),
            body,
        },
    }
}

pub struct CloudHealthClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    client_id: String,
}

impl CloudHealthClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        client_id: &str,
        timeout: Duration,
    ) -> Result<Self, ReportError> {
        validate_endpoint(base_url)?;
        Self::unchecked(base_url, api_key, client_id, timeout)
    }

    fn unchecked(
        base_url: &str,
        api_key: &str,
        client_id: &str,
        timeout: Duration,
    ) -> Result<Self, ReportError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client_id: client_id.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        report: &'static str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ReportError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(report, %url, "fetching");

        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .query(&[("api_version", "2"), ("client_api_id", self.client_id.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), path, body));
        }

        let body = response.text().await?;
        debug!(report, bytes = body.len(), "received");
        serde_json::from_str(&body).map_err(|source| ReportError::Decode { report, source })
    }

    /// Cheap unfiltered request that fails fast on a bad token or client id.
    pub async fn verify_credentials(&self) -> Result<(), ReportError> {
        let params = [
            ("dimensions[]", "time".to_string()),
            ("dimensions[]", OlapReport::ServiceCosts.dimension().to_string()),
            ("measure[]", "cost".to_string()),
            ("interval", "monthly".to_string()),
        ];
        self.get_json::<serde_json::Value>(
            "credential check",
            OlapReport::ServiceCosts.path(),
            &params,
        )
        .await
        .map(|_| ())
    }

    pub async fn snapshots(&self) -> Result<Vec<SnapshotRecord>, ReportError> {
        let params = [
            ("name", "AwsSnapshot".to_string()),
            ("query", "is_active=1".to_string()),
            ("fields", SNAPSHOT_FIELDS.to_string()),
        ];
        self.get_json("snapshot inventory", SEARCH_PATH, &params).await
    }

    pub async fn olap(&self, report: OlapReport) -> Result<DimensionBucketedReport, ReportError> {
        self.get_json(report.name(), report.path(), &report.params())
            .await
    }

    pub async fn volumes(&self, scope: VolumeScope) -> Result<Vec<VolumeRecord>, ReportError> {
        let params = [
            ("name", "AwsVolume".to_string()),
            ("query", scope.query().to_string()),
            ("fields", VOLUME_FIELDS.to_string()),
        ];
        self.get_json("volume inventory", SEARCH_PATH, &params).await
    }

    /// Fetch every report one after another; the first failure aborts the run.
    pub async fn fetch_all(&self) -> Result<RawReports, ReportError> {
        self.verify_credentials().await?;
        Ok(RawReports {
            snapshots: self.snapshots().await?,
            service_costs: self.olap(OlapReport::ServiceCosts).await?,
            ec2_coverage: self.olap(OlapReport::Ec2Coverage).await?,
            s3_costs: self.olap(OlapReport::S3Costs).await?,
            gp2_volumes: self.volumes(VolumeScope::Gp2Only).await?,
            all_volumes: self.volumes(VolumeScope::All).await?,
        })
    }
}
