use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Please enter a valid API token and client ID (HTTP {status} from {endpoint})")]
    AuthOrIdentifierInvalid { status: u16, endpoint: String },

    #[error("No records to analyse: {0}")]
    EmptyInput(&'static str),

    #[error("Required row '{0}' is missing from the report")]
    MissingRow(String),

    #[error("Required field '{0}' is missing from every record")]
    MissingField(String),

    #[error("Report shape mismatch at time offset {offset}: expected {expected} rows, found {found}")]
    ShapeMismatch {
        offset: usize,
        expected: usize,
        found: usize,
    },

    #[error("Endpoint must use HTTPS, got: {0}")]
    InvalidEndpoint(String),

    #[error("HTTP {status} from {endpoint}: {body}")]
    Http {
        status: u16,
        endpoint: String,
        body: String,
    },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to decode {report} response: {source}")]
    Decode {
        report: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ReportError {
    /// Credential problems abort with one actionable message; everything else
    /// is a data or transport problem.
    pub fn is_credentials(&self) -> bool {
        matches!(self, Self::AuthOrIdentifierInvalid { .. })
    }
}
