use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request to {url} failed with status {status}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },

    #[error("request to {0} timed out")]
    Timeout(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid gender '{0}'")]
    InvalidGender(String),

    #[error("item {0} not found")]
    ItemNotFound(u64),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl PortalError {
    /// Whether a later retry of the same request could succeed.
    ///
    /// Malformed bodies count as transient: the catalog is read-only, so a
    /// garbled reply is treated like a dropped connection.
    pub fn is_transient(&self) -> bool {
        match self {
            PortalError::Http(_) | PortalError::Timeout(_) | PortalError::Malformed { .. } => true,
            PortalError::Status { status, .. } => {
                status.is_server_error() || status.as_u16() == 429
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;
