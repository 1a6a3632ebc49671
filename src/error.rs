use thiserror::Error;

/// Errors raised while deciding the next release.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("{0}")]
    ConfigurationMissing(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Invalid version '{0}': expected major.minor.patch")]
    InvalidVersion(String),

    #[error("Comparison query failed: {0}")]
    RemoteQuery(String),

    #[error("Failed to write outputs: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    pub fn missing_input(name: &str) -> Self {
        Self::ConfigurationMissing(format!("Input required and not supplied: {}", name))
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn remote(msg: impl Into<String>) -> Self {
        Self::RemoteQuery(msg.into())
    }
}

impl From<reqwest::Error> for ReleaseError {
    fn from(err: reqwest::Error) -> Self {
        Self::RemoteQuery(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for ReleaseError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidArgument(format!("Invalid header value: {}", err))
    }
}
