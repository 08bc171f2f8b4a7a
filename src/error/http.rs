use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unsupported URL scheme '{scheme}'. Use http or https.")]
    UnsupportedScheme { scheme: String },
    #[error("Invalid header name '{header}': {source}")]
    InvalidHeaderName {
        header: String,
        #[source]
        source: reqwest::header::InvalidHeaderName,
    },
    #[error("Invalid header value for '{header}': {source}")]
    InvalidHeaderValue {
        header: String,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
}

/// Per-request network failure. Recorded as a failed iteration, never retried.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timed out: {source}")]
    Timeout {
        #[source]
        source: reqwest::Error,
    },
    #[error("Connection failed: {source}")]
    Connect {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read response body: {source}")]
    Body {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to encode request body: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
    #[error("Response body exceeded {limit} bytes.")]
    BodyTooLarge { limit: u64 },
    #[error("Request failed: {source}")]
    Request {
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    pub(crate) fn from_send(source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { source }
        } else if source.is_connect() {
            Self::Connect { source }
        } else {
            Self::Request { source }
        }
    }

    pub(crate) fn from_body(source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { source }
        } else {
            Self::Body { source }
        }
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
