use reqwest::{Client, Url};
use tracing::error;

use crate::args::{DEFAULT_USER_AGENT, TesterArgs};
use crate::error::{AppError, AppResult, HttpError, ValidationError};

/// Builds the shared HTTP client. Every worker clones it; clones share one
/// connection pool.
///
/// # Errors
///
/// Returns an error when reqwest rejects the client configuration.
pub fn build_client(args: &TesterArgs) -> AppResult<Client> {
    let mut client_builder = Client::builder()
        .timeout(args.request_timeout)
        .connect_timeout(args.connect_timeout);

    if !args.no_ua {
        client_builder = client_builder.user_agent(DEFAULT_USER_AGENT);
    }

    if args.disable_keepalive {
        client_builder = client_builder
            .pool_max_idle_per_host(0)
            .pool_idle_timeout(Some(std::time::Duration::from_secs(0)));
    }

    if args.insecure {
        client_builder = client_builder
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true);
    }

    client_builder.build().map_err(|err| {
        error!("Failed to build HTTP client: {}", err);
        AppError::http(HttpError::BuildClientFailed { source: err })
    })
}

/// Parses the endpoint URL and rejects non-HTTP schemes.
///
/// # Errors
///
/// Returns an error when the URL is missing, malformed, or not http(s).
pub fn parse_target_url(url: Option<&str>) -> AppResult<Url> {
    let raw = url.ok_or_else(|| AppError::validation(ValidationError::MissingUrl))?;
    let parsed = Url::parse(raw).map_err(|err| {
        AppError::http(HttpError::InvalidUrl {
            url: raw.to_owned(),
            source: err,
        })
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(AppError::http(HttpError::UnsupportedScheme {
            scheme: other.to_owned(),
        })),
    }
}
