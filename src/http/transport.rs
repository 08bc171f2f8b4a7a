use futures_util::StreamExt;
use reqwest::{
    Client, Url,
    header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};

use crate::error::{HttpError, TransportError};
use crate::rpc::Synthesized;

pub const FAST_TRACK_HEADER: &str = "x-fast-track";

/// Status and body of one response; nothing else is inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub priority_header: String,
    pub extra_headers: Vec<(String, String)>,
    pub max_response_bytes: u64,
}

/// Sends synthesized bundles as JSON POSTs to one endpoint.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    url: Url,
    headers: HeaderMap,
    priority_header: HeaderName,
    max_response_bytes: u64,
}

impl Transport {
    /// # Errors
    ///
    /// Returns an error when a configured header name or value is invalid.
    pub fn new(client: Client, url: Url, options: TransportOptions) -> Result<Self, HttpError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (key, value) in &options.extra_headers {
            let name = parse_header_name(key)?;
            let val = HeaderValue::from_str(value).map_err(|err| {
                HttpError::InvalidHeaderValue {
                    header: key.clone(),
                    source: err,
                }
            })?;
            headers.insert(name, val);
        }
        let priority_header = parse_header_name(&options.priority_header)?;

        Ok(Self {
            client,
            url,
            headers,
            priority_header,
            max_response_bytes: options.max_response_bytes,
        })
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// POSTs one request and reads the full response body.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on connection failures, timeouts, body read
    /// failures, or bodies larger than the configured limit. Non-2xx statuses
    /// are not errors.
    pub async fn send(&self, synthesized: &Synthesized<'_>) -> Result<RawResponse, TransportError> {
        let body = synthesized
            .request
            .to_body()
            .map_err(|err| TransportError::Encode { source: err })?;

        let mut request = self
            .client
            .post(self.url.clone())
            .headers(self.headers.clone())
            .header(
                self.priority_header.clone(),
                HeaderValue::from_static(synthesized.priority.header_value()),
            );
        if synthesized.fast_track {
            request = request.header(FAST_TRACK_HEADER, HeaderValue::from_static("true"));
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(TransportError::from_send)?;
        let status = response.status().as_u16();
        let body = read_body_capped(response, self.max_response_bytes).await?;
        Ok(RawResponse { status, body })
    }
}

fn parse_header_name(key: &str) -> Result<HeaderName, HttpError> {
    HeaderName::from_bytes(key.as_bytes()).map_err(|err| HttpError::InvalidHeaderName {
        header: key.to_owned(),
        source: err,
    })
}

async fn read_body_capped(
    response: reqwest::Response,
    limit: u64,
) -> Result<Vec<u8>, TransportError> {
    let mut stream = response.bytes_stream();
    let mut body = Vec::new();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk.map_err(TransportError::from_body)?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
        if total_bytes > limit {
            return Err(TransportError::BodyTooLarge { limit });
        }
        body.extend_from_slice(&bytes);
    }
    Ok(body)
}
