use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to a third-party service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Failed to send request to {service}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} request failed with status {status}: {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to parse {service} JSON")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} returned an empty response")]
    EmptyResponse(&'static str),
}

impl UpstreamError {
    pub fn service(&self) -> &'static str {
        match self {
            Self::Request { service, .. }
            | Self::Status { service, .. }
            | Self::Decode { service, .. } => *service,
            Self::EmptyResponse(service) => *service,
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
