use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{MutationError, MutationResult};
use crate::request::MutationRequest;

pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";

/// Raw settlement of a mutation call, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success_status(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait MutationTransport: Send + Sync {
    async fn submit(&self, request: &MutationRequest) -> MutationResult<TransportResponse>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTransportConfig {
    pub base_url: String,
    pub request_timeout: Option<Duration>,
}

pub struct HttpMutationTransport {
    config: HttpTransportConfig,
    client: Client,
}

impl HttpMutationTransport {
    pub fn new(config: HttpTransportConfig) -> MutationResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(MutationError::Configuration(
                "mutation base URL cannot be empty".to_owned(),
            ));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|error| {
            MutationError::Configuration(format!("failed to build HTTP client: {error}"))
        })?;

        Ok(Self { config, client })
    }

    /// Resolves a form action against the configured base URL. Absolute
    /// actions are used unchanged; an empty action posts to the base URL.
    pub fn endpoint(&self, action: &str) -> String {
        let action = action.trim();
        if action.starts_with("http://") || action.starts_with("https://") {
            return action.to_owned();
        }
        let base = self.config.base_url.trim().trim_end_matches('/');
        let suffix = action.trim_start_matches('/');
        if suffix.is_empty() {
            base.to_owned()
        } else {
            format!("{base}/{suffix}")
        }
    }
}

#[async_trait]
impl MutationTransport for HttpMutationTransport {
    async fn submit(&self, request: &MutationRequest) -> MutationResult<TransportResponse> {
        let response = self
            .client
            .post(self.endpoint(&request.form.action))
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
            .form(&request.form.fields)
            .send()
            .await
            .map_err(|error| MutationError::NetworkFailure(error.to_string()))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|error| {
            MutationError::NetworkFailure(format!("status update response read failed: {error}"))
        })?;

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpMutationTransport, HttpTransportConfig, TransportResponse};
    use crate::error::MutationError;

    fn transport(base_url: &str) -> HttpMutationTransport {
        HttpMutationTransport::new(HttpTransportConfig {
            base_url: base_url.to_owned(),
            request_timeout: None,
        })
        .expect("build transport")
    }

    #[test]
    fn relative_actions_resolve_against_base_url() {
        let transport = transport("http://127.0.0.1:5000/");

        assert_eq!(
            transport.endpoint("/update_status/3"),
            "http://127.0.0.1:5000/update_status/3"
        );
        assert_eq!(
            transport.endpoint("update_status/3"),
            "http://127.0.0.1:5000/update_status/3"
        );
        assert_eq!(transport.endpoint(""), "http://127.0.0.1:5000");
        assert_eq!(
            transport.endpoint("https://other.example/update"),
            "https://other.example/update"
        );
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let result = HttpMutationTransport::new(HttpTransportConfig {
            base_url: "  ".to_owned(),
            request_timeout: None,
        });
        assert!(matches!(result, Err(MutationError::Configuration(_))));
    }

    #[test]
    fn success_range_is_2xx() {
        let ok = |status| TransportResponse {
            status,
            body: String::new(),
        };
        assert!(ok(200).is_success_status());
        assert!(ok(299).is_success_status());
        assert!(!ok(302).is_success_status());
        assert!(!ok(500).is_success_status());
    }
}
