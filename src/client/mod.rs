//! Service-to-service client
//!
//! Every call one service makes to another goes through [`ServiceClient`]:
//! - one explicit per-call timeout
//! - no retries ([`RetryPolicy::Never`])
//! - uniform [`ClientError`] for transport, decoding and remote rejections
//! - a log line and a metric sample per call
//!
//! Typed clients for the identity, comment and like services sit on top of
//! it, each behind a trait so callers can be tested with fakes.

mod comments;
mod identity;
mod likes;

pub use comments::{CommentSource, HttpCommentClient};
pub use identity::{HttpIdentityClient, IdentityResolver};
pub use likes::{HttpLikeClient, LikeSource};

#[cfg(test)]
pub use comments::MockCommentSource;
#[cfg(test)]
pub use identity::MockIdentityResolver;
#[cfg(test)]
pub use likes::MockLikeSource;

use std::time::{Duration, Instant};

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::api::WebResponse;
use crate::config::ServiceKind;
use crate::metrics::observe_downstream_call;

/// Failure of a single downstream call
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection failure or timeout
    #[error("{service}: transport failure (timed out: {timed_out}): {message}")]
    Transport {
        service: &'static str,
        timed_out: bool,
        message: String,
    },

    /// Body was not a valid envelope for the expected payload
    #[error("{service}: malformed response body: {source}")]
    Deserialize {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Envelope present but `data` was null
    #[error("{service}: response carried no data")]
    EmptyPayload { service: &'static str },

    /// Remote answered with a non-success status
    #[error("{service}: rejected with {status}: {message}")]
    Rejected {
        service: &'static str,
        status: u16,
        message: String,
    },
}

impl ClientError {
    pub fn service(&self) -> &'static str {
        match self {
            ClientError::Transport { service, .. }
            | ClientError::Deserialize { service, .. }
            | ClientError::EmptyPayload { service }
            | ClientError::Rejected { service, .. } => service,
        }
    }

    fn outcome(&self) -> &'static str {
        match self {
            ClientError::Transport {
                timed_out: true, ..
            } => "timeout",
            ClientError::Transport { .. } => "transport",
            ClientError::Deserialize { .. } => "deserialize",
            ClientError::EmptyPayload { .. } => "empty",
            ClientError::Rejected { .. } => "rejected",
        }
    }

    /// True when the remote rejected the call with the given status
    pub fn is_rejected_with(&self, expected: StatusCode) -> bool {
        matches!(self, ClientError::Rejected { status, .. } if *status == expected.as_u16())
    }
}

/// Retry behaviour of a client
///
/// Calls are never retried; the policy is carried so call sites do not
/// change if one is introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    #[default]
    Never,
}

/// Generic request/response stub addressed by service and path
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    service: ServiceKind,
    base_url: String,
    token_header: String,
    timeout: Duration,
    retry_policy: RetryPolicy,
}

impl ServiceClient {
    pub fn new(
        http: reqwest::Client,
        service: ServiceKind,
        base_url: impl Into<String>,
        token_header: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            service,
            base_url: base_url.trim_end_matches('/').to_string(),
            token_header: token_header.into(),
            timeout,
            retry_policy: RetryPolicy::Never,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    /// GET `path` and unwrap the envelope's `data`
    pub async fn get<T>(&self, path: &str, token: Option<&str>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        self.call(Method::GET, path, token).await
    }

    /// Issue one request and decode the envelope.
    ///
    /// The timeout covers connecting, sending and reading the whole body.
    pub async fn call<T>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let started = Instant::now();
        let result = self.call_once(method.clone(), path, token).await;
        let elapsed = started.elapsed();
        let service = self.service.as_str();

        match &result {
            Ok(_) => {
                observe_downstream_call(service, "ok", elapsed);
                tracing::debug!(
                    service,
                    %method,
                    path,
                    latency_ms = elapsed.as_millis() as u64,
                    "downstream call succeeded"
                );
            }
            Err(error) => {
                observe_downstream_call(service, error.outcome(), elapsed);
                tracing::warn!(
                    service,
                    %method,
                    path,
                    latency_ms = elapsed.as_millis() as u64,
                    outcome = error.outcome(),
                    error = %error,
                    "downstream call failed"
                );
            }
        }

        result
    }

    async fn call_once<T>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let service = self.service.as_str();
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.http.request(method, &url);
        if let Some(token) = token {
            request = request.header(self.token_header.as_str(), token);
        }

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(Ok(exchange)) => exchange,
            Ok(Err(error)) => {
                return Err(ClientError::Transport {
                    service,
                    timed_out: error.is_timeout(),
                    message: error.to_string(),
                });
            }
            Err(_) => {
                return Err(ClientError::Transport {
                    service,
                    timed_out: true,
                    message: format!("no response within {:?}", self.timeout),
                });
            }
        };

        if !status.is_success() {
            let message = serde_json::from_slice::<WebResponse<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.errors)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                });
            return Err(ClientError::Rejected {
                service,
                status: status.as_u16(),
                message,
            });
        }

        let envelope: WebResponse<T> = serde_json::from_slice(&body)
            .map_err(|source| ClientError::Deserialize { service, source })?;

        envelope.data.ok_or(ClientError::EmptyPayload { service })
    }
}
