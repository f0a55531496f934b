//! HTTP transport for OAI-PMH requests.
//!
//! One [`Transport`] per configured repository. It builds each outgoing
//! request (query string for GET, url-encoded body for POST), layers headers
//! (built-in defaults, then constructor headers, then per-call headers) and
//! runs the send plus body read under the configured timeout and the caller's
//! cancellation token, whichever fires first.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Request;
use url::Url;

use crate::config::{ClientConfig, RequestOptions, DEFAULT_ACCEPT, USER_AGENT};
use crate::error::{OaiPmhError, Result};

/// Trait for the request executor, enabling mocking and proxying in tests
/// and by callers with non-standard HTTP needs.
#[async_trait]
pub trait HttpSend: Send + Sync {
    /// Execute one already-built request.
    async fn send(&self, request: Request) -> std::result::Result<reqwest::Response, reqwest::Error>;
}

#[async_trait]
impl HttpSend for reqwest::Client {
    async fn send(&self, request: Request) -> std::result::Result<reqwest::Response, reqwest::Error> {
        self.execute(request).await
    }
}

/// Per-repository HTTP layer.
pub(crate) struct Transport {
    base_url: Url,
    headers: HeaderMap,
    use_post: bool,
    timeout: Option<Duration>,
    client: reqwest::Client,
    send: Arc<dyn HttpSend>,
}

impl Transport {
    /// Create a transport for `base_url`.
    ///
    /// The base URL is normalized to end with `/` before parsing. A custom
    /// executor replaces the default `reqwest` client for sending only;
    /// requests are still built locally.
    pub(crate) fn new(
        base_url: &str,
        config: ClientConfig,
        send: Option<Arc<dyn HttpSend>>,
    ) -> Result<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let parsed = Url::parse(&normalized).map_err(|source| OaiPmhError::BaseUrl {
            url: base_url.to_string(),
            source,
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
        for (name, value) in &config.headers {
            headers.insert(name, value.clone());
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| OaiPmhError::Transport {
                url: normalized,
                source,
            })?;
        let send = send.unwrap_or_else(|| Arc::new(client.clone()));

        Ok(Self {
            base_url: parsed,
            headers,
            use_post: config.use_post,
            timeout: config.timeout,
            client,
            send,
        })
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue one request and return the response body.
    ///
    /// The timeout (when configured) and the caller's cancellation token
    /// (when supplied) both cover the send and the body read. Cancellation is
    /// checked first, so an already-cancelled token never touches the network.
    pub(crate) async fn fetch_text(
        &self,
        params: &[(&str, &str)],
        options: &RequestOptions,
    ) -> Result<String> {
        let request = self.build_request(params, options)?;
        let url = request.url().to_string();
        let method = request.method().clone();

        let attempt = async {
            tracing::debug!(method = %method, url = %url, "Sending request");
            let response =
                self.send
                    .send(request)
                    .await
                    .map_err(|source| OaiPmhError::Transport {
                        url: url.clone(),
                        source,
                    })?;
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|source| OaiPmhError::Transport {
                    url: url.clone(),
                    source,
                })?;
            if !status.is_success() {
                tracing::warn!(status = %status, url = %url, "Repository returned HTTP error status");
                return Err(OaiPmhError::HttpStatus {
                    url: url.clone(),
                    status,
                    body,
                });
            }
            Ok(body)
        };

        let limited = async {
            match self.timeout {
                Some(duration) => match tokio::time::timeout(duration, attempt).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(OaiPmhError::Timeout {
                        url: url.clone(),
                        method: method.clone(),
                        timeout: duration,
                    }),
                },
                None => attempt.await,
            }
        };

        match &options.cancel {
            Some(cancel) => {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => Err(OaiPmhError::Cancelled { url: url.clone() }),
                    outcome = limited => outcome,
                }
            }
            None => limited.await,
        }
    }

    /// Build one request: parameters in the query string, or in a url-encoded
    /// body when POST mode applies for this call.
    fn build_request(&self, params: &[(&str, &str)], options: &RequestOptions) -> Result<Request> {
        let use_post = options.use_post.unwrap_or(self.use_post);
        let builder = if use_post {
            self.client.post(self.base_url.clone()).form(params)
        } else {
            self.client.get(self.base_url.clone()).query(params)
        };

        let mut headers = self.headers.clone();
        for (name, value) in &options.headers {
            headers.insert(name, value.clone());
        }

        builder
            .headers(headers)
            .build()
            .map_err(|source| OaiPmhError::Transport {
                url: self.base_url.to_string(),
                source,
            })
    }
}
