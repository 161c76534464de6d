// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::HttpClient;
use podm_core::Credentials;
use podm_core::HttpFault;
use podm_core::Response;
use podm_core::TransportError;
use serde_json::Value as JsonValue;
use std::error::Error as StdError;
use std::io::ErrorKind as IoErrorKind;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Debug)]
pub enum PodmError {
    /// Connection could not be established (DNS, TLS handshake, reset).
    Connectivity(reqwest::Error),
    /// Connection refused by the pod manager host.
    ConnectionRefused(reqwest::Error),
    /// Request or connect timeout elapsed.
    Timeout(reqwest::Error),
    /// Request could not be built or the response body could not be read.
    Request(reqwest::Error),
    /// Pod manager answered with a status of 300 or above.
    Fault(HttpFault),
}

impl From<reqwest::Error> for PodmError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            Self::Timeout(value)
        } else if value.is_connect() {
            if io_error_kind(&value) == Some(IoErrorKind::ConnectionRefused) {
                Self::ConnectionRefused(value)
            } else {
                Self::Connectivity(value)
            }
        } else {
            Self::Request(value)
        }
    }
}

// reqwest hides the io error a few levels down the source chain.
fn io_error_kind(err: &reqwest::Error) -> Option<IoErrorKind> {
    let mut source = err.source();
    while let Some(inner) = source {
        if let Some(io) = inner.downcast_ref::<std::io::Error>() {
            return Some(io.kind());
        }
        source = inner.source();
    }
    None
}

impl TransportError for PodmError {
    fn fault(&self) -> Option<&HttpFault> {
        match self {
            Self::Fault(fault) => Some(fault),
            _ => None,
        }
    }

    fn is_connectivity(&self) -> bool {
        matches!(
            self,
            Self::Connectivity(_) | Self::ConnectionRefused(_) | Self::Timeout(_)
        )
    }

    fn is_connection_refused(&self) -> bool {
        matches!(self, Self::ConnectionRefused(_))
    }
}

#[allow(clippy::absolute_paths)]
impl std::fmt::Display for PodmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connectivity(e) => write!(f, "cannot connect to pod manager: {e}"),
            Self::ConnectionRefused(e) => write!(f, "pod manager refused connection: {e}"),
            Self::Timeout(e) => write!(f, "pod manager request timed out: {e}"),
            Self::Request(e) => write!(f, "HTTP client error: {e:?}"),
            Self::Fault(fault) => write!(f, "{fault}"),
        }
    }
}

#[allow(clippy::absolute_paths)]
impl std::error::Error for PodmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Connectivity(e)
            | Self::ConnectionRefused(e)
            | Self::Timeout(e)
            | Self::Request(e) => Some(e),
            Self::Fault(fault) => Some(fault),
        }
    }
}

/// Configuration parameters for the reqwest HTTP client.
///
/// # Examples
///
/// ```rust
/// use podm_http::reqwest::ClientParams;
/// use std::time::Duration;
///
/// let params = ClientParams::new()
///     .timeout(Duration::from_secs(30))
///     .accept_invalid_certs(true);
/// ```
#[derive(Debug, Clone)]
pub struct ClientParams {
    /// HTTP request timeout
    pub timeout: Option<Duration>,
    /// TCP connection timeout
    pub connect_timeout: Option<Duration>,
    /// User-Agent header value
    pub user_agent: Option<String>,
    /// Whether to accept invalid TLS certificates
    pub accept_invalid_certs: bool,
}

impl Default for ClientParams {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(5)),
            user_agent: Some("podm-adapter/v1".to_string()),
            accept_invalid_certs: false,
        }
    }
}

impl ClientParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub const fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

/// HTTP client implementation using the reqwest library.
///
/// # Examples
///
/// ```rust,no_run
/// use podm_http::reqwest::Client;
/// use podm_http::reqwest::ClientParams;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::with_params(ClientParams::new().timeout(Duration::from_secs(60)))?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    client: reqwest::Client,
}

#[allow(clippy::missing_errors_doc)]
impl Client {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_params(ClientParams::default())
    }

    pub fn with_params(params: ClientParams) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().use_rustls_tls();

        if let Some(timeout) = params.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(connect_timeout) = params.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        if let Some(user_agent) = params.user_agent {
            builder = builder.user_agent(user_agent);
        }

        if params.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Client {
    async fn handle_response(&self, response: reqwest::Response) -> Result<Response, PodmError> {
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;

        if status.as_u16() >= 300 {
            return Err(PodmError::Fault(HttpFault::from_body(status, &text)));
        }

        let body = if text.trim().is_empty() {
            None
        } else {
            match serde_json::from_str::<JsonValue>(&text) {
                Ok(v) => Some(v),
                Err(err) => {
                    debug!(%status, "pod manager response body is not JSON: {err}");
                    None
                }
            }
        };

        Ok(Response {
            status,
            headers,
            body,
        })
    }

    fn request(
        &self,
        method: reqwest::Method,
        url: Url,
        credentials: &Credentials,
    ) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth(&credentials.username, Some(credentials.password()))
    }
}

impl HttpClient for Client {
    type Error = PodmError;

    async fn get(
        &self,
        url: Url,
        credentials: &Credentials,
    ) -> Result<Response, Self::Error> {
        let response = self
            .request(reqwest::Method::GET, url, credentials)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn post(
        &self,
        url: Url,
        body: Option<&JsonValue>,
        credentials: &Credentials,
    ) -> Result<Response, Self::Error> {
        let mut request = self.request(reqwest::Method::POST, url, credentials);
        request = match body {
            Some(body) => request.json(body),
            None => request.header(http::header::CONTENT_TYPE, "application/json"),
        };
        let response = request.send().await?;
        self.handle_response(response).await
    }

    async fn delete(
        &self,
        url: Url,
        credentials: &Credentials,
    ) -> Result<Response, Self::Error> {
        let response = self
            .request(reqwest::Method::DELETE, url, credentials)
            .send()
            .await?;
        self.handle_response(response).await
    }
}
