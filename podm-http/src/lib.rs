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

//! HTTP transport for pod managers.
//!
//! [`HttpTransport`] resolves resource paths against the pod manager base
//! URL, attaches basic-auth credentials and delegates the wire exchange
//! to an [`HttpClient`]. The `reqwest` feature provides
//! [`reqwest::Client`].

#[cfg(feature = "reqwest")]
pub mod reqwest;

use podm_core::Credentials;
use podm_core::Method;
use podm_core::Request;
use podm_core::Response;
use podm_core::Transport;
use podm_core::TransportError;
use serde_json::Value as JsonValue;
use std::future::Future;
use tracing::debug;
use url::Url;

/// Wire-level HTTP client used by [`HttpTransport`].
///
/// Implementations return `Ok` only for status codes below 300 and
/// decode the body as JSON when possible.
pub trait HttpClient: Send + Sync {
    /// Connectivity failure or HTTP fault of the client.
    type Error: TransportError;

    /// Perform an HTTP GET request.
    fn get(
        &self,
        url: Url,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send;

    /// Perform an HTTP POST request. Without `body` nothing is sent.
    fn post(
        &self,
        url: Url,
        body: Option<&JsonValue>,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send;

    /// Perform an HTTP DELETE request.
    fn delete(
        &self,
        url: Url,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send;
}

/// HTTP-based pod manager transport that wraps an [`HttpClient`].
///
/// # Examples
///
/// ```rust,no_run
/// use podm_http::HttpTransport;
/// use podm_http::reqwest::Client;
/// use podm_core::Credentials;
/// use url::Url;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::new("admin".to_string(), "admin".to_string());
/// let client = Client::new()?;
/// let endpoint = Url::parse("https://10.0.0.1:8443")?;
/// let transport = HttpTransport::new(client, endpoint, credentials);
/// # Ok(())
/// # }
/// ```
pub struct HttpTransport<C: HttpClient> {
    client: C,
    endpoint: PodmEndpoint,
    credentials: Credentials,
}

impl<C: HttpClient> HttpTransport<C> {
    /// Create a new transport for the pod manager at `endpoint`.
    pub fn new(client: C, endpoint: Url, credentials: Credentials) -> Self {
        Self {
            client,
            endpoint: PodmEndpoint::from(endpoint),
            credentials,
        }
    }

    /// Base endpoint of the pod manager.
    pub const fn endpoint(&self) -> &PodmEndpoint {
        &self.endpoint
    }
}

/// Base URL of a pod manager.
///
/// Builds request URLs from resource paths.
#[derive(Debug, Clone)]
pub struct PodmEndpoint {
    base_url: Url,
}

impl PodmEndpoint {
    /// Endpoint rooted at `base_url`. Its path is replaced by resource paths.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// Full URL of a resource path.
    #[must_use]
    pub fn with_path(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url
    }
}

impl From<Url> for PodmEndpoint {
    fn from(url: Url) -> Self {
        Self::new(url)
    }
}

impl From<&PodmEndpoint> for Url {
    fn from(endpoint: &PodmEndpoint) -> Self {
        endpoint.base_url.clone()
    }
}

impl<C: HttpClient> Transport for HttpTransport<C> {
    type Error = C::Error;

    async fn send(&self, request: Request) -> Result<Response, Self::Error> {
        let url = self.endpoint.with_path(request.path.rooted().as_str());
        debug!(method = %request.method, %url, body = ?request.body, "pod manager request");
        let result = match request.method {
            Method::Get => self.client.get(url, &self.credentials).await,
            Method::Post => {
                self.client
                    .post(url, request.body.as_ref(), &self.credentials)
                    .await
            }
            Method::Delete => self.client.delete(url, &self.credentials).await,
        };
        match &result {
            Ok(response) => debug!(
                status = %response.status,
                body = ?response.body,
                "pod manager response"
            ),
            Err(err) => debug!("pod manager request failed: {err}"),
        }
        result
    }
}
