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

//! Connection to one pod manager.

use crate::dialect::Dialect;
use podm_core::Credentials;
use podm_core::RetryPolicy;
use std::time::Duration;
use url::Url;

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything needed to reach a pod manager.
///
/// Built once and passed by value to the adapter that uses it.
#[derive(Debug, Clone)]
pub struct Connection {
    pub base_url: Url,
    pub credentials: Credentials,
    pub dialect: Dialect,
    /// Verify the server certificate. Off by default: pod managers
    /// commonly serve self-signed certificates.
    pub verify_tls: bool,
    pub retry: RetryPolicy,
    pub request_timeout: Duration,
}

impl Connection {
    #[must_use]
    pub fn new(base_url: Url, credentials: Credentials, dialect: Dialect) -> Self {
        Self {
            base_url,
            credentials,
            dialect,
            verify_tls: false,
            retry: RetryPolicy::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    #[must_use]
    pub const fn retry_count(mut self, attempts: u32) -> Self {
        self.retry.attempts = attempts;
        self
    }

    #[must_use]
    pub const fn retry_interval(mut self, interval: Duration) -> Self {
        self.retry.interval = interval;
        self
    }

    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Parameters of the reqwest client for this connection.
    #[cfg(feature = "podm-http")]
    #[must_use]
    pub fn client_params(&self) -> podm_http::reqwest::ClientParams {
        podm_http::reqwest::ClientParams::new()
            .timeout(self.request_timeout)
            .accept_invalid_certs(!self.verify_tls)
    }
}
