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

//! Bounded retry of transient transport failures.
//!
//! [`RetryTransport`] wraps any [`Transport`] and repeats a GET that
//! failed with a transient error (see [`TransportError::is_transient`])
//! up to [`RetryPolicy::attempts`] times in total, sleeping
//! [`RetryPolicy::interval`] between attempts. Other errors, including
//! timeouts and 4xx faults other than 409, are returned immediately.
//! POST and DELETE are sent once: a lost response may hide an accepted
//! allocation or reset.

use crate::fault::TransportError;
use crate::transport::Method;
use crate::transport::Request;
use crate::transport::Response;
use crate::transport::Transport;
use std::future::Future;
use std::time::Duration;
use tracing::error;
use tracing::warn;

/// Retry bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub attempts: u32,
    /// Delay between attempts.
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 60,
            interval: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// `attempts` in total (the first one included), `interval` apart.
    /// Zero attempts still send once.
    #[must_use]
    pub const fn new(attempts: u32, interval: Duration) -> Self {
        Self { attempts, interval }
    }

    /// Single attempt, no retry.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

/// Source of delays between attempts.
pub trait Sleeper: Send + Sync {
    /// Suspend the calling task for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeper backed by the tokio timer.
#[cfg(feature = "tokio")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[cfg(feature = "tokio")]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Transport that retries transient GET failures of the inner transport.
pub struct RetryTransport<T, S> {
    inner: T,
    policy: RetryPolicy,
    sleeper: S,
}

#[cfg(feature = "tokio")]
impl<T: Transport> RetryTransport<T, TokioSleeper> {
    /// Wrap transport with the tokio sleeper.
    pub const fn new(inner: T, policy: RetryPolicy) -> Self {
        Self::with_sleeper(inner, policy, TokioSleeper)
    }
}

impl<T: Transport, S: Sleeper> RetryTransport<T, S> {
    /// Wrap transport with a custom sleeper.
    pub const fn with_sleeper(inner: T, policy: RetryPolicy, sleeper: S) -> Self {
        Self {
            inner,
            policy,
            sleeper,
        }
    }

    /// Wrapped transport.
    pub const fn inner(&self) -> &T {
        &self.inner
    }

    /// Retry bounds in use.
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<T: Transport, S: Sleeper> Transport for RetryTransport<T, S> {
    type Error = T::Error;

    async fn send(&self, request: Request) -> Result<Response, Self::Error> {
        let attempts = if request.method == Method::Get {
            self.policy.attempts.max(1)
        } else {
            1
        };
        let mut attempt = 1;
        loop {
            match self.inner.send(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_transient() && attempt < attempts => {
                    warn!(
                        method = %request.method,
                        path = %request.path,
                        attempt,
                        attempts,
                        "transient pod manager failure: {err}"
                    );
                    self.sleeper.sleep(self.policy.interval).await;
                    attempt += 1;
                }
                Err(err) => {
                    if err.is_transient() {
                        error!(
                            method = %request.method,
                            path = %request.path,
                            attempts,
                            "pod manager still failing after all attempts: {err}"
                        );
                    }
                    return Err(err);
                }
            }
        }
    }
}
