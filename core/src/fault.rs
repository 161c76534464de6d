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

//! HTTP faults reported by the pod manager.
//!
//! Any non-2xx response becomes an [`HttpFault`]. The vendor error body is
//! searched for a human readable explanation and recovery hint; when none
//! is found the raw body text is kept as the explanation.

use http::StatusCode;
use serde_json::Value as JsonValue;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Refinement of an HTTP fault by status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// 400.
    BadRequest,
    /// 401 and 403.
    AccessDenied,
    /// 404.
    NotFound,
    /// 409.
    Conflict,
    /// 503.
    ServiceUnavailable,
    /// Any other 5xx.
    ServerFault,
    /// Everything else (3xx, other 4xx).
    Other,
}

impl FaultKind {
    /// Classify status code.
    #[must_use]
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::BadRequest,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::AccessDenied,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::CONFLICT => Self::Conflict,
            StatusCode::SERVICE_UNAVAILABLE => Self::ServiceUnavailable,
            s if s.is_server_error() => Self::ServerFault,
            _ => Self::Other,
        }
    }
}

/// Non-2xx response of the pod manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFault {
    /// Response status.
    pub status: StatusCode,
    /// Vendor explanation or raw response text.
    pub explanation: String,
    /// Vendor recovery hint, if any.
    pub recovery: Option<String>,
}

impl HttpFault {
    /// Build fault from the response status and body text.
    #[must_use]
    pub fn from_body(status: StatusCode, body: &str) -> Self {
        let parsed = serde_json::from_str::<JsonValue>(body)
            .ok()
            .and_then(|v| explain(&v));
        match parsed {
            Some((explanation, recovery)) => Self {
                status,
                explanation,
                recovery,
            },
            None => Self {
                status,
                explanation: body.to_string(),
                recovery: None,
            },
        }
    }

    /// Fault refinement.
    #[must_use]
    pub fn kind(&self) -> FaultKind {
        FaultKind::from_status(self.status)
    }
}

// Known vendor error layouts: RSD `messages`, then DMTF `error`.
fn explain(v: &JsonValue) -> Option<(String, Option<String>)> {
    let text = |v: Option<&JsonValue>| v.and_then(JsonValue::as_str).map(ToString::to_string);
    if let Some(first) = v.get("messages").and_then(|m| m.get(0)) {
        if let Some(explanation) = text(first.get("explanation")) {
            let recovery = text(first.get("recovery").and_then(|r| r.get("text")))
                .or_else(|| text(first.get("recovery")));
            return Some((explanation, recovery));
        }
    }
    let error = v.get("error")?;
    if let Some(info) = error.get("@Message.ExtendedInfo").and_then(|i| i.get(0)) {
        if let Some(explanation) = text(info.get("Message")) {
            return Some((explanation, text(info.get("Resolution"))));
        }
    }
    text(error.get("message")).map(|explanation| (explanation, None))
}

impl Display for HttpFault {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "pod manager fault {}: {}", self.status, self.explanation)?;
        if let Some(recovery) = &self.recovery {
            write!(f, " (recovery: {recovery})")?;
        }
        Ok(())
    }
}

impl StdError for HttpFault {}

/// Classification every transport error provides.
///
/// The adapter and the bounded retry policy only look at errors through
/// this trait.
pub trait TransportError: StdError + Send + Sync + 'static {
    /// HTTP fault carried by this error.
    fn fault(&self) -> Option<&HttpFault>;

    /// Transport-level failure (refused connection, DNS, TLS, timeout).
    fn is_connectivity(&self) -> bool;

    /// Connection was actively refused by the peer.
    fn is_connection_refused(&self) -> bool;

    /// Error that the bounded retry policy retries: refused connection,
    /// 409 Conflict or 503 Service Unavailable.
    fn is_transient(&self) -> bool {
        self.is_connection_refused()
            || self.fault().is_some_and(|fault| {
                matches!(
                    fault.kind(),
                    FaultKind::Conflict | FaultKind::ServiceUnavailable
                )
            })
    }

    /// Error is an HTTP fault of the given kind.
    fn is_fault(&self, kind: FaultKind) -> bool {
        self.fault().is_some_and(|fault| fault.kind() == kind)
    }
}

impl TransportError for HttpFault {
    fn fault(&self) -> Option<&HttpFault> {
        Some(self)
    }

    fn is_connectivity(&self) -> bool {
        false
    }

    fn is_connection_refused(&self) -> bool {
        false
    }
}
