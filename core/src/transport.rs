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

//! Pod manager transport abstraction
//!
//! This module defines the transport-agnostic [`Transport`] trait: a
//! single `send` operation that takes a [`Request`] addressed by a
//! resource path and returns a [`Response`] with status, headers and
//! decoded JSON body.
//!
//! Operation semantics:
//! - Paths are resource paths (`@odata.id` values). Implementors resolve
//!   them against the pod manager base URL under `/redfish/v1`.
//! - Status codes below 300 are success. Implementors turn anything else
//!   into an error whose [`TransportError::fault`] describes it.
//! - A body that is empty or not JSON decodes to `None`.
//!
//! Notes for implementors:
//! - The trait is `Send + Sync` and returns `Send` futures so one
//!   adapter can be shared between tasks.
//! - No caching: every `send` reaches the pod manager.

use crate::fault::TransportError;
use crate::ODataId;
use http::HeaderMap;
use http::StatusCode;
use serde_json::Value as JsonValue;
use std::fmt;
use std::future::Future;

/// HTTP method used by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET.
    Get,
    /// POST.
    Post,
    /// DELETE.
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        })
    }
}

/// Request to the pod manager.
#[derive(Debug, Clone)]
pub struct Request {
    /// Method.
    pub method: Method,
    /// Resource path.
    pub path: ODataId,
    /// JSON body.
    pub body: Option<JsonValue>,
}

impl Request {
    /// GET of the resource.
    #[must_use]
    pub fn get(path: ODataId) -> Self {
        Self::new(Method::Get, path, None)
    }

    /// POST to the resource.
    #[must_use]
    pub fn post(path: ODataId, body: Option<JsonValue>) -> Self {
        Self::new(Method::Post, path, body)
    }

    /// DELETE of the resource.
    #[must_use]
    pub fn delete(path: ODataId) -> Self {
        Self::new(Method::Delete, path, None)
    }

    fn new(method: Method, path: ODataId, body: Option<JsonValue>) -> Self {
        Self {
            method,
            path: path.rooted(),
            body,
        }
    }
}

/// Successful response of the pod manager.
#[derive(Debug, Clone)]
pub struct Response {
    /// Response status (always below 300).
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Decoded body, `None` when empty or not JSON.
    pub body: Option<JsonValue>,
}

impl Response {
    /// Response with status and JSON body and no headers.
    #[must_use]
    pub fn json(status: StatusCode, body: JsonValue) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Some(body),
        }
    }

    /// Value of a header as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Body or JSON `null`.
    #[must_use]
    pub fn into_body(self) -> JsonValue {
        self.body.unwrap_or(JsonValue::Null)
    }
}

/// Transport trait defines access to a pod manager REST service.
pub trait Transport: Send + Sync {
    /// Transport error.
    type Error: TransportError;

    /// Send request and wait for the response.
    fn send(&self, request: Request) -> impl Future<Output = Result<Response, Self::Error>> + Send;
}

/// Credentials used to access the pod manager.
///
/// `Debug`/`Display` redact the password.
#[derive(Clone)]
pub struct Credentials {
    /// Username to access the pod manager.
    pub username: String,
    password: String,
}

impl Credentials {
    /// Create new credentials.
    #[must_use]
    pub const fn new(username: String, password: String) -> Self {
        Self { username, password }
    }

    /// Get password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Credentials(username: {}, password: [REDACTED])",
            self.username
        )
    }
}
