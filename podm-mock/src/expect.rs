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

//! Expectations for the transport mock.

use http::HeaderMap;
use http::HeaderValue;
use podm_core::Method;
use podm_core::ODataId;
use podm_core::StatusCode;
use serde_json::from_str;
use serde_json::Value as JsonValue;
use std::fmt::Display;

/// Canned reply of the mock pod manager.
#[derive(Debug)]
pub struct MockReply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<JsonValue>,
}

pub type Response<E> = Result<MockReply, E>;

/// Body an expected request must carry.
#[derive(Debug, PartialEq)]
pub enum ExpectedBody {
    /// Any body or no body at all.
    Any,
    /// No body.
    Empty,
    /// Exactly this body.
    Json(JsonValue),
}

impl ExpectedBody {
    #[must_use]
    pub fn matches(&self, body: Option<&JsonValue>) -> bool {
        match self {
            Self::Any => true,
            Self::Empty => body.is_none(),
            Self::Json(expected) => body == Some(expected),
        }
    }
}

impl From<Option<JsonValue>> for ExpectedBody {
    fn from(body: Option<JsonValue>) -> Self {
        body.map_or(Self::Empty, Self::Json)
    }
}

/// Request expected by the mock.
#[derive(Debug, PartialEq)]
pub struct ExpectedRequest {
    pub method: Method,
    pub path: ODataId,
    pub body: ExpectedBody,
}

/// Expectation for the tests.
#[derive(Debug)]
pub struct Expect<E> {
    pub request: ExpectedRequest,
    pub response: Response<E>,
}

fn json(v: impl Display) -> JsonValue {
    from_str(&v.to_string()).expect("invalid json")
}

fn reply(status: StatusCode, body: Option<JsonValue>) -> MockReply {
    MockReply {
        status,
        headers: HeaderMap::new(),
        body,
    }
}

impl<E> Expect<E> {
    fn new(method: Method, uri: impl Display, body: ExpectedBody, reply: MockReply) -> Self {
        Self {
            request: ExpectedRequest {
                method,
                path: ODataId::from(uri.to_string()).rooted(),
                body,
            },
            response: Ok(reply),
        }
    }

    /// GET answered with `200` and `response`.
    pub fn get(uri: impl Display, response: impl Display) -> Self {
        Self::new(
            Method::Get,
            uri,
            ExpectedBody::Empty,
            reply(StatusCode::OK, Some(json(response))),
        )
    }

    /// POST with exactly `request` body (`None` for no body) answered
    /// with `status`.
    pub fn post(uri: impl Display, request: Option<JsonValue>, status: StatusCode) -> Self {
        Self::new(Method::Post, uri, request.into(), reply(status, None))
    }

    /// DELETE answered with `status`.
    pub fn delete(uri: impl Display, status: StatusCode) -> Self {
        Self::new(Method::Delete, uri, ExpectedBody::Empty, reply(status, None))
    }

    /// Any request of `method` on `uri` answered with a non-2xx `status`.
    pub fn fault(method: Method, uri: impl Display, status: StatusCode, body: impl Display) -> Self {
        Self::new(
            method,
            uri,
            ExpectedBody::Any,
            reply(status, Some(JsonValue::String(body.to_string()))),
        )
    }

    /// Any request of `method` on `uri` fails with transport error `err`.
    pub fn error(method: Method, uri: impl Display, err: E) -> Self {
        Self {
            request: ExpectedRequest {
                method,
                path: ODataId::from(uri.to_string()).rooted(),
                body: ExpectedBody::Any,
            },
            response: Err(err),
        }
    }

    /// Add response header.
    #[must_use]
    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(reply) = &mut self.response {
            reply
                .headers
                .insert(name, HeaderValue::from_str(value).expect("valid header"));
        }
        self
    }

    /// Replace response body.
    #[must_use]
    pub fn with_body(mut self, body: impl Display) -> Self {
        if let Ok(reply) = &mut self.response {
            reply.body = Some(json(body));
        }
        self
    }
}
