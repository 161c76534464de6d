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

//! Pod manager transport mock.
//!
//! [`MockTransport`] replays a queue of [`Expect`] entries in order. Each
//! request must match the method, path and (when given) body of the
//! next expectation. Anything else fails with [`Error::Unexpected`].

pub mod expect;

#[doc(inline)]
pub use expect::Expect;
pub use expect::ExpectedBody;
pub use expect::ExpectedRequest;
pub use expect::MockReply;

use podm_core::HttpFault;
use podm_core::Request;
use podm_core::Response;
use podm_core::Transport;
use podm_core::TransportError;
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Mutex;
use std::sync::PoisonError;

#[derive(Debug)]
pub enum Error<E> {
    ErrorResponse(E),
    Fault(HttpFault),
    MutexLock(String),
    NothingIsExpected(Request),
    Unexpected(Request, ExpectedRequest),
}

impl<E: Display> Display for Error<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::ErrorResponse(err) => write!(f, "response: {err}"),
            Self::Fault(fault) => write!(f, "{fault}"),
            Self::MutexLock(err) => write!(f, "lock error: {err}"),
            Self::NothingIsExpected(request) => write!(
                f,
                "nothing is expected to happen but got {} {}",
                request.method, request.path
            ),
            Self::Unexpected(request, expected) => write!(
                f,
                "unexpected {} {} body {:?}; expected: {expected:?}",
                request.method, request.path, request.body
            ),
        }
    }
}

impl<E: StdError + 'static> StdError for Error<E> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::ErrorResponse(err) => Some(err),
            Self::Fault(fault) => Some(fault),
            _ => None,
        }
    }
}

impl<E: TransportError> TransportError for Error<E> {
    fn fault(&self) -> Option<&HttpFault> {
        match self {
            Self::ErrorResponse(err) => err.fault(),
            Self::Fault(fault) => Some(fault),
            _ => None,
        }
    }

    fn is_connectivity(&self) -> bool {
        matches!(self, Self::ErrorResponse(err) if err.is_connectivity())
    }

    fn is_connection_refused(&self) -> bool {
        matches!(self, Self::ErrorResponse(err) if err.is_connection_refused())
    }
}

impl<E> Error<E> {
    pub fn mutex_lock<T>(err: PoisonError<T>) -> Self {
        Self::MutexLock(err.to_string())
    }
}

pub struct MockTransport<E> {
    expect: Mutex<VecDeque<Expect<E>>>,
}

impl<E> Default for MockTransport<E> {
    fn default() -> Self {
        Self {
            expect: Mutex::new(VecDeque::new()),
        }
    }
}

impl<E> MockTransport<E> {
    /// Append expectation to the queue.
    pub fn expect(&self, exp: Expect<E>) {
        self.expect.lock().expect("not poisoned").push_back(exp);
    }

    /// Append expectations to the queue in order.
    pub fn expect_all(&self, exps: impl IntoIterator<Item = Expect<E>>) {
        self.expect.lock().expect("not poisoned").extend(exps);
    }

    /// Number of expectations not yet consumed.
    pub fn pending(&self) -> usize {
        self.expect.lock().expect("not poisoned").len()
    }

    pub fn debug_expect(&self) {
        let expect: &VecDeque<Expect<E>> = &self.expect.lock().expect("not poisoned");
        println!("Expectations (total: {})", expect.len());
        for v in expect {
            println!("{:#?}", v.request);
        }
    }
}

impl<E> Transport for MockTransport<E>
where
    E: TransportError,
{
    type Error = Error<E>;

    async fn send(&self, request: Request) -> Result<Response, Self::Error> {
        let expect = self.expect.lock().map_err(Error::mutex_lock)?.pop_front();
        let Some(expect) = expect else {
            return Err(Error::NothingIsExpected(request));
        };
        let matches = expect.request.method == request.method
            && expect.request.path == request.path.rooted()
            && expect.request.body.matches(request.body.as_ref());
        if !matches {
            return Err(Error::Unexpected(request, expect.request));
        }
        let reply = expect.response.map_err(Error::ErrorResponse)?;
        if reply.status.as_u16() >= 300 {
            let text = match reply.body {
                Some(JsonValue::String(text)) => text,
                Some(body) => body.to_string(),
                None => String::new(),
            };
            return Err(Error::Fault(HttpFault::from_body(reply.status, &text)));
        }
        Ok(Response {
            status: reply.status,
            headers: reply.headers,
            body: reply.body,
        })
    }
}
