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

//! Core types shared by pod manager transports and the adapter.
//!
//! - [`Transport`]: asynchronous request/response access to a pod manager.
//! - [`ODataId`], [`Reference`], [`Collection`]: resource paths and
//!   collection payloads.
//! - [`HttpFault`], [`TransportError`]: error classification used by the
//!   adapter and by [`RetryTransport`].

pub mod fault;
pub mod odata;
pub mod retry;
pub mod transport;

#[doc(inline)]
pub use fault::FaultKind;
#[doc(inline)]
pub use fault::HttpFault;
#[doc(inline)]
pub use fault::TransportError;
#[doc(inline)]
pub use odata::Collection;
#[doc(inline)]
pub use odata::ODataId;
#[doc(inline)]
pub use odata::Reference;
#[doc(inline)]
pub use odata::MEMBERS_COUNT;
#[doc(inline)]
pub use odata::ODATA_ID;
#[doc(inline)]
pub use retry::RetryPolicy;
#[doc(inline)]
pub use retry::RetryTransport;
#[doc(inline)]
pub use retry::Sleeper;
#[cfg(feature = "tokio")]
#[doc(inline)]
pub use retry::TokioSleeper;
#[doc(inline)]
pub use transport::Credentials;
#[doc(inline)]
pub use transport::Method;
#[doc(inline)]
pub use transport::Request;
#[doc(inline)]
pub use transport::Response;
#[doc(inline)]
pub use transport::Transport;

pub use http::StatusCode;
