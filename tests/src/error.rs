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

//! Errors for tests

use podm_core::HttpFault;
use podm_core::TransportError;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Connectivity failures injected by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestError {
    ConnectionRefused,
    Timeout,
}

impl Display for TestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::ConnectionRefused => write!(f, "connection refused"),
            Self::Timeout => write!(f, "timed out"),
        }
    }
}

impl StdError for TestError {}

impl TransportError for TestError {
    fn fault(&self) -> Option<&HttpFault> {
        None
    }

    fn is_connectivity(&self) -> bool {
        true
    }

    fn is_connection_refused(&self) -> bool {
        matches!(self, Self::ConnectionRefused)
    }
}
