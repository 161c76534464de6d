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

//! Errors of the pod manager adapter.

use crate::tree::DataIntegrityError;
use podm_core::FaultKind;
use podm_core::ODataId;
use podm_core::StatusCode;
use podm_core::Transport;
use podm_core::TransportError;
use std::error::Error as StdError;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Error of an adapter operation over transport `T`.
pub enum Error<T: Transport> {
    /// Connectivity error or HTTP fault, unchanged from the transport.
    Transport(T::Error),
    /// Document does not have the expected shape.
    Json(ODataId, serde_path_to_error::Error<serde_json::Error>),
    /// Chassis containment is not a tree.
    DataIntegrity(DataIntegrityError),
    /// Another compose, power or delete operation holds the node.
    NodeBusy(String),
    /// Allocation was accepted without a `Location` header.
    MissingLocation(StatusCode),
    /// The resource does not allow the requested reset type.
    ResetTypeNotAllowed {
        target: ODataId,
        reset_type: String,
        allowed: Vec<String>,
    },
    /// Walk budget deadline passed before the collection was fetched.
    DeadlineExceeded { collection: ODataId, fetched: usize },
}

impl<T: Transport> Error<T> {
    /// Error is an HTTP fault of the given kind.
    pub fn is_fault(&self, kind: FaultKind) -> bool {
        matches!(self, Self::Transport(err) if err.is_fault(kind))
    }

    /// Error is a transport-level connectivity failure.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Transport(err) if err.is_connectivity())
    }
}

impl<T: Transport> Display for Error<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Transport(err) => write!(f, "pod manager transport error: {err}"),
            Self::Json(id, err) => write!(
                f,
                "unexpected document at {id}: path {}: {}",
                err.path(),
                err.inner()
            ),
            Self::DataIntegrity(err) => write!(f, "data integrity error: {err}"),
            Self::NodeBusy(node) => write!(f, "node is busy: {node}"),
            Self::MissingLocation(status) => {
                write!(f, "allocation answered {status} without Location header")
            }
            Self::ResetTypeNotAllowed {
                target,
                reset_type,
                allowed,
            } => write!(
                f,
                "reset type {reset_type} is not allowed by {target} (allowed: {})",
                allowed.join(", ")
            ),
            Self::DeadlineExceeded {
                collection,
                fetched,
            } => write!(
                f,
                "deadline exceeded walking {collection} after {fetched} members"
            ),
        }
    }
}

impl<T: Transport> Debug for Error<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Transport(err) => f.debug_tuple("Transport").field(err).finish(),
            Self::Json(id, err) => f.debug_tuple("Json").field(id).field(err).finish(),
            Self::DataIntegrity(err) => f.debug_tuple("DataIntegrity").field(err).finish(),
            Self::NodeBusy(node) => f.debug_tuple("NodeBusy").field(node).finish(),
            Self::MissingLocation(status) => {
                f.debug_tuple("MissingLocation").field(status).finish()
            }
            Self::ResetTypeNotAllowed {
                target,
                reset_type,
                allowed,
            } => f
                .debug_struct("ResetTypeNotAllowed")
                .field("target", target)
                .field("reset_type", reset_type)
                .field("allowed", allowed)
                .finish(),
            Self::DeadlineExceeded {
                collection,
                fetched,
            } => f
                .debug_struct("DeadlineExceeded")
                .field("collection", collection)
                .field("fetched", fetched)
                .finish(),
        }
    }
}

impl<T: Transport> StdError for Error<T> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Json(_, err) => Some(err.inner()),
            Self::DataIntegrity(err) => Some(err),
            _ => None,
        }
    }
}
