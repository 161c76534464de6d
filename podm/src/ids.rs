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

//! Identifiers of pod manager resources.
//!
//! Operations accept either a bare id (`Node7`) or a full resource path
//! (`/redfish/v1/Nodes/Node7`).

use podm_core::ODataId;
use tagged_types::TaggedType;

/// Identifier of a composed node.
pub type NodeId = TaggedType<String, NodeIdTag>;
#[doc(hidden)]
#[derive(tagged_types::Tag)]
#[implement(Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[transparent(Debug, Display, FromStr, Serialize, Deserialize)]
#[capability(inner_access, cloned)]
pub enum NodeIdTag {}

/// Identifier of a computer system.
pub type SystemId = TaggedType<String, SystemIdTag>;
#[doc(hidden)]
#[derive(tagged_types::Tag)]
#[implement(Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[transparent(Debug, Display, FromStr, Serialize, Deserialize)]
#[capability(inner_access, cloned)]
pub enum SystemIdTag {}

pub(crate) const NODES: &str = "/redfish/v1/Nodes";
pub(crate) const SYSTEMS: &str = "/redfish/v1/Systems";
pub(crate) const CHASSIS: &str = "/redfish/v1/Chassis";
pub(crate) const MANAGERS: &str = "/redfish/v1/Managers";
pub(crate) const ETHERNET_SWITCHES: &str = "/redfish/v1/EthernetSwitches";
pub(crate) const ALLOCATE: &str = "/redfish/v1/Nodes/Actions/Allocate";

/// Path of `id` inside `collection`, or `id` itself when it is a path.
pub(crate) fn member_path(collection: &str, id: &str) -> ODataId {
    if id.contains('/') {
        ODataId::from(id).rooted()
    } else {
        ODataId::from(collection).join(id)
    }
}

pub(crate) fn node_path(id: &NodeId) -> ODataId {
    member_path(NODES, &id.to_string())
}

pub(crate) fn system_path(id: &SystemId) -> ODataId {
    member_path(SYSTEMS, &id.to_string())
}
