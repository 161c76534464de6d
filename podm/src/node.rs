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

//! Composed node records.

use crate::dialect::DialectProfile;
use crate::power::PowerState;
use crate::resource::non_empty;
use crate::resource::nullable;
use crate::resource::Link;
use crate::resource::Resource;
use crate::system::Status;
use podm_core::ODataId;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Lifecycle state of a composed node.
///
/// The adapter drives `New -> Allocated` (compose) and `* -> Deleted`.
/// Assembly and power transitions are observed only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum NodeState {
    New,
    Allocated,
    Assembled,
    PoweredOn,
    PoweredOff,
    Deleted,
    Failed,
    /// `ComposedNodeState` value without a mapping, verbatim.
    Unknown(String),
}

impl NodeState {
    /// State from the reported `ComposedNodeState` and normalized power.
    #[must_use]
    pub fn from_reported(composed_node_state: &str, power: PowerState) -> Self {
        match composed_node_state.to_ascii_lowercase().as_str() {
            "allocating" => Self::New,
            "allocated" | "assembling" => Self::Allocated,
            "assembled" => match power {
                PowerState::On => Self::PoweredOn,
                PowerState::Off => Self::PoweredOff,
                PowerState::Error => Self::Assembled,
            },
            "poweredon" => Self::PoweredOn,
            "poweredoff" => Self::PoweredOff,
            "failed" => Self::Failed,
            "deleted" => Self::Deleted,
            _ => Self::Unknown(composed_node_state.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BootOverride {
    pub enabled: Option<String>,
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedNode {
    pub path: ODataId,
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub uuid: Option<String>,
    pub state: NodeState,
    /// `ComposedNodeState` as reported.
    pub composed_node_state: String,
    pub power_state: PowerState,
    /// Computer system backing the node once assembled.
    pub backing_system: Option<ODataId>,
    pub boot_override: BootOverride,
    pub health: Option<String>,
    pub processors: Vec<ODataId>,
    pub memory: Vec<ODataId>,
    pub ethernet_interfaces: Vec<ODataId>,
    /// Merged node document.
    #[serde(skip)]
    pub document: JsonValue,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NodeDoc {
    #[serde(default, deserialize_with = "nullable")]
    name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    description: Option<String>,
    #[serde(rename = "UUID", default, deserialize_with = "nullable")]
    uuid: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    composed_node_state: String,
    #[serde(default)]
    power_state: JsonValue,
    #[serde(default, deserialize_with = "nullable")]
    boot: Boot,
    #[serde(default, deserialize_with = "nullable")]
    status: Status,
    #[serde(default, deserialize_with = "nullable")]
    links: NodeLinks,
}

#[derive(Default, Deserialize)]
struct Boot {
    #[serde(rename = "BootSourceOverrideEnabled", default, deserialize_with = "nullable")]
    enabled: Option<String>,
    #[serde(rename = "BootSourceOverrideTarget", default, deserialize_with = "nullable")]
    target: Option<String>,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NodeLinks {
    #[serde(default, deserialize_with = "nullable")]
    computer_system: Link,
    #[serde(default, deserialize_with = "nullable")]
    processors: Vec<Link>,
    #[serde(default, deserialize_with = "nullable")]
    memory: Vec<Link>,
    #[serde(default, deserialize_with = "nullable")]
    ethernet_interfaces: Vec<Link>,
}

impl ComposedNode {
    /// Typed view of a (merged) composed node resource.
    ///
    /// # Errors
    ///
    /// Returns the decode error and its document path if the document
    /// does not have the shape of a composed node.
    pub fn from_resource(
        resource: Resource,
        profile: &DialectProfile,
    ) -> Result<Self, serde_path_to_error::Error<serde_json::Error>> {
        let doc: NodeDoc = serde_path_to_error::deserialize(&resource.document)?;
        let power_state = profile.power_state(&doc.power_state);
        Ok(Self {
            id: resource.id().to_string(),
            name: non_empty(doc.name),
            description: non_empty(doc.description),
            uuid: non_empty(doc.uuid),
            state: NodeState::from_reported(&doc.composed_node_state, power_state),
            composed_node_state: doc.composed_node_state,
            power_state,
            backing_system: doc.links.computer_system.id(),
            boot_override: BootOverride {
                enabled: non_empty(doc.boot.enabled),
                target: non_empty(doc.boot.target),
            },
            health: non_empty(doc.status.health),
            processors: Link::ids(&doc.links.processors),
            memory: Link::ids(&doc.links.memory),
            ethernet_interfaces: Link::ids(&doc.links.ethernet_interfaces),
            path: resource.path,
            document: resource.document,
        })
    }
}

/// Reference to a node accepted for composition.
///
/// Serializes as `{"node": "<path>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRef {
    pub node: ODataId,
}

impl NodeRef {
    /// Last path segment (`Node7`).
    #[must_use]
    pub fn id(&self) -> &str {
        self.node.last_segment()
    }
}
