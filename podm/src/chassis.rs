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

//! Chassis records.

use crate::resource::nullable;
use crate::resource::non_empty;
use crate::resource::Link;
use crate::resource::Resource;
use podm_core::ODataId;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::str::FromStr;

/// Type of a chassis in the containment hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChassisType {
    Pod,
    Rack,
    Drawer,
    Enclosure,
    /// Any other `ChassisType` value, verbatim.
    Other(String),
}

impl ChassisType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pod => "Pod",
            Self::Rack => "Rack",
            Self::Drawer => "Drawer",
            Self::Enclosure => "Enclosure",
            Self::Other(s) => s,
        }
    }
}

impl FromStr for ChassisType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "pod" => Self::Pod,
            "rack" => Self::Rack,
            "drawer" => Self::Drawer,
            "enclosure" => Self::Enclosure,
            _ => Self::Other(s.to_string()),
        })
    }
}

impl From<&str> for ChassisType {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(v) => v,
            Err(never) => match never {},
        }
    }
}

impl Display for ChassisType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl Serialize for ChassisType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChassisNode {
    pub path: ODataId,
    pub id: String,
    pub name: Option<String>,
    pub chassis_type: ChassisType,
    /// Parent chassis. `None` for the top of the hierarchy.
    pub contained_by: Option<ODataId>,
    pub contains: Vec<ODataId>,
    pub computer_systems: Vec<ODataId>,
    /// Merged chassis document.
    #[serde(skip)]
    pub document: JsonValue,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ChassisDoc {
    #[serde(default, deserialize_with = "nullable")]
    name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    chassis_type: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    links: ChassisLinks,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ChassisLinks {
    #[serde(default, deserialize_with = "nullable")]
    contained_by: Link,
    #[serde(default, deserialize_with = "nullable")]
    contains: Vec<Link>,
    #[serde(default, deserialize_with = "nullable")]
    computer_systems: Vec<Link>,
}

impl ChassisNode {
    /// Typed view of a (merged) chassis resource.
    ///
    /// # Errors
    ///
    /// Returns the decode error and its document path if the document
    /// does not have the shape of a chassis.
    pub fn from_resource(
        resource: Resource,
    ) -> Result<Self, serde_path_to_error::Error<serde_json::Error>> {
        let doc: ChassisDoc = serde_path_to_error::deserialize(&resource.document)?;
        Ok(Self {
            id: resource.id().to_string(),
            name: non_empty(doc.name),
            chassis_type: non_empty(doc.chassis_type)
                .as_deref()
                .map_or_else(|| ChassisType::Other(String::new()), ChassisType::from),
            contained_by: doc.links.contained_by.id(),
            contains: Link::ids(&doc.links.contains),
            computer_systems: Link::ids(&doc.links.computer_systems),
            path: resource.path,
            document: resource.document,
        })
    }
}
