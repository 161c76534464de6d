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

//! Computer system records and system filters.

use crate::capacity::Capacity;
use crate::capacity::CapacityWarning;
use crate::dialect::DialectProfile;
use crate::predicate::Predicate;
use crate::resource::non_empty;
use crate::resource::nullable;
use crate::resource::Resource;
use crate::power::PowerState;
use crate::walker::WalkBudget;
use podm_core::ODataId;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SystemType {
    Physical,
    /// Backs a composed node.
    Logical,
    Other(String),
}

impl From<&str> for SystemType {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "physical" => Self::Physical,
            "logical" => Self::Logical,
            _ => Self::Other(s.to_string()),
        }
    }
}

/// Computer system with its location and capacity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputerSystem {
    pub path: ODataId,
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub uuid: Option<String>,
    pub system_type: SystemType,
    pub power_state: PowerState,
    pub health: Option<String>,
    pub capacity: Capacity,
    /// Location in the chassis hierarchy, leaf first.
    pub location: Option<String>,
    pub capacity_warnings: Vec<CapacityWarning>,
    /// Merged system document.
    #[serde(skip)]
    pub document: JsonValue,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SystemDoc {
    #[serde(default, deserialize_with = "nullable")]
    name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    description: Option<String>,
    #[serde(rename = "UUID", default, deserialize_with = "nullable")]
    uuid: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    system_type: Option<String>,
    #[serde(default)]
    power_state: JsonValue,
    #[serde(default, deserialize_with = "nullable")]
    status: Status,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Status {
    #[serde(default, deserialize_with = "nullable")]
    pub(crate) health: Option<String>,
}

impl ComputerSystem {
    /// Typed view of a (merged) system resource.
    ///
    /// The power state is normalized with the dialect's table.
    ///
    /// # Errors
    ///
    /// Returns the decode error and its document path if the document
    /// does not have the shape of a computer system.
    pub fn from_resource(
        resource: Resource,
        profile: &DialectProfile,
    ) -> Result<Self, serde_path_to_error::Error<serde_json::Error>> {
        let doc: SystemDoc = serde_path_to_error::deserialize(&resource.document)?;
        Ok(Self {
            id: resource.id().to_string(),
            name: non_empty(doc.name),
            description: non_empty(doc.description),
            uuid: non_empty(doc.uuid),
            system_type: non_empty(doc.system_type)
                .as_deref()
                .map_or_else(|| SystemType::Other(String::new()), SystemType::from),
            power_state: profile.power_state(&doc.power_state),
            health: non_empty(doc.status.health),
            capacity: Capacity::default(),
            location: None,
            capacity_warnings: Vec::new(),
            path: resource.path,
            document: resource.document,
        })
    }
}

/// Filter value that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterError {
    pub key: String,
    pub value: String,
}

impl Display for FilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "filter {} expects a non-negative integer, got {:?}",
            self.key, self.value
        )
    }
}

impl StdError for FilterError {}

/// Equality predicate plus capacity thresholds.
///
/// Thresholds pass when the system's value is at least the threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemFilter {
    pub predicate: Predicate,
    pub min_ram_gib: Option<u64>,
    pub min_nic_count: Option<u64>,
    pub min_disk_gib: Option<u64>,
}

impl SystemFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter from `key=value` pairs.
    ///
    /// Keys `ram`, `nw` and `storage` are thresholds (GiB, interface count,
    /// GiB). Every other key is an equality condition on the system
    /// document.
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if a threshold value is not an integer.
    pub fn from_pairs<K, V, I>(pairs: I) -> Result<Self, FilterError>
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut filter = Self::default();
        let mut conditions = Vec::new();
        for (key, value) in pairs {
            let (key, value) = (key.into(), value.into());
            let threshold = match key.as_str() {
                "ram" => &mut filter.min_ram_gib,
                "nw" => &mut filter.min_nic_count,
                "storage" => &mut filter.min_disk_gib,
                _ => {
                    conditions.push((key, value));
                    continue;
                }
            };
            *threshold = Some(value.trim().parse().map_err(|_| FilterError {
                key: key.clone(),
                value: value.clone(),
            })?);
        }
        filter.predicate = conditions.into_iter().collect();
        Ok(filter)
    }

    #[must_use]
    pub fn min_ram_gib(mut self, gib: u64) -> Self {
        self.min_ram_gib = Some(gib);
        self
    }

    #[must_use]
    pub fn min_nic_count(mut self, count: u64) -> Self {
        self.min_nic_count = Some(count);
        self
    }

    #[must_use]
    pub fn min_disk_gib(mut self, gib: u64) -> Self {
        self.min_disk_gib = Some(gib);
        self
    }

    /// Capacity passes every threshold.
    #[must_use]
    pub fn passes(&self, capacity: &Capacity) -> bool {
        let at_least = |min: Option<u64>, value: u64| min.map_or(true, |min| value >= min);
        at_least(self.min_ram_gib, capacity.ram_gib)
            && at_least(self.min_nic_count, capacity.nic_count)
            && at_least(self.min_disk_gib, capacity.disk_gib)
    }
}

/// Options of a system listing.
#[derive(Debug, Clone, Default)]
pub struct SystemQuery {
    /// Return at most this many systems.
    pub limit: Option<usize>,
    pub filter: SystemFilter,
    pub budget: WalkBudget,
}

impl SystemQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: SystemFilter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub const fn budget(mut self, budget: WalkBudget) -> Self {
        self.budget = budget;
        self
    }
}
