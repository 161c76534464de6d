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

//! Capacity extraction.
//!
//! Each system costs one round trip per sub-collection plus one per
//! processor and per storage member. A failed sub-resource fetch is
//! recorded as a [`CapacityWarning`] and contributes zero.

use crate::predicate::extract;
use crate::predicate::extract_str;
use crate::template::ResourceKind;
use crate::walker::CollectionWalker;
use podm_core::ODataId;
use podm_core::Reference;
use podm_core::Transport;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use tracing::debug;
use tracing::warn;

/// Bytes in one GiB.
pub const GIB: u64 = 1_073_741_824;

/// Hardware summary of a computer system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Capacity {
    /// Sum of `TotalCores` over all processors.
    pub cpu_count: u64,
    /// Instruction set of the last processor.
    pub cpu_arch: String,
    /// Model of the last processor.
    pub cpu_model: String,
    pub ram_gib: u64,
    /// Sum of simple storage device capacities, truncated to GiB.
    pub disk_gib: u64,
    pub nic_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CapacityComponent {
    Cpu,
    Storage,
    Network,
}

impl Display for CapacityComponent {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Cpu => "cpu",
            Self::Storage => "storage",
            Self::Network => "network",
        })
    }
}

/// Sub-resource that could not be read while extracting capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacityWarning {
    pub component: CapacityComponent,
    pub path: ODataId,
    pub reason: String,
}

impl Display for CapacityWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} at {}: {}", self.component, self.path, self.reason)
    }
}

/// Unsigned integer of a number or numeric string. Fractions truncate.
pub(crate) fn as_u64(v: &JsonValue) -> Option<u64> {
    match v {
        JsonValue::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        JsonValue::String(s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            })
        }
        _ => None,
    }
}

/// RAM of the system document. Absent or unreadable is zero.
#[must_use]
pub fn ram_gib(system: &JsonValue) -> u64 {
    extract(system, "MemorySummary/TotalSystemMemoryGiB")
        .and_then(as_u64)
        .unwrap_or(0)
}

/// Sum of `CapacityBytes` of `Devices` of one simple storage document.
#[must_use]
pub fn storage_bytes(simple_storage: &JsonValue) -> u64 {
    simple_storage
        .get("Devices")
        .and_then(JsonValue::as_array)
        .map(|devices| {
            devices
                .iter()
                .filter_map(|d| d.get("CapacityBytes").and_then(as_u64))
                .fold(0, u64::saturating_add)
        })
        .unwrap_or(0)
}

/// Path of a system sub-collection: the document link, else `<path>/<name>`.
fn sub_collection(path: &ODataId, system: &JsonValue, name: &str) -> ODataId {
    extract(system, name)
        .and_then(Reference::from_json)
        .unwrap_or_else(|| path.join(name))
}

struct Extraction {
    capacity: Capacity,
    warnings: Vec<CapacityWarning>,
}

impl Extraction {
    fn warn(&mut self, component: CapacityComponent, path: &ODataId, reason: impl Display) {
        let warning = CapacityWarning {
            component,
            path: path.clone(),
            reason: reason.to_string(),
        };
        warn!("capacity extraction: {warning}");
        self.warnings.push(warning);
    }
}

/// Aggregate capacity of the system document `system` found at `path`.
///
/// Never fails: read errors of sub-resources are returned as warnings.
/// Sums saturate at `u64::MAX`.
pub async fn extract_capacity<T: Transport>(
    walker: &CollectionWalker<'_, T>,
    path: &ODataId,
    system: &JsonValue,
) -> (Capacity, Vec<CapacityWarning>) {
    let mut ex = Extraction {
        capacity: Capacity {
            ram_gib: ram_gib(system),
            ..Capacity::default()
        },
        warnings: Vec::new(),
    };

    let processors = sub_collection(path, system, "Processors");
    match walker.list_members(&processors).await {
        Ok(members) => {
            for member in members {
                match walker.fetch(&member, Some(ResourceKind::Processor)).await {
                    Ok(cpu) => {
                        let cores = cpu.field("TotalCores").and_then(as_u64).unwrap_or(0);
                        ex.capacity.cpu_count = ex.capacity.cpu_count.saturating_add(cores);
                        ex.capacity.cpu_arch = extract_str(&cpu.document, "InstructionSet")
                            .or_else(|| extract_str(&cpu.document, "ProcessorArchitecture"))
                            .unwrap_or_default()
                            .to_string();
                        ex.capacity.cpu_model = extract_str(&cpu.document, "Model")
                            .unwrap_or_default()
                            .to_string();
                    }
                    Err(err) => ex.warn(CapacityComponent::Cpu, &member, err),
                }
            }
        }
        Err(err) => ex.warn(CapacityComponent::Cpu, &processors, err),
    }

    let storage = sub_collection(path, system, "SimpleStorage");
    let mut bytes: u64 = 0;
    match walker.list_members(&storage).await {
        Ok(members) => {
            for member in members {
                match walker.get(&member).await {
                    Ok(doc) => bytes = bytes.saturating_add(storage_bytes(&doc)),
                    Err(err) => ex.warn(CapacityComponent::Storage, &member, err),
                }
            }
        }
        Err(err) => ex.warn(CapacityComponent::Storage, &storage, err),
    }
    ex.capacity.disk_gib = bytes / GIB;

    let nics = sub_collection(path, system, "EthernetInterfaces");
    match walker.collection(&nics).await {
        Ok(collection) => ex.capacity.nic_count = collection.len(),
        Err(err) => ex.warn(CapacityComponent::Network, &nics, err),
    }

    debug!(system = %path, capacity = ?ex.capacity, "capacity extracted");
    (ex.capacity, ex.warnings)
}
