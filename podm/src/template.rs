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

//! Canonical field sets of pod manager resources.
//!
//! Vendors omit fields freely. [`merge`] overlays a live document onto the
//! template of its [`ResourceKind`] so every canonical top-level field is
//! present. The overlay is shallow: a nested object present in the live
//! document replaces the template's object as a whole.

use serde_json::json;
use serde_json::Value as JsonValue;

/// Kinds of resources with a canonical field set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Chassis,
    ComputerSystem,
    Processor,
    MemoryModule,
    Disk,
    ComposedNode,
    Volume,
    Manager,
}

/// Overlay `raw` onto the template of `kind`.
///
/// `null` (an empty response body) yields the bare template. Values
/// that are not JSON objects cannot be overlaid and are returned as is.
#[must_use]
pub fn merge(raw: JsonValue, kind: ResourceKind) -> JsonValue {
    match raw {
        JsonValue::Object(fields) => {
            let mut merged = kind.template();
            if let JsonValue::Object(target) = &mut merged {
                target.extend(fields);
            }
            merged
        }
        JsonValue::Null => kind.template(),
        other => other,
    }
}

fn status() -> JsonValue {
    json!({ "State": "", "Health": "", "HealthRollup": "" })
}

fn link() -> JsonValue {
    json!({ "@odata.id": "" })
}

impl ResourceKind {
    /// Default (empty-valued) document of this kind.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn template(self) -> JsonValue {
        match self {
            Self::Chassis => json!({
                "@odata.context": "",
                "@odata.id": "",
                "@odata.type": "",
                "Id": "",
                "ChassisType": "",
                "Name": "",
                "Description": "",
                "Manufacturer": "",
                "Model": "",
                "SKU": "",
                "SerialNumber": "",
                "PartNumber": "",
                "AssetTag": "",
                "IndicatorLED": "",
                "Status": status(),
                "Oem": {},
                "Links": {
                    "Contains": [],
                    "ContainedBy": link(),
                    "ComputerSystems": [],
                    "ManagedBy": [],
                    "ManagersIn": [],
                },
            }),
            Self::ComputerSystem => json!({
                "@odata.context": "",
                "@odata.id": "",
                "@odata.type": "",
                "Id": "",
                "Name": "",
                "SystemType": "",
                "AssetTag": "",
                "Manufacturer": "",
                "Model": "",
                "SKU": "",
                "SerialNumber": "",
                "PartNumber": "",
                "Description": "",
                "UUID": "",
                "HostName": "",
                "Status": status(),
                "IndicatorLED": "",
                "PowerState": "",
                "Boot": {
                    "BootSourceOverrideEnabled": "",
                    "BootSourceOverrideTarget": "",
                    "BootSourceOverrideTarget@Redfish.AllowableValues": [],
                },
                "BiosVersion": "",
                "ProcessorSummary": { "Count": "", "Model": "", "Status": status() },
                "MemorySummary": { "TotalSystemMemoryGiB": "", "Status": status() },
                "Processors": link(),
                "EthernetInterfaces": link(),
                "SimpleStorage": {},
                "Links": { "Chassis": [], "ManagedBy": [] },
                "Actions": {
                    "#ComputerSystem.Reset": {
                        "target": "",
                        "ResetType@Redfish.AllowableValues": [],
                    },
                },
                "Oem": {},
            }),
            Self::Processor => json!({
                "@odata.context": "",
                "@odata.id": "",
                "@odata.type": "",
                "Name": "",
                "Id": "",
                "Socket": "",
                "ProcessorType": "",
                "ProcessorArchitecture": "",
                "InstructionSet": "",
                "Manufacturer": "",
                "Model": "",
                "MaxSpeedMHz": "",
                "TotalCores": "",
                "TotalThreads": "",
                "Status": status(),
                "Oem": {},
            }),
            Self::MemoryModule => json!({
                "@odata.context": "",
                "@odata.id": "",
                "@odata.type": "",
                "Name": "",
                "Id": "",
                "DimmType": "",
                "DimmDeviceType": "",
                "BaseModuleType": "",
                "CapacityMiB": "",
                "DataWidthBits": "",
                "BusWidthBits": "",
                "Manufacturer": "",
                "SerialNumber": "",
                "PartNumber": "",
                "AllowedSpeedsMHz": [],
                "DeviceLocator": "",
                "DimmLocation": { "Socket": "", "MemoryController": "", "Channel": "", "Slot": "" },
                "ErrorCorrection": "",
                "OperatingSpeedMHz": "",
                "Status": status(),
                "Oem": {},
            }),
            Self::Disk => json!({
                "@odata.context": "",
                "@odata.id": "",
                "@odata.type": "",
                "Id": "",
                "Name": "",
                "Interface": "",
                "CapacityGiB": "",
                "Type": "",
                "RPM": "",
                "Manufacturer": "",
                "Model": "",
                "SerialNumber": "",
                "FirmwareVersion": "",
                "BusInfo": "",
                "Status": status(),
                "Oem": {},
                "Links": { "ContainedBy": link(), "Oem": {} },
            }),
            Self::ComposedNode => json!({
                "@odata.context": "",
                "@odata.id": "",
                "@odata.type": "",
                "Id": "",
                "Name": "",
                "Description": "",
                "SystemType": "",
                "AssetTag": "",
                "Manufacturer": "",
                "Model": "",
                "SKU": "",
                "SerialNumber": "",
                "PartNumber": "",
                "UUID": "",
                "HostName": "",
                "PowerState": "",
                "BiosVersion": "",
                "Status": status(),
                "Processors": { "Count": "", "Model": "", "Status": status() },
                "Memory": { "TotalSystemMemoryGiB": "", "Status": status() },
                "ComposedNodeState": "",
                "Boot": {
                    "BootSourceOverrideEnabled": "",
                    "BootSourceOverrideTarget": "",
                    "BootSourceOverrideTarget@Redfish.AllowableValues": [],
                },
                "Oem": {},
                "Links": {
                    "ComputerSystem": link(),
                    "Processors": [],
                    "Memory": [],
                    "EthernetInterfaces": [],
                    "LocalDrives": [],
                    "RemoteDrives": [],
                    "ManagedBy": [],
                },
                "Actions": {
                    "#ComposedNode.Reset": {
                        "target": "",
                        "ResetType@Redfish.AllowableValues": [],
                    },
                    "#ComposedNode.Assemble": { "target": "" },
                },
            }),
            Self::Volume => json!({
                "@odata.context": "",
                "@odata.id": "",
                "@odata.type": "",
                "Id": "",
                "Name": "",
                "Description": "",
                "Status": status(),
                "Type": "",
                "Mode": "",
                "Protected": "",
                "CapacityGiB": "",
                "Image": "",
                "Bootable": "",
                "Snapshot": "",
                "Oem": {},
                "Links": {
                    "LogicalDrives": [],
                    "PhysicalDrives": [],
                    "MasterDrive": {},
                    "UsedBy": [],
                    "Targets": [],
                    "Oem": {},
                },
            }),
            Self::Manager => json!({
                "@odata.context": "",
                "@odata.id": "",
                "@odata.type": "",
                "Id": "",
                "Name": "",
                "Description": "",
                "ManagerType": "",
                "Model": "",
                "UUID": "",
                "ServiceEntryPointUUID": "",
                "FirmwareVersion": "",
                "DateTime": "",
                "DateTimeLocalOffset": "",
                "Status": { "Health": "", "State": "" },
                "EthernetInterfaces": link(),
                "NetworkProtocol": link(),
                "CommandShell": {
                    "ConnectTypesSupported": [],
                    "MaxConcurrentSessions": "",
                    "ServiceEnabled": "",
                },
                "GraphicalConsole": {
                    "ConnectTypesSupported": [],
                    "MaxConcurrentSessions": "",
                    "ServiceEnabled": "",
                },
                "SerialConsole": {
                    "ConnectTypesSupported": [],
                    "MaxConcurrentSessions": "",
                    "ServiceEnabled": "",
                },
                "Links": {
                    "ManagerForChassis": [],
                    "ManagerForServers": [],
                    "ManagerForSwitches": [],
                    "ManagerLocation": link(),
                },
                "Oem": {},
            }),
        }
    }
}
