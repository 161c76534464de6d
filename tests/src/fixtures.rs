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

use crate::json_merge;
use crate::Expect;
use crate::ODATA_ID;
use serde_json::json;
use serde_json::Value;

/// Collection document with `members` in order.
#[must_use]
pub fn collection(path: &str, members: &[&str]) -> Value {
    json!({
        ODATA_ID: path,
        "Members@odata.count": members.len(),
        "Members": members.iter().map(|m| json!({ ODATA_ID: m })).collect::<Vec<_>>(),
    })
}

/// Chassis document.
#[must_use]
pub fn chassis(path: &str, chassis_type: &str, parent: Option<&str>, systems: &[&str]) -> Value {
    let id = path.rsplit('/').next().unwrap_or(path);
    let mut links = json!({
        "ComputerSystems": systems.iter().map(|s| json!({ ODATA_ID: s })).collect::<Vec<_>>(),
    });
    if let Some(parent) = parent {
        links["ContainedBy"] = json!({ ODATA_ID: parent });
    }
    json!({
        ODATA_ID: path,
        "Id": id,
        "Name": format!("{chassis_type} {id}"),
        "ChassisType": chassis_type,
        "Links": links,
    })
}

/// Physical computer system document with `fields` merged in.
#[must_use]
pub fn system(path: &str, fields: Value) -> Value {
    let id = path.rsplit('/').next().unwrap_or(path);
    json_merge(
        json!({
            ODATA_ID: path,
            "Id": id,
            "Name": format!("System {id}"),
            "SystemType": "Physical",
            "UUID": format!("00000000-0000-0000-0000-00000000000{id}"),
            "Status": { "State": "Enabled", "Health": "OK" },
            "MemorySummary": { "TotalSystemMemoryGiB": 16 },
            "Processors": { ODATA_ID: format!("{path}/Processors") },
            "EthernetInterfaces": { ODATA_ID: format!("{path}/EthernetInterfaces") },
            "SimpleStorage": { ODATA_ID: format!("{path}/SimpleStorage") },
        }),
        fields,
    )
}

/// Expectations of a chassis walk: `Pod1` containing `Rack1` listing
/// `systems`.
#[must_use]
pub fn pod_with_rack(systems: &[&str]) -> Vec<Expect> {
    let pod = "/redfish/v1/Chassis/Pod1";
    let rack = "/redfish/v1/Chassis/Rack1";
    vec![
        Expect::get("/redfish/v1/Chassis", collection("/redfish/v1/Chassis", &[pod, rack])),
        Expect::get(pod, chassis(pod, "Pod", None, &[])),
        Expect::get(rack, chassis(rack, "Rack", Some(pod), systems)),
    ]
}

/// Expectations of capacity extraction for the system at `path`.
#[must_use]
pub fn capacity(path: &str, cores: &[u64], device_bytes: &[u64], nics: u64) -> Vec<Expect> {
    let processors = format!("{path}/Processors");
    let processor_ids: Vec<String> = (1..=cores.len()).map(|i| format!("{processors}/{i}")).collect();
    let processor_refs: Vec<&str> = processor_ids.iter().map(String::as_str).collect();
    let mut expect = vec![Expect::get(&processors, collection(&processors, &processor_refs))];
    for (id, cores) in processor_ids.iter().zip(cores) {
        expect.push(Expect::get(
            id,
            json!({
                ODATA_ID: id,
                "TotalCores": cores,
                "InstructionSet": "x86-64",
                "Model": "Xeon",
            }),
        ));
    }

    let storage = format!("{path}/SimpleStorage");
    let storage_member = format!("{storage}/1");
    expect.push(Expect::get(&storage, collection(&storage, &[&storage_member])));
    expect.push(Expect::get(
        &storage_member,
        json!({
            ODATA_ID: storage_member,
            "Devices": device_bytes
                .iter()
                .map(|bytes| json!({ "CapacityBytes": bytes }))
                .collect::<Vec<_>>(),
        }),
    ));

    let nic_collection = format!("{path}/EthernetInterfaces");
    expect.push(Expect::get(
        &nic_collection,
        json!({ "Members@odata.count": nics, "Members": [] }),
    ));
    expect
}
