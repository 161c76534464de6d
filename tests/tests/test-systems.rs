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

//! Integration tests of system listing, location and capacity.

use podm::capacity::CapacityComponent;
use podm::Capacity;
use podm::Dialect;
use podm::Error;
use podm::PowerState;
use podm::SystemFilter;
use podm::SystemId;
use podm::SystemQuery;
use podm::WalkBudget;
use podm_core::Method;
use podm_core::StatusCode;
use podm_tests::fixtures::capacity;
use podm_tests::fixtures::chassis;
use podm_tests::fixtures::collection;
use podm_tests::fixtures::pod_with_rack;
use podm_tests::fixtures::system;
use podm_tests::pod_manager;
use podm_tests::Expect;
use serde_json::json;
use std::error::Error as StdError;
use std::time::Duration;
use tokio::test;

const SYSTEMS: &str = "/redfish/v1/Systems";
const SYSTEM1: &str = "/redfish/v1/Systems/1";
const SYSTEM2: &str = "/redfish/v1/Systems/2";
const GIB: u64 = 1_073_741_824;

#[test]
async fn systems_with_location_and_capacity() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    transport.expect_all(pod_with_rack(&[SYSTEM1]));
    transport.expect_all([
        Expect::get(SYSTEMS, collection(SYSTEMS, &[SYSTEM1])),
        Expect::get(SYSTEM1, system(SYSTEM1, json!({ "PowerState": "On" }))),
    ]);
    transport.expect_all(capacity(SYSTEM1, &[8, 12], &[2 * GIB, GIB], 2));

    let systems = podm.list_systems(&SystemQuery::new()).await?;
    assert_eq!(transport.pending(), 0);
    assert_eq!(systems.len(), 1);
    let system = &systems[0];
    assert_eq!(system.id, "1");
    assert_eq!(system.power_state, PowerState::On);
    assert_eq!(system.health.as_deref(), Some("OK"));
    assert_eq!(system.location.as_deref(), Some("Systems:1_Rack:Rack1_Pod:Pod1"));
    assert_eq!(
        system.capacity,
        Capacity {
            cpu_count: 20,
            cpu_arch: "x86-64".into(),
            cpu_model: "Xeon".into(),
            ram_gib: 16,
            disk_gib: 3,
            nic_count: 2,
        }
    );
    assert!(system.capacity_warnings.is_empty());
    Ok(())
}

#[test]
async fn capacity_thresholds() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    transport.expect_all(pod_with_rack(&[SYSTEM1, SYSTEM2]));
    transport.expect_all([
        Expect::get(SYSTEMS, collection(SYSTEMS, &[SYSTEM1, SYSTEM2])),
        Expect::get(SYSTEM1, system(SYSTEM1, json!({}))),
        Expect::get(
            SYSTEM2,
            system(SYSTEM2, json!({ "MemorySummary": { "TotalSystemMemoryGiB": 64 } })),
        ),
    ]);
    transport.expect_all(capacity(SYSTEM1, &[4], &[GIB], 1));
    transport.expect_all(capacity(SYSTEM2, &[4], &[GIB], 1));

    let filter = SystemFilter::from_pairs([("ram", "32"), ("nw", "1")])?;
    let systems = podm
        .list_systems(&SystemQuery::new().filter(filter))
        .await?;
    assert_eq!(transport.pending(), 0);
    assert_eq!(systems.len(), 1);
    assert_eq!(systems[0].id, "2");
    assert_eq!(systems[0].capacity.ram_gib, 64);
    Ok(())
}

#[test]
async fn equality_filter_applies_before_capacity() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    transport.expect_all(pod_with_rack(&[SYSTEM1]));
    transport.expect_all([
        Expect::get(SYSTEMS, collection(SYSTEMS, &[SYSTEM1])),
        Expect::get(SYSTEM1, system(SYSTEM1, json!({}))),
    ]);
    let filter = SystemFilter::from_pairs([("SystemType", "logical")])?;
    let systems = podm
        .list_systems(&SystemQuery::new().filter(filter))
        .await?;
    assert!(systems.is_empty());
    assert_eq!(transport.pending(), 0);
    Ok(())
}

#[test]
async fn limit_stops_capacity_extraction() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    transport.expect_all(pod_with_rack(&[]));
    transport.expect_all([
        Expect::get(SYSTEMS, collection(SYSTEMS, &[SYSTEM1, SYSTEM2])),
        Expect::get(SYSTEM1, system(SYSTEM1, json!({}))),
    ]);
    transport.expect_all(capacity(SYSTEM1, &[2], &[], 0));

    // No GET of the second member once the limit is reached.
    let systems = podm.list_systems(&SystemQuery::new().limit(1)).await?;
    assert_eq!(systems.len(), 1);
    assert_eq!(systems[0].location, None);
    assert_eq!(transport.pending(), 0);
    Ok(())
}

#[test]
async fn undecodable_system_and_chassis_are_skipped() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    let pod = "/redfish/v1/Chassis/Pod1";
    let rack = "/redfish/v1/Chassis/Rack1";
    let drawer9 = "/redfish/v1/Chassis/Drawer9";
    let mut bad_drawer = chassis(drawer9, "Drawer", Some(rack), &[]);
    bad_drawer["Name"] = json!(7);
    transport.expect_all([
        Expect::get("/redfish/v1/Chassis", collection("/redfish/v1/Chassis", &[pod, rack, drawer9])),
        Expect::get(pod, chassis(pod, "Pod", None, &[])),
        Expect::get(rack, chassis(rack, "Rack", Some(pod), &[SYSTEM2])),
        Expect::get(drawer9, bad_drawer),
        Expect::get(SYSTEMS, collection(SYSTEMS, &[SYSTEM1, SYSTEM2])),
        Expect::get(SYSTEM1, system(SYSTEM1, json!({ "Name": 5 }))),
        Expect::get(SYSTEM2, system(SYSTEM2, json!({}))),
    ]);
    transport.expect_all(capacity(SYSTEM2, &[4], &[GIB], 1));

    let systems = podm.list_systems(&SystemQuery::new()).await?;
    assert_eq!(transport.pending(), 0);
    assert_eq!(systems.len(), 1);
    assert_eq!(systems[0].id, "2");
    assert_eq!(systems[0].location.as_deref(), Some("Systems:2_Rack:Rack1_Pod:Pod1"));
    Ok(())
}

#[test]
async fn capacity_sums_saturate() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    transport.expect_all(pod_with_rack(&[]));
    transport.expect_all([
        Expect::get(SYSTEMS, collection(SYSTEMS, &[SYSTEM1])),
        Expect::get(SYSTEM1, system(SYSTEM1, json!({}))),
    ]);
    transport.expect_all(capacity(SYSTEM1, &[u64::MAX, 1], &[u64::MAX, 1], 0));

    let systems = podm.list_systems(&SystemQuery::new()).await?;
    assert_eq!(systems[0].capacity.cpu_count, u64::MAX);
    assert_eq!(systems[0].capacity.disk_gib, u64::MAX / GIB);
    Ok(())
}

#[test]
async fn capacity_failures_become_warnings() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    let processors = format!("{SYSTEM1}/Processors");
    let storage = format!("{SYSTEM1}/SimpleStorage");
    let nics = format!("{SYSTEM1}/EthernetInterfaces");
    transport.expect_all(pod_with_rack(&[SYSTEM1]));
    transport.expect_all([
        Expect::get(SYSTEMS, collection(SYSTEMS, &[SYSTEM1])),
        Expect::get(SYSTEM1, system(SYSTEM1, json!({}))),
        Expect::fault(Method::Get, &processors, StatusCode::INTERNAL_SERVER_ERROR, "boom"),
        Expect::get(&storage, collection(&storage, &[])),
        Expect::get(&nics, json!({ "Members@odata.count": 4, "Members": [] })),
    ]);

    let systems = podm.list_systems(&SystemQuery::new()).await?;
    let system = &systems[0];
    assert_eq!(system.capacity.cpu_count, 0);
    assert_eq!(system.capacity.disk_gib, 0);
    assert_eq!(system.capacity.nic_count, 4);
    assert_eq!(system.capacity_warnings.len(), 1);
    assert_eq!(system.capacity_warnings[0].component, CapacityComponent::Cpu);
    assert_eq!(system.capacity_warnings[0].path.as_str(), processors);
    Ok(())
}

#[test]
async fn passed_deadline() {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    transport.expect_all(pod_with_rack(&[]));
    transport.expect(Expect::get(SYSTEMS, collection(SYSTEMS, &[SYSTEM1])));
    let query = SystemQuery::new().budget(WalkBudget::unbounded().timeout(Duration::ZERO));
    assert!(matches!(
        podm.list_systems(&query).await,
        Err(Error::DeadlineExceeded { fetched: 0, .. })
    ));
}

#[test]
async fn get_system_by_id() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::Lenovo);
    transport.expect_all(pod_with_rack(&[SYSTEM2]));
    transport.expect(Expect::get(SYSTEM2, system(SYSTEM2, json!({ "PowerState": "5" }))));
    transport.expect_all(capacity(SYSTEM2, &[16], &[10 * GIB], 2));

    let system = podm.get_system(&SystemId::new("2".into())).await?;
    assert_eq!(system.power_state, PowerState::Off);
    assert_eq!(system.capacity.disk_gib, 10);
    assert_eq!(system.location.as_deref(), Some("Systems:2_Rack:Rack1_Pod:Pod1"));
    Ok(())
}

#[test]
async fn system_inventory_lenovo_disks() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::Lenovo);
    let adapters = format!("{SYSTEM1}/Adapters");
    let drives = format!("{adapters}/Drives");
    let drive = format!("{drives}/1");
    let processors = format!("{SYSTEM1}/Processors");
    let nics = format!("{SYSTEM1}/EthernetInterfaces");
    transport.expect_all([
        Expect::get(
            SYSTEM1,
            system(
                SYSTEM1,
                json!({ "Oem": { "Lenovo:RackScale": { "Adapters": { "@odata.id": adapters } } } }),
            ),
        ),
        Expect::get(&processors, collection(&processors, &[])),
        Expect::get(&nics, collection(&nics, &[])),
        Expect::get(&drives, collection(&drives, &[&drive])),
        Expect::get(&drive, json!({ "Id": "1", "CapacityGiB": 480 })),
    ]);

    let inventory = podm.system_inventory(&SystemId::new("1".into())).await?;
    assert_eq!(transport.pending(), 0);
    assert!(inventory.processors.is_empty());
    assert!(inventory.memory.is_empty());
    assert_eq!(inventory.disks.len(), 1);
    assert_eq!(inventory.disks[0].document["CapacityGiB"], 480);
    assert_eq!(inventory.disks[0].document["SerialNumber"], "");
    Ok(())
}
