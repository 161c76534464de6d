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

//! Integration tests of chassis listing and the containment tree.

use podm::tree::TreeNodeKind;
use podm::ChassisType;
use podm::DataIntegrityError;
use podm::Dialect;
use podm::Error;
use podm::PodStatus;
use podm_core::Method;
use podm_tests::fixtures::chassis;
use podm_tests::fixtures::collection;
use podm_tests::fixtures::pod_with_rack;
use podm_tests::pod_manager;
use podm_tests::Expect;
use podm_tests::TestError;
use serde_json::json;
use std::error::Error as StdError;
use tokio::test;

const CHASSIS: &str = "/redfish/v1/Chassis";
const POD: &str = "/redfish/v1/Chassis/Pod1";
const RACK: &str = "/redfish/v1/Chassis/Rack1";
const DRAWER: &str = "/redfish/v1/Chassis/Drawer1";

#[test]
async fn racks_match_type_case_insensitively() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::Lenovo);
    transport.expect_all([
        Expect::get(CHASSIS, collection(CHASSIS, &[POD, RACK, DRAWER])),
        Expect::get(POD, chassis(POD, "Pod", None, &[])),
        Expect::get(RACK, chassis(RACK, "RACK", Some(POD), &[])),
        Expect::get(DRAWER, chassis(DRAWER, "Drawer", Some(RACK), &[])),
    ]);
    let racks = podm.list_racks().await?;
    assert_eq!(transport.pending(), 0);
    assert_eq!(racks.len(), 1);
    assert_eq!(racks[0].id, "Rack1");
    assert_eq!(racks[0].chassis_type, ChassisType::Rack);
    assert_eq!(
        racks[0].contained_by.as_ref().map(|p| p.as_str()),
        Some(POD)
    );
    Ok(())
}

#[test]
async fn unreadable_chassis_is_skipped() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::Lenovo);
    transport.expect_all([
        Expect::get(CHASSIS, collection(CHASSIS, &[POD, RACK])),
        Expect::error(Method::Get, POD, TestError::Timeout),
        Expect::get(RACK, chassis(RACK, "Rack", None, &[])),
    ]);
    let all = podm.list_chassis(None).await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].path.as_str(), RACK);
    Ok(())
}

#[test]
async fn undecodable_chassis_is_skipped() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    let drawer9 = "/redfish/v1/Chassis/Drawer9";
    let mut bad = chassis(drawer9, "Drawer", Some(RACK), &[]);
    bad["Name"] = json!(7);
    transport.expect_all([
        Expect::get(CHASSIS, collection(CHASSIS, &[POD, RACK, drawer9])),
        Expect::get(POD, chassis(POD, "Pod", None, &[])),
        Expect::get(RACK, chassis(RACK, "Rack", Some(POD), &[])),
        Expect::get(drawer9, bad),
    ]);
    let all = podm.list_chassis(None).await?;
    assert_eq!(transport.pending(), 0);
    assert_eq!(
        all.iter().map(|c| c.path.as_str()).collect::<Vec<_>>(),
        vec![POD, RACK]
    );
    Ok(())
}

#[test]
async fn hierarchy_places_systems_under_deepest_chassis() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    let system = "/redfish/v1/Systems/1";
    transport.expect_all([
        Expect::get(CHASSIS, collection(CHASSIS, &[DRAWER, RACK, POD])),
        Expect::get(DRAWER, chassis(DRAWER, "Drawer", Some(RACK), &[system])),
        Expect::get(RACK, chassis(RACK, "Rack", Some(POD), &[system])),
        Expect::get(POD, chassis(POD, "Pod", None, &[])),
    ]);
    let tree = podm.hierarchy().await?;
    assert_eq!(tree.len(), 5);
    assert_eq!(
        tree.location(system)?,
        "Systems:1_Drawer:Drawer1_Rack:Rack1_Pod:Pod1"
    );
    let leaf = tree.get(system).ok_or("system not in tree")?;
    assert_eq!(leaf.kind, TreeNodeKind::System);
    assert_eq!(leaf.parent.as_deref(), Some(DRAWER));
    Ok(())
}

#[test]
async fn containment_cycle_is_rejected() {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    transport.expect_all([
        Expect::get(CHASSIS, collection(CHASSIS, &[POD, RACK])),
        Expect::get(POD, chassis(POD, "Pod", Some(RACK), &[])),
        Expect::get(RACK, chassis(RACK, "Rack", Some(POD), &[])),
    ]);
    assert!(matches!(
        podm.hierarchy().await,
        Err(Error::DataIntegrity(DataIntegrityError::Cycle { .. }))
    ));
}

#[test]
async fn dangling_parent_is_rejected() {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    transport.expect_all([
        Expect::get(CHASSIS, collection(CHASSIS, &[RACK])),
        Expect::get(RACK, chassis(RACK, "Rack", Some(POD), &[])),
    ]);
    match podm.hierarchy().await {
        Err(Error::DataIntegrity(DataIntegrityError::DanglingParent { node, parent })) => {
            assert_eq!(node, RACK);
            assert_eq!(parent, POD);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
async fn location_follows_pod_and_rack() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    transport.expect_all(pod_with_rack(&["/redfish/v1/Systems/3"]));
    let tree = podm.hierarchy().await?;
    assert_eq!(
        tree.location("/redfish/v1/Systems/3")?,
        "Systems:3_Rack:Rack1_Pod:Pod1"
    );
    assert_eq!(tree.location(POD)?, "Pod:Pod1");
    Ok(())
}

#[test]
async fn pod_status() {
    let (transport, podm) = pod_manager(Dialect::Lenovo);
    transport.expect(Expect::get("/redfish/v1", json!({ "Id": "RootService" })));
    assert_eq!(podm.pod_status().await, PodStatus::Online);
    transport.expect(Expect::error(
        Method::Get,
        "/redfish/v1",
        TestError::ConnectionRefused,
    ));
    assert_eq!(podm.pod_status().await, PodStatus::Offline);
}
