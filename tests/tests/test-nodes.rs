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

//! Integration tests of node composition and lifecycle.

use podm::template::merge;
use podm::Dialect;
use podm::Error;
use podm::NodeId;
use podm::NodeState;
use podm::PodManager;
use podm::Predicate;
use podm::ResourceKind;
use podm_core::FaultKind;
use podm_core::Method;
use podm_core::Request;
use podm_core::Response;
use podm_core::StatusCode;
use podm_core::Transport;
use podm_mock::Error as MockError;
use podm_tests::fixtures::collection;
use podm_tests::pod_manager;
use podm_tests::Expect;
use podm_tests::Transport as Mock;
use podm_tests::ODATA_ID;
use serde_json::json;
use serde_json::Value;
use std::error::Error as StdError;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::test;

const ALLOCATE: &str = "/redfish/v1/Nodes/Actions/Allocate";
const NODE7: &str = "/redfish/v1/Nodes/Node7";

fn node(path: &str, fields: Value) -> Value {
    let id = path.rsplit('/').next().unwrap_or(path);
    merge(
        podm_tests::json_merge(json!({ ODATA_ID: path, "Id": id, "Name": id }), fields),
        ResourceKind::ComposedNode,
    )
}

#[test]
async fn compose_then_get_node() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    transport.expect(
        Expect::post(ALLOCATE, None, StatusCode::CREATED)
            .with_header("Location", "https://podm.local:8443/redfish/v1/Nodes/Node7"),
    );
    let reference = podm.compose_node(None).await?;
    assert_eq!(
        serde_json::to_value(&reference)?,
        json!({ "node": "/redfish/v1/Nodes/Node7" })
    );

    transport.expect(Expect::get(
        NODE7,
        node(NODE7, json!({ "ComposedNodeState": "Allocated" })),
    ));
    let composed = podm.get_node(&NodeId::new(reference.id().into())).await?;
    assert_eq!(composed.state, NodeState::Allocated);
    assert_eq!(composed.path.as_str(), NODE7);
    assert_eq!(transport.pending(), 0);
    Ok(())
}

#[test]
async fn compose_sends_criteria() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    let criteria = json!({
        "Name": "web-1",
        "Processors": [{ "TotalCores": 8 }],
        "Memory": [{ "CapacityMiB": 16384 }],
    });
    transport.expect(
        Expect::post(ALLOCATE, Some(criteria.clone()), StatusCode::CREATED)
            .with_header("Location", NODE7),
    );
    let reference = podm.compose_node(Some(&criteria)).await?;
    assert_eq!(reference.node.as_str(), NODE7);
    Ok(())
}

#[test]
async fn compose_with_empty_criteria_sends_no_body() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    for criteria in [json!({}), Value::Null] {
        transport.expect(
            Expect::post(ALLOCATE, None, StatusCode::CREATED).with_header("Location", NODE7),
        );
        let reference = podm.compose_node(Some(&criteria)).await?;
        assert_eq!(reference.node.as_str(), NODE7);
    }
    assert_eq!(transport.pending(), 0);
    Ok(())
}

#[test]
async fn compose_body_must_match_exactly() {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    transport.expect(
        Expect::post(ALLOCATE, None, StatusCode::CREATED).with_header("Location", NODE7),
    );
    let criteria = json!({ "Name": "web-1" });
    assert!(matches!(
        podm.compose_node(Some(&criteria)).await,
        Err(Error::Transport(MockError::Unexpected(..)))
    ));

    transport.expect(
        Expect::post(ALLOCATE, Some(json!({ "Name": "web-2" })), StatusCode::CREATED)
            .with_header("Location", NODE7),
    );
    assert!(matches!(
        podm.compose_node(None).await,
        Err(Error::Transport(MockError::Unexpected(..)))
    ));
}

#[test]
async fn compose_without_location() {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    transport.expect(Expect::post(ALLOCATE, None, StatusCode::ACCEPTED));
    assert!(matches!(
        podm.compose_node(None).await,
        Err(Error::MissingLocation(StatusCode::ACCEPTED))
    ));
}

#[test]
async fn compose_failure_propagates() {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    transport.expect(Expect::fault(
        Method::Post,
        ALLOCATE,
        StatusCode::BAD_REQUEST,
        json!({
            "messages": [{
                "explanation": "No resources available",
                "recovery": { "text": "Relax the criteria" },
            }],
        }),
    ));
    let err = podm.compose_node(None).await.expect_err("fault");
    assert!(err.is_fault(FaultKind::BadRequest));
    assert!(err.to_string().contains("No resources available"));
}

struct Gated {
    inner: Mock,
    entered: Notify,
    gate: Notify,
}

impl Transport for Gated {
    type Error = <Mock as Transport>::Error;

    async fn send(&self, request: Request) -> Result<Response, Self::Error> {
        if request.method == Method::Post {
            self.entered.notify_one();
            self.gate.notified().await;
        }
        self.inner.send(request).await
    }
}

#[test]
async fn concurrent_compose_is_busy() -> Result<(), Box<dyn StdError>> {
    let gated = Arc::new(Gated {
        inner: Mock::default(),
        entered: Notify::new(),
        gate: Notify::new(),
    });
    gated.inner.expect_all([
        Expect::post(ALLOCATE, None, StatusCode::CREATED).with_header("Location", NODE7),
        Expect::post(ALLOCATE, None, StatusCode::CREATED)
            .with_header("Location", "/redfish/v1/Nodes/Node8"),
    ]);
    let podm = PodManager::new(gated.clone(), Dialect::IntelCommon);

    let first = {
        let podm = podm.clone();
        tokio::spawn(async move { podm.compose_node(None).await })
    };
    gated.entered.notified().await;
    assert!(matches!(
        podm.compose_node(None).await,
        Err(Error::NodeBusy(_))
    ));
    gated.gate.notify_one();
    assert_eq!(first.await??.node.as_str(), NODE7);

    // Lease is released once the first call returns.
    gated.gate.notify_one();
    assert_eq!(
        podm.compose_node(None).await?.node.as_str(),
        "/redfish/v1/Nodes/Node8"
    );
    Ok(())
}

#[test]
async fn delete_node() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::Lenovo);
    transport.expect(Expect::delete(NODE7, StatusCode::NO_CONTENT));
    podm.delete_node(&NodeId::new("Node7".into())).await?;

    transport.expect(Expect::fault(
        Method::Delete,
        NODE7,
        StatusCode::NOT_FOUND,
        "Not Found",
    ));
    let err = podm
        .delete_node(&NodeId::new(NODE7.into()))
        .await
        .expect_err("already deleted");
    assert!(err.is_fault(FaultKind::NotFound));
    assert_eq!(transport.pending(), 0);
    Ok(())
}

#[test]
async fn list_nodes_skips_failed_members() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    let node1 = "/redfish/v1/Nodes/Node1";
    let node2 = "/redfish/v1/Nodes/Node2";
    transport.expect_all([
        Expect::get("/redfish/v1/Nodes", collection("/redfish/v1/Nodes", &[node1, node2])),
        Expect::fault(Method::Get, node1, StatusCode::INTERNAL_SERVER_ERROR, "boom"),
        Expect::get(
            node2,
            node(
                node2,
                json!({ "ComposedNodeState": "Assembled", "PowerState": "On" }),
            ),
        ),
    ]);
    let nodes = podm.list_nodes(None).await?;
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].id, "Node2");
    assert_eq!(nodes[0].state, NodeState::PoweredOn);
    Ok(())
}

#[test]
async fn list_nodes_skips_undecodable_members() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    let node1 = "/redfish/v1/Nodes/Node1";
    let node2 = "/redfish/v1/Nodes/Node2";
    transport.expect_all([
        Expect::get("/redfish/v1/Nodes", collection("/redfish/v1/Nodes", &[node1, node2])),
        Expect::get(node1, node(node1, json!({ "Name": 5 }))),
        Expect::get(node2, node(node2, json!({ "ComposedNodeState": "Allocated" }))),
    ]);
    let nodes = podm.list_nodes(None).await?;
    assert_eq!(transport.pending(), 0);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].path.as_str(), node2);

    transport.expect(Expect::get(node1, node(node1, json!({ "Name": 5 }))));
    assert!(matches!(
        podm.get_node(&NodeId::new("Node1".into())).await,
        Err(Error::Json(..))
    ));
    Ok(())
}

#[test]
async fn list_nodes_with_filter() -> Result<(), Box<dyn StdError>> {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    let node1 = "/redfish/v1/Nodes/Node1";
    let node2 = "/redfish/v1/Nodes/Node2";
    transport.expect_all([
        Expect::get("/redfish/v1/Nodes", collection("/redfish/v1/Nodes", &[node1, node2])),
        Expect::get(node1, node(node1, json!({ "ComposedNodeState": "Failed" }))),
        Expect::get(node2, node(node2, json!({ "ComposedNodeState": "Allocated" }))),
    ]);
    let allocated = Predicate::new().with("ComposedNodeState", "allocated");
    let nodes = podm.list_nodes(Some(&allocated)).await?;
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].path.as_str(), node2);
    Ok(())
}

#[test]
async fn collection_failure_is_not_skipped() {
    let (transport, podm) = pod_manager(Dialect::IntelCommon);
    transport.expect(Expect::fault(
        Method::Get,
        "/redfish/v1/Nodes",
        StatusCode::SERVICE_UNAVAILABLE,
        "restarting",
    ));
    let err = podm.list_nodes(None).await.expect_err("collection");
    assert!(err.is_fault(FaultKind::ServiceUnavailable));
}
