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

//! Integration tests of the bounded retry policy under the adapter.

use podm::Dialect;
use podm::PodManager;
use podm_core::Method;
use podm_core::RetryPolicy;
use podm_core::RetryTransport;
use podm_core::Sleeper;
use podm_core::StatusCode;
use podm_tests::fixtures::chassis;
use podm_tests::fixtures::collection;
use podm_tests::Expect;
use podm_tests::TestError;
use podm_tests::Transport;
use std::error::Error as StdError;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use tokio::test;

const CHASSIS: &str = "/redfish/v1/Chassis";
const POD: &str = "/redfish/v1/Chassis/Pod1";
const INTERVAL: Duration = Duration::from_millis(250);

#[derive(Clone, Default)]
struct Recorder {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl Recorder {
    fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().expect("not poisoned").clone()
    }
}

impl Sleeper for Recorder {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().expect("not poisoned").push(duration);
    }
}

type Retrying = RetryTransport<Transport, Recorder>;

fn retrying(attempts: u32) -> (Arc<Retrying>, Recorder, PodManager<Retrying>) {
    let recorder = Recorder::default();
    let transport = Arc::new(RetryTransport::with_sleeper(
        Transport::default(),
        RetryPolicy::new(attempts, INTERVAL),
        recorder.clone(),
    ));
    let podm = PodManager::new(transport.clone(), Dialect::IntelCommon);
    (transport, recorder, podm)
}

fn unavailable() -> Expect {
    Expect::fault(Method::Get, POD, StatusCode::SERVICE_UNAVAILABLE, "busy")
}

#[test]
async fn service_unavailable_is_retried() -> Result<(), Box<dyn StdError>> {
    let (transport, recorder, podm) = retrying(5);
    transport.inner().expect_all([
        Expect::get(CHASSIS, collection(CHASSIS, &[POD])),
        unavailable(),
        unavailable(),
        Expect::get(POD, chassis(POD, "Pod", None, &[])),
    ]);
    let pods = podm.list_pods().await?;
    assert_eq!(pods.len(), 1);
    assert_eq!(transport.inner().pending(), 0);
    assert_eq!(recorder.sleeps(), vec![INTERVAL, INTERVAL]);
    Ok(())
}

#[test]
async fn refused_connection_exhausts_attempts() {
    let (transport, recorder, podm) = retrying(3);
    transport
        .inner()
        .expect_all((0..3).map(|_| Expect::error(Method::Get, CHASSIS, TestError::ConnectionRefused)));
    let err = podm.list_chassis(None).await.expect_err("pod manager is down");
    assert!(err.is_connectivity());
    assert_eq!(transport.inner().pending(), 0);
    assert_eq!(recorder.sleeps().len(), 2);
}

#[test]
async fn timeout_is_not_retried() {
    let (transport, recorder, podm) = retrying(3);
    transport.inner().expect_all([
        Expect::error(Method::Get, CHASSIS, TestError::Timeout),
        Expect::get(CHASSIS, collection(CHASSIS, &[])),
    ]);
    let err = podm.list_chassis(None).await.expect_err("timed out");
    assert!(err.is_connectivity());
    assert_eq!(transport.inner().pending(), 1);
    assert!(recorder.sleeps().is_empty());
}

#[test]
async fn client_faults_are_not_retried() {
    let (transport, recorder, podm) = retrying(3);
    transport.inner().expect(Expect::fault(
        Method::Delete,
        "/redfish/v1/Nodes/Node1",
        StatusCode::NOT_FOUND,
        "",
    ));
    let err = podm
        .delete_node(&podm::NodeId::new("Node1".into()))
        .await
        .expect_err("unknown node");
    assert!(err.is_fault(podm_core::FaultKind::NotFound));
    assert!(recorder.sleeps().is_empty());
}

#[test]
async fn allocation_is_sent_once() {
    let (transport, recorder, podm) = retrying(5);
    let allocate = "/redfish/v1/Nodes/Actions/Allocate";
    transport.inner().expect_all([
        Expect::fault(Method::Post, allocate, StatusCode::SERVICE_UNAVAILABLE, "busy"),
        Expect::post(allocate, None, StatusCode::CREATED)
            .with_header("Location", "/redfish/v1/Nodes/Node1"),
    ]);
    assert!(podm.compose_node(None).await.is_err());
    assert_eq!(transport.inner().pending(), 1);
    assert!(recorder.sleeps().is_empty());
}
