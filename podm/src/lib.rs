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

//! Adapter for composable infrastructure pod managers.
//!
//! [`PodManager`] exposes chassis, system, node, volume and manager
//! inventory of a pod manager, drives node composition and power
//! actions, and normalizes what differs between vendor [`Dialect`]s.
//!
//! ```no_run
//! # #[cfg(feature = "podm-http")]
//! # async fn list() -> Result<(), Box<dyn std::error::Error>> {
//! use podm::HttpPodManager;
//! use podm::PodmConfig;
//! use podm::SystemQuery;
//!
//! let connection = PodmConfig::load("podm.toml")?.into_connection()?;
//! let podm = HttpPodManager::connect(&connection)?;
//! for system in podm.list_systems(&SystemQuery::new().limit(10)).await? {
//!     println!("{} {:?}", system.id, system.location);
//! }
//! # Ok(())
//! # }
//! ```

#![recursion_limit = "256"]

pub mod adapter;
pub mod capacity;
pub mod chassis;
pub mod config;
pub mod connection;
pub mod dialect;
pub mod error;
pub mod ids;
pub mod lease;
pub mod node;
pub mod power;
pub mod predicate;
pub mod resource;
pub mod system;
pub mod template;
pub mod tree;
pub mod walker;

#[doc(inline)]
pub use adapter::PodManager;
#[doc(inline)]
pub use adapter::PodStatus;
#[doc(inline)]
pub use adapter::SystemInventory;
#[cfg(feature = "podm-http")]
#[doc(inline)]
pub use adapter::HttpPodManager;
#[doc(inline)]
pub use capacity::Capacity;
#[doc(inline)]
pub use capacity::CapacityWarning;
#[doc(inline)]
pub use chassis::ChassisNode;
#[doc(inline)]
pub use chassis::ChassisType;
#[doc(inline)]
pub use config::ConfigError;
#[doc(inline)]
pub use config::PodmConfig;
#[doc(inline)]
pub use connection::Connection;
#[doc(inline)]
pub use dialect::Dialect;
#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use ids::NodeId;
#[doc(inline)]
pub use ids::SystemId;
#[doc(inline)]
pub use node::ComposedNode;
#[doc(inline)]
pub use node::NodeRef;
#[doc(inline)]
pub use node::NodeState;
#[doc(inline)]
pub use power::PowerAction;
#[doc(inline)]
pub use power::PowerState;
#[doc(inline)]
pub use power::PowerTarget;
#[doc(inline)]
pub use predicate::Predicate;
#[doc(inline)]
pub use resource::Resource;
#[doc(inline)]
pub use system::ComputerSystem;
#[doc(inline)]
pub use system::SystemFilter;
#[doc(inline)]
pub use system::SystemQuery;
#[doc(inline)]
pub use template::ResourceKind;
#[doc(inline)]
pub use tree::DataIntegrityError;
#[doc(inline)]
pub use tree::HierarchyTree;
#[doc(inline)]
pub use walker::WalkBudget;

pub use podm_core;
