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

//! Pod manager adapter.
//!
//! [`PodManager`] is the only entry point upstream layers use. Every
//! operation is a sequence of awaited requests on the caller's task: no
//! background work, no caching between calls.

use crate::capacity::extract_capacity;
use crate::chassis::ChassisNode;
use crate::chassis::ChassisType;
use crate::dialect::AdapterDisks;
use crate::dialect::Dialect;
use crate::dialect::DialectProfile;
use crate::dialect::StorageServices;
use crate::ids::node_path;
use crate::ids::system_path;
use crate::ids::NodeId;
use crate::ids::SystemId;
use crate::ids::ALLOCATE;
use crate::ids::CHASSIS;
use crate::ids::ETHERNET_SWITCHES;
use crate::ids::MANAGERS;
use crate::ids::NODES;
use crate::ids::SYSTEMS;
use crate::lease::Lease;
use crate::lease::NodeLeases;
use crate::node::ComposedNode;
use crate::node::NodeRef;
use crate::power::PowerAction;
use crate::power::PowerState;
use crate::power::PowerTarget;
use crate::predicate::extract;
use crate::predicate::extract_str;
use crate::predicate::Predicate;
use crate::resource::Resource;
use crate::system::ComputerSystem;
use crate::system::SystemQuery;
use crate::template::ResourceKind;
use crate::tree::HierarchyTree;
use crate::walker::CollectionWalker;
use crate::walker::Walk;
use crate::Error;
use podm_core::ODataId;
use podm_core::Reference;
use podm_core::Request;
use podm_core::Transport;
use serde::Serialize;
use serde_json::json;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing::info;
use tracing::warn;
use url::Url;

/// Reachability of the pod manager service root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PodStatus {
    Online,
    Offline,
}

/// System with all its sub-resources, each merged with its template.
#[derive(Debug, Clone, Serialize)]
pub struct SystemInventory {
    pub system: Resource,
    pub processors: Vec<Resource>,
    pub memory: Vec<Resource>,
    pub ethernet_interfaces: Vec<Resource>,
    pub disks: Vec<Resource>,
}

/// Adapter for one pod manager.
pub struct PodManager<T: Transport> {
    transport: Arc<T>,
    dialect: Dialect,
    leases: Arc<NodeLeases>,
}

impl<T: Transport> Clone for PodManager<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            dialect: self.dialect,
            leases: self.leases.clone(),
        }
    }
}

/// Decoded `resources`. Members that do not decode are logged and skipped.
fn decode_members<R>(
    resources: Vec<Resource>,
    decode: impl Fn(Resource) -> Result<R, serde_path_to_error::Error<serde_json::Error>>,
) -> Vec<R> {
    let mut decoded = Vec::with_capacity(resources.len());
    for resource in resources {
        let path = resource.path.clone();
        match decode(resource) {
            Ok(member) => decoded.push(member),
            Err(err) => warn!(%path, "skipping member: path {}: {}", err.path(), err.inner()),
        }
    }
    decoded
}

fn link(resource: &Resource, path: &str) -> Option<ODataId> {
    resource.field(path).and_then(Reference::from_json)
}

/// Resource path named by a `Location` header.
fn location_path(location: &str) -> ODataId {
    match Url::parse(location) {
        Ok(url) => ODataId::from(url.path()),
        Err(_) => ODataId::from(location),
    }
    .rooted()
}

const fn target_kind(target: &PowerTarget) -> ResourceKind {
    match target {
        PowerTarget::Node(_) => ResourceKind::ComposedNode,
        PowerTarget::System(_) => ResourceKind::ComputerSystem,
    }
}

impl<T: Transport> PodManager<T> {
    /// Adapter speaking `dialect` over `transport`.
    pub fn new(transport: Arc<T>, dialect: Dialect) -> Self {
        Self {
            transport,
            dialect,
            leases: Arc::new(NodeLeases::default()),
        }
    }

    /// Treat node leases older than `timeout` as abandoned.
    #[must_use]
    pub fn with_lease_timeout(mut self, timeout: Duration) -> Self {
        self.leases = Arc::new(NodeLeases::new(timeout));
        self
    }

    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn profile(&self) -> &'static DialectProfile {
        self.dialect.profile()
    }

    fn walker(&self) -> CollectionWalker<'_, T> {
        CollectionWalker::new(self.transport.as_ref())
    }

    fn lease(&self, key: &ODataId) -> Result<Lease<'_>, Error<T>> {
        self.leases.try_acquire(key.as_str()).ok_or_else(|| {
            warn!(node = %key, "node is busy");
            Error::NodeBusy(key.to_string())
        })
    }

    /// `Online` if the service root answers successfully.
    pub async fn pod_status(&self) -> PodStatus {
        match self.transport.send(Request::get(ODataId::service_root())).await {
            Ok(_) => PodStatus::Online,
            Err(err) => {
                debug!("pod manager is offline: {err}");
                PodStatus::Offline
            }
        }
    }

    /// Chassis, restricted to `chassis_type` if given.
    ///
    /// Members that cannot be fetched or decoded are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the chassis collection cannot be fetched.
    pub async fn list_chassis(
        &self,
        chassis_type: Option<&ChassisType>,
    ) -> Result<Vec<ChassisNode>, Error<T>> {
        let predicate = chassis_type
            .map(|t| Predicate::new().with("ChassisType", t.as_str()))
            .unwrap_or_default();
        let walk = Walk::new()
            .template(ResourceKind::Chassis)
            .predicate(&predicate)
            .skip_failed();
        let resources = self.walker().fetch_each(&ODataId::from(CHASSIS), &walk).await?;
        Ok(decode_members(resources, ChassisNode::from_resource))
    }

    /// # Errors
    ///
    /// Same as [`Self::list_chassis`].
    pub async fn list_pods(&self) -> Result<Vec<ChassisNode>, Error<T>> {
        self.list_chassis(Some(&ChassisType::Pod)).await
    }

    /// # Errors
    ///
    /// Same as [`Self::list_chassis`].
    pub async fn list_racks(&self) -> Result<Vec<ChassisNode>, Error<T>> {
        self.list_chassis(Some(&ChassisType::Rack)).await
    }

    /// # Errors
    ///
    /// Same as [`Self::list_chassis`].
    pub async fn list_drawers(&self) -> Result<Vec<ChassisNode>, Error<T>> {
        self.list_chassis(Some(&ChassisType::Drawer)).await
    }

    /// Containment tree of all chassis.
    ///
    /// # Errors
    ///
    /// - Errors of [`Self::list_chassis`]
    /// - `Error::DataIntegrity` if containment is not a tree
    pub async fn hierarchy(&self) -> Result<HierarchyTree, Error<T>> {
        let chassis = self.list_chassis(None).await?;
        HierarchyTree::build(&chassis).map_err(Error::DataIntegrity)
    }

    async fn system_record(
        &self,
        walker: &CollectionWalker<'_, T>,
        resource: Resource,
        tree: &HierarchyTree,
    ) -> Result<ComputerSystem, Error<T>> {
        let path = resource.path.clone();
        let mut system = ComputerSystem::from_resource(resource, self.profile())
            .map_err(|err| Error::Json(path.clone(), err))?;
        let (capacity, warnings) = extract_capacity(walker, &path, &system.document).await;
        system.capacity = capacity;
        system.capacity_warnings = warnings;
        system.location = tree
            .location(path.as_str())
            .ok()
            .filter(|location| !location.is_empty());
        Ok(system)
    }

    /// Systems with location and capacity.
    ///
    /// Members that cannot be fetched or decoded are logged and skipped.
    /// Capacity read errors are recorded on each system. No member is
    /// fetched once `limit` systems were found.
    ///
    /// # Errors
    ///
    /// - Errors of [`Self::hierarchy`]
    /// - `Error::Transport` if the systems collection cannot be fetched
    /// - `Error::DeadlineExceeded` if the query deadline passes
    pub async fn list_systems(&self, query: &SystemQuery) -> Result<Vec<ComputerSystem>, Error<T>> {
        let tree = self.hierarchy().await?;
        let walker = self.walker();
        let collection = ODataId::from(SYSTEMS).rooted();
        let mut walk = Walk::new()
            .template(ResourceKind::ComputerSystem)
            .budget(query.budget)
            .skip_failed();
        if !query.filter.predicate.is_empty() {
            walk = walk.predicate(&query.filter.predicate);
        }
        let members = walker.walk_members(&collection, &walk).await?;

        let mut systems = Vec::new();
        for (fetched, member) in members.iter().enumerate() {
            if query.limit.is_some_and(|limit| systems.len() >= limit) {
                break;
            }
            let Some(resource) = walker.fetch_member(&collection, member, fetched, &walk).await?
            else {
                continue;
            };
            if query.budget.expired() {
                return Err(Error::DeadlineExceeded {
                    collection,
                    fetched: fetched + 1,
                });
            }
            let system = match self.system_record(&walker, resource, &tree).await {
                Ok(system) => system,
                Err(err @ Error::Json(..)) => {
                    warn!("skipping system: {err}");
                    continue;
                }
                Err(err) => return Err(err),
            };
            if query.filter.passes(&system.capacity) {
                systems.push(system);
            } else {
                debug!(system = %system.path, "system below capacity thresholds");
            }
        }
        Ok(systems)
    }

    /// One system with location and capacity.
    ///
    /// # Errors
    ///
    /// - Errors of [`Self::hierarchy`]
    /// - `Error::Transport` if the system cannot be fetched
    /// - `Error::Json` if the system document has an unexpected shape
    pub async fn get_system(&self, id: &SystemId) -> Result<ComputerSystem, Error<T>> {
        let tree = self.hierarchy().await?;
        let walker = self.walker();
        let resource = walker
            .fetch(&system_path(id), Some(ResourceKind::ComputerSystem))
            .await?;
        self.system_record(&walker, resource, &tree).await
    }

    async fn walk_link(
        &self,
        walker: &CollectionWalker<'_, T>,
        collection: Option<ODataId>,
        kind: Option<ResourceKind>,
    ) -> Result<Vec<Resource>, Error<T>> {
        let Some(collection) = collection else {
            return Ok(Vec::new());
        };
        let mut walk = Walk::new().skip_failed();
        if let Some(kind) = kind {
            walk = walk.template(kind);
        }
        walker.fetch_each(&collection, &walk).await
    }

    /// System with processors, memory, interfaces and disks.
    ///
    /// Sub-collections the system does not link are empty.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the system or a linked collection
    /// cannot be fetched.
    pub async fn system_inventory(&self, id: &SystemId) -> Result<SystemInventory, Error<T>> {
        let walker = self.walker();
        let system = walker
            .fetch(&system_path(id), Some(ResourceKind::ComputerSystem))
            .await?;
        let processors = self
            .walk_link(&walker, link(&system, "Processors"), Some(ResourceKind::Processor))
            .await?;
        let memory = self
            .walk_link(
                &walker,
                link(&system, "Memory").or_else(|| link(&system, "DimmConfig")),
                Some(ResourceKind::MemoryModule),
            )
            .await?;
        let ethernet_interfaces = self
            .walk_link(&walker, link(&system, "EthernetInterfaces"), None)
            .await?;

        let adapters = link(&system, &format!("Oem/{}/Adapters", self.profile().oem_key));
        let disks = match (adapters, self.profile().adapter_disks) {
            (None, _) => Vec::new(),
            (Some(adapters), AdapterDisks::Nested(sub)) => {
                self.walk_link(&walker, Some(adapters.join(sub)), Some(ResourceKind::Disk))
                    .await?
            }
            (Some(adapters), AdapterDisks::PerAdapter(sub)) => {
                let mut disks = Vec::new();
                for adapter in self.walk_link(&walker, Some(adapters), None).await? {
                    disks.extend(
                        self.walk_link(&walker, link(&adapter, sub), Some(ResourceKind::Disk))
                            .await?,
                    );
                }
                disks
            }
        };
        Ok(SystemInventory {
            system,
            processors,
            memory,
            ethernet_interfaces,
            disks,
        })
    }

    /// Composed nodes matching `filter`.
    ///
    /// Members that cannot be fetched or decoded are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the nodes collection cannot be fetched.
    pub async fn list_nodes(&self, filter: Option<&Predicate>) -> Result<Vec<ComposedNode>, Error<T>> {
        let mut walk = Walk::new().template(ResourceKind::ComposedNode).skip_failed();
        if let Some(filter) = filter {
            walk = walk.predicate(filter);
        }
        let resources = self.walker().fetch_each(&ODataId::from(NODES), &walk).await?;
        Ok(decode_members(resources, |resource| {
            ComposedNode::from_resource(resource, self.profile())
        }))
    }

    fn node_record(&self, resource: Resource) -> Result<ComposedNode, Error<T>> {
        let path = resource.path.clone();
        ComposedNode::from_resource(resource, self.profile()).map_err(|err| Error::Json(path, err))
    }

    /// # Errors
    ///
    /// - `Error::Transport` if the node cannot be fetched
    /// - `Error::Json` if the node document has an unexpected shape
    pub async fn get_node(&self, id: &NodeId) -> Result<ComposedNode, Error<T>> {
        let resource = self
            .walker()
            .fetch(&node_path(id), Some(ResourceKind::ComposedNode))
            .await?;
        self.node_record(resource)
    }

    /// Request allocation of a new node.
    ///
    /// Returns once the pod manager accepted the request; assembly
    /// continues on the pod manager side. Not idempotent: every call may
    /// allocate a node. Absent, `null` or empty criteria send no body.
    ///
    /// # Errors
    ///
    /// - `Error::NodeBusy` if another composition is in flight
    /// - `Error::Transport` if the allocation request fails
    /// - `Error::MissingLocation` if the response names no node
    pub async fn compose_node(&self, criteria: Option<&JsonValue>) -> Result<NodeRef, Error<T>> {
        let allocate = ODataId::from(ALLOCATE);
        let _lease = self.lease(&allocate)?;
        let body = criteria
            .filter(|criteria| match criteria {
                JsonValue::Null => false,
                JsonValue::Object(fields) => !fields.is_empty(),
                _ => true,
            })
            .cloned();
        let response = self
            .transport
            .send(Request::post(allocate, body))
            .await
            .map_err(Error::Transport)?;
        let node = response
            .header("Location")
            .map(location_path)
            .ok_or(Error::MissingLocation(response.status))?;
        info!(%node, "node allocated");
        Ok(NodeRef { node })
    }

    /// Delete a composed node.
    ///
    /// # Errors
    ///
    /// - `Error::NodeBusy` if another operation holds the node
    /// - `Error::Transport` if the pod manager rejects the request,
    ///   including a not-found fault for an already deleted node
    pub async fn delete_node(&self, id: &NodeId) -> Result<(), Error<T>> {
        let path = node_path(id);
        let _lease = self.lease(&path)?;
        self.transport
            .send(Request::delete(path.clone()))
            .await
            .map_err(Error::Transport)?;
        info!(node = %path, "node deleted");
        Ok(())
    }

    /// Issue a power action. The resulting state is not awaited.
    ///
    /// # Errors
    ///
    /// - `Error::NodeBusy` if another operation holds the resource
    /// - `Error::Transport` if a request fails
    /// - `Error::ResetTypeNotAllowed` if the resource lists allowable reset
    ///   types and the dialect's command is not among them
    pub async fn set_power_state(
        &self,
        target: &PowerTarget,
        action: PowerAction,
    ) -> Result<(), Error<T>> {
        let path = target.path();
        let _lease = self.lease(&path)?;
        let resource = self.walker().fetch(&path, Some(target_kind(target))).await?;
        let reset_type = self.profile().reset_type(action);

        let reset = resource.field(&format!("Actions/#{}", target.reset_action()));
        let action_target = reset
            .and_then(|reset| extract_str(reset, "target"))
            .map_or_else(
                || path.join("Actions").join(target.reset_action()),
                ODataId::from,
            );
        let allowed: Vec<String> = reset
            .and_then(|reset| {
                extract(reset, "ResetType@Redfish.AllowableValues")
                    .or_else(|| extract(reset, "ResetType@DMTF.AllowableValues"))
            })
            .and_then(JsonValue::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(JsonValue::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        if !allowed.is_empty() && !allowed.iter().any(|v| v == reset_type) {
            return Err(Error::ResetTypeNotAllowed {
                target: path,
                reset_type: reset_type.to_string(),
                allowed,
            });
        }

        self.transport
            .send(Request::post(
                action_target,
                Some(json!({ "ResetType": reset_type })),
            ))
            .await
            .map_err(Error::Transport)?;
        info!(%target, reset_type, "power action issued");
        Ok(())
    }

    /// Normalized power state.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the resource cannot be fetched.
    pub async fn get_power_state(&self, target: &PowerTarget) -> Result<PowerState, Error<T>> {
        let resource = self
            .walker()
            .fetch(&target.path(), Some(target_kind(target)))
            .await?;
        Ok(self
            .profile()
            .power_state(resource.field("PowerState").unwrap_or(&JsonValue::Null)))
    }

    /// # Errors
    ///
    /// Returns `Error::Transport` if the managers collection cannot be fetched.
    pub async fn list_managers(&self) -> Result<Vec<Resource>, Error<T>> {
        self.walk_link(&self.walker(), Some(ODataId::from(MANAGERS)), Some(ResourceKind::Manager))
            .await
    }

    /// # Errors
    ///
    /// Returns `Error::Transport` if the switches collection cannot be fetched.
    pub async fn list_ethernet_switches(&self) -> Result<Vec<Resource>, Error<T>> {
        self.walk_link(&self.walker(), Some(ODataId::from(ETHERNET_SWITCHES)), None)
            .await
    }

    /// Storage services of the dialect.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the storage service (or collection)
    /// cannot be fetched.
    pub async fn list_storage_services(&self) -> Result<Vec<Resource>, Error<T>> {
        let walker = self.walker();
        match self.profile().storage_services {
            StorageServices::Single(path) => {
                Ok(vec![walker.fetch(&ODataId::from(path), None).await?])
            }
            StorageServices::Collection(path) => {
                self.walk_link(&walker, Some(ODataId::from(path)), None).await
            }
        }
    }

    /// Volumes of every storage service.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if a services or volumes collection
    /// cannot be fetched.
    pub async fn list_volumes(&self) -> Result<Vec<Resource>, Error<T>> {
        let walker = self.walker();
        let volumes = self.profile().volumes;
        let mut out = Vec::new();
        for service in self
            .walk_link(&walker, Some(ODataId::from(volumes.services)), None)
            .await?
        {
            out.extend(
                self.walk_link(
                    &walker,
                    link(&service, volumes.sub_collection),
                    Some(ResourceKind::Volume),
                )
                .await?,
            );
        }
        Ok(out)
    }

    /// Volumes composed into nodes.
    ///
    /// Volumes that cannot be fetched are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the nodes collection cannot be fetched.
    pub async fn list_node_volumes(&self) -> Result<Vec<Resource>, Error<T>> {
        let walker = self.walker();
        let drives = format!("Oem/{}/ComposedLogicalDrives", self.profile().oem_key);
        let mut volumes = Vec::new();
        for node in self
            .walk_link(&walker, Some(ODataId::from(NODES)), Some(ResourceKind::ComposedNode))
            .await?
        {
            for volume in node.field(&drives).map(Reference::list_from_json).unwrap_or_default() {
                match walker.fetch(&volume, Some(ResourceKind::Volume)).await {
                    Ok(volume) => volumes.push(volume),
                    Err(err) => warn!(node = %node.path, %volume, "skipping volume: {err}"),
                }
            }
        }
        Ok(volumes)
    }
}

#[cfg(feature = "podm-http")]
mod http {
    use super::PodManager;
    use crate::connection::Connection;
    use podm_core::RetryTransport;
    use podm_core::TokioSleeper;
    use podm_http::reqwest::Client;
    use podm_http::reqwest::PodmError;
    use podm_http::HttpTransport;
    use std::sync::Arc;

    /// Pod manager reached over HTTP with bounded retry.
    pub type HttpPodManager = PodManager<RetryTransport<HttpTransport<Client>, TokioSleeper>>;

    impl HttpPodManager {
        /// Adapter for `connection`.
        ///
        /// # Errors
        ///
        /// Returns error if the HTTP client cannot be built.
        pub fn connect(connection: &Connection) -> Result<Self, PodmError> {
            let client = Client::with_params(connection.client_params()).map_err(PodmError::from)?;
            let transport = HttpTransport::new(
                client,
                connection.base_url.clone(),
                connection.credentials.clone(),
            );
            Ok(Self::new(
                Arc::new(RetryTransport::new(transport, connection.retry)),
                connection.dialect,
            ))
        }
    }
}

#[cfg(feature = "podm-http")]
pub use http::HttpPodManager;
