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

//! Collection walks.
//!
//! A walk GETs the collection, then GETs every member in server order,
//! one request at a time. [`WalkBudget`] bounds a walk by deadline and by
//! number of members.

use crate::predicate::Predicate;
use crate::resource::Resource;
use crate::template::merge;
use crate::template::ResourceKind;
use crate::Error;
use podm_core::Collection;
use podm_core::ODataId;
use podm_core::Request;
use podm_core::Transport;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tokio::time::Instant;
use tracing::warn;

/// Bounds of a walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkBudget {
    deadline: Option<Instant>,
    max_members: Option<usize>,
}

impl WalkBudget {
    /// No bounds.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Fail with [`Error::DeadlineExceeded`] once `deadline` passes.
    #[must_use]
    pub const fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline `timeout` from now. A timeout too large for the clock is
    /// no deadline.
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.deadline(deadline),
            None => self,
        }
    }

    /// Stop after `max` members were fetched.
    #[must_use]
    pub const fn max_members(mut self, max: usize) -> Self {
        self.max_members = Some(max);
        self
    }

    /// Deadline has passed.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Options of [`CollectionWalker::fetch_each`].
#[derive(Debug, Clone, Default)]
pub struct Walk<'a> {
    template: Option<ResourceKind>,
    predicate: Option<&'a Predicate>,
    budget: WalkBudget,
    skip_failed: bool,
}

impl<'a> Walk<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge every member with the template of `kind`.
    #[must_use]
    pub const fn template(mut self, kind: ResourceKind) -> Self {
        self.template = Some(kind);
        self
    }

    /// Keep only members matching `predicate` (after the merge).
    #[must_use]
    pub const fn predicate(mut self, predicate: &'a Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    #[must_use]
    pub const fn budget(mut self, budget: WalkBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Log and skip members whose fetch fails instead of failing the walk.
    #[must_use]
    pub const fn skip_failed(mut self) -> Self {
        self.skip_failed = true;
        self
    }
}

/// Walks pod manager collections over a transport.
pub struct CollectionWalker<'t, T: Transport> {
    transport: &'t T,
}

impl<'t, T: Transport> CollectionWalker<'t, T> {
    pub const fn new(transport: &'t T) -> Self {
        Self { transport }
    }

    /// GET document at `path`. An empty body is `null`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the request fails.
    pub async fn get(&self, path: &ODataId) -> Result<JsonValue, Error<T>> {
        self.transport
            .send(Request::get(path.clone()))
            .await
            .map(podm_core::Response::into_body)
            .map_err(Error::Transport)
    }

    /// GET resource at `path`, merged with `template` if given.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the request fails.
    pub async fn fetch(
        &self,
        path: &ODataId,
        template: Option<ResourceKind>,
    ) -> Result<Resource, Error<T>> {
        let path = path.rooted();
        let raw = self.get(&path).await?;
        let document = match template {
            Some(kind) => merge(raw, kind),
            None => raw,
        };
        Ok(Resource::new(path, template, document))
    }

    /// GET collection and return member paths in server order.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the collection cannot be fetched.
    pub async fn list_members(&self, collection: &ODataId) -> Result<Vec<ODataId>, Error<T>> {
        let doc = self.get(&collection.rooted()).await?;
        Ok(Collection::from_json(&doc).member_ids())
    }

    /// GET collection payload (members and reported count).
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the collection cannot be fetched.
    pub async fn collection(&self, collection: &ODataId) -> Result<Collection, Error<T>> {
        let doc = self.get(&collection.rooted()).await?;
        Ok(Collection::from_json(&doc))
    }

    /// Member paths of `collection` in server order, at most as many as
    /// the budget of `walk` allows.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the collection cannot be fetched.
    pub async fn walk_members(
        &self,
        collection: &ODataId,
        walk: &Walk<'_>,
    ) -> Result<Vec<ODataId>, Error<T>> {
        let mut members = self.list_members(collection).await?;
        if let Some(max) = walk.budget.max_members {
            members.truncate(max);
        }
        Ok(members)
    }

    /// GET `member` of `collection` according to `walk`, after `fetched`
    /// members were fetched.
    ///
    /// `None` if the member was skipped or does not match the predicate.
    ///
    /// # Errors
    ///
    /// - `Error::Transport` if the member cannot be fetched and failed
    ///   members are not skipped.
    /// - `Error::DeadlineExceeded` if the budget deadline passes.
    pub async fn fetch_member(
        &self,
        collection: &ODataId,
        member: &ODataId,
        fetched: usize,
        walk: &Walk<'_>,
    ) -> Result<Option<Resource>, Error<T>> {
        let exceeded = || Error::DeadlineExceeded {
            collection: collection.clone(),
            fetched,
        };
        if walk.budget.expired() {
            return Err(exceeded());
        }
        let result = match walk.budget.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, self.fetch(member, walk.template))
                .await
                .map_err(|_| exceeded())?,
            None => self.fetch(member, walk.template).await,
        };
        let resource = match result {
            Ok(resource) => resource,
            Err(err) if walk.skip_failed => {
                warn!(%collection, %member, "skipping collection member: {err}");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        Ok(walk
            .predicate
            .map_or(true, |p| p.matches(&resource.document))
            .then_some(resource))
    }

    /// GET every member of `collection` according to `walk`.
    ///
    /// # Errors
    ///
    /// - `Error::Transport` if the collection, or a member when failed
    ///   members are not skipped, cannot be fetched.
    /// - `Error::DeadlineExceeded` if the budget deadline passes.
    pub async fn fetch_each(
        &self,
        collection: &ODataId,
        walk: &Walk<'_>,
    ) -> Result<Vec<Resource>, Error<T>> {
        let collection = collection.rooted();
        let members = self.walk_members(&collection, walk).await?;
        let mut resources = Vec::new();
        for (fetched, member) in members.iter().enumerate() {
            if let Some(resource) = self.fetch_member(&collection, member, fetched, walk).await? {
                resources.push(resource);
            }
        }
        Ok(resources)
    }
}
