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

//! OData identifiers and collection payloads
//!
//! - [`ODataId`]: value of `@odata.id`, the canonical resource path.
//! - [`Reference`]: `{"@odata.id": ...}` link object.
//! - [`Collection`]: `Members` / `Members@odata.count` payload.
//!
//! Every path the adapter sends is rooted under the service root
//! (`/redfish/v1`). [`ODataId::rooted`] normalizes any relative or
//! slash-padded path to that form.
//!
//! Example
//! ```rust
//! use podm_core::ODataId;
//!
//! let nodes = ODataId::from("Nodes/".to_string()).rooted();
//! assert_eq!(nodes.to_string(), "/redfish/v1/Nodes");
//! assert_eq!(ODataId::from("/redfish/v1/Systems/1".to_string()).last_segment(), "1");
//! ```

use core::fmt::Display;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Name of the `@odata.id` property.
pub const ODATA_ID: &str = "@odata.id";

/// Name of the collection member count property.
pub const MEMBERS_COUNT: &str = "Members@odata.count";

const API_PREFIX: &str = "redfish/v1";

/// Type for `@odata.id` identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ODataId(String);

impl ODataId {
    /// Redfish service root id.
    #[must_use]
    pub fn service_root() -> Self {
        Self(format!("/{API_PREFIX}"))
    }

    /// Path of a child resource under this one.
    #[must_use]
    pub fn join(&self, segment: &str) -> Self {
        Self(format!(
            "{}/{}",
            self.0.trim_end_matches('/'),
            segment.trim_matches('/')
        ))
        .rooted()
    }

    /// Path of this id under the service root.
    ///
    /// Leading and trailing slashes are ignored. A path that already
    /// starts with `redfish/v1` is kept as is, anything else is
    /// prefixed with it.
    #[must_use]
    pub fn rooted(&self) -> Self {
        let trimmed = self.0.trim_matches('/');
        if trimmed.is_empty() {
            Self::service_root()
        } else if trimmed == API_PREFIX || trimmed.starts_with(&format!("{API_PREFIX}/")) {
            Self(format!("/{trimmed}"))
        } else {
            Self(format!("/{API_PREFIX}/{trimmed}"))
        }
    }

    /// Last path segment (`Node7` for `/redfish/v1/Nodes/Node7`).
    #[must_use]
    pub fn last_segment(&self) -> &str {
        self.0
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }

    /// Segment before the last one (`Nodes` for `/redfish/v1/Nodes/Node7`).
    #[must_use]
    pub fn parent_segment(&self) -> &str {
        self.0
            .trim_end_matches('/')
            .rsplit('/')
            .nth(1)
            .unwrap_or_default()
    }

    /// Raw path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ODataId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ODataId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for ODataId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.0.fmt(f)
    }
}

/// Link to another resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reference {
    /// Linked resource path.
    #[serde(rename = "@odata.id")]
    pub odata_id: ODataId,
}

impl Reference {
    /// Extract the `@odata.id` of a link object, if it is one.
    ///
    /// Empty ids (as found in resource templates) are not references.
    #[must_use]
    pub fn from_json(v: &JsonValue) -> Option<ODataId> {
        v.get(ODATA_ID)
            .and_then(JsonValue::as_str)
            .filter(|id| !id.is_empty())
            .map(ODataId::from)
    }

    /// Extract ids from a JSON array of link objects.
    ///
    /// Entries that are not link objects are skipped.
    #[must_use]
    pub fn list_from_json(v: &JsonValue) -> Vec<ODataId> {
        v.as_array()
            .map(|items| items.iter().filter_map(Self::from_json).collect())
            .unwrap_or_default()
    }
}

/// Collection payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Collection {
    /// Collection members in server order.
    #[serde(rename = "Members", default)]
    pub members: Vec<Reference>,
    /// Count of members reported by the server.
    #[serde(rename = "Members@odata.count", default)]
    pub count: Option<u64>,
}

impl Collection {
    /// Parse collection from JSON document.
    ///
    /// Member entries without a usable `@odata.id` are dropped.
    #[must_use]
    pub fn from_json(v: &JsonValue) -> Self {
        let members = v
            .get("Members")
            .map(Reference::list_from_json)
            .unwrap_or_default()
            .into_iter()
            .map(|odata_id| Reference { odata_id })
            .collect();
        let count = v.get(MEMBERS_COUNT).and_then(JsonValue::as_u64);
        Self { members, count }
    }

    /// Member paths in server order.
    #[must_use]
    pub fn member_ids(&self) -> Vec<ODataId> {
        self.members.iter().map(|r| r.odata_id.clone()).collect()
    }

    /// Reported member count, else the number of listed members.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.count.unwrap_or(self.members.len() as u64)
    }

    /// No members in this collection.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
