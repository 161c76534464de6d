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

//! Generic resource documents.

use crate::predicate::extract;
use crate::predicate::extract_str;
use crate::template::ResourceKind;
use podm_core::ODataId;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Resource fetched from the pod manager.
///
/// `document` is the live document, merged with the template of `kind`
/// when one was requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    /// Path the resource was fetched from. Unique key of the resource.
    pub path: ODataId,
    #[serde(skip)]
    pub kind: Option<ResourceKind>,
    pub document: JsonValue,
}

impl Resource {
    #[must_use]
    pub const fn new(path: ODataId, kind: Option<ResourceKind>, document: JsonValue) -> Self {
        Self {
            path,
            kind,
            document,
        }
    }

    /// `Id` property, else the last path segment.
    #[must_use]
    pub fn id(&self) -> &str {
        extract_str(&self.document, "Id").unwrap_or_else(|| self.path.last_segment())
    }

    /// Value at a `/`-separated field path.
    #[must_use]
    pub fn field(&self, path: &str) -> Option<&JsonValue> {
        extract(&self.document, path)
    }

    /// `Links` block.
    #[must_use]
    pub fn links(&self) -> Option<&serde_json::Map<String, JsonValue>> {
        self.document.get("Links").and_then(JsonValue::as_object)
    }
}

/// `{"@odata.id": ...}` as found in merged documents, where the id may be
/// empty or missing.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Link {
    #[serde(rename = "@odata.id", default)]
    odata_id: Option<String>,
}

impl Link {
    pub(crate) fn id(&self) -> Option<ODataId> {
        self.odata_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(ODataId::from)
    }

    pub(crate) fn ids(links: &[Self]) -> Vec<ODataId> {
        links.iter().filter_map(Self::id).collect()
    }
}

/// Deserialize `null` as the default value.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Non-empty string of a merged document.
pub(crate) fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}
