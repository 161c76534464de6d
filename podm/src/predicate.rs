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

//! Equality predicates over JSON documents.
//!
//! A [`Predicate`] holds `{field_path: expected}` conditions. A field path
//! addresses nested values with `/` (`Status/Health`); a numeric segment
//! indexes into an array. A document matches when every condition's
//! value is present and equals the expected value ignoring case.

use serde_json::Value as JsonValue;

/// Value at a `/`-separated path.
#[must_use]
pub fn extract<'a>(doc: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .try_fold(doc, |v, segment| match v {
            JsonValue::Object(fields) => fields.get(segment),
            JsonValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// String at a `/`-separated path. Empty strings count as absent.
#[must_use]
pub fn extract_str<'a>(doc: &'a JsonValue, path: &str) -> Option<&'a str> {
    extract(doc, path)
        .and_then(JsonValue::as_str)
        .filter(|s| !s.is_empty())
}

/// Conjunction of case-insensitive equality conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    conditions: Vec<(String, String)>,
}

impl Predicate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add condition `path == expected`.
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, expected: impl Into<String>) -> Self {
        self.conditions.push((path.into(), expected.into()));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.conditions
            .iter()
            .map(|(path, expected)| (path.as_str(), expected.as_str()))
    }

    /// All conditions hold for `doc`. An empty predicate matches anything.
    #[must_use]
    pub fn matches(&self, doc: &JsonValue) -> bool {
        self.conditions.iter().all(|(path, expected)| {
            extract(doc, path).is_some_and(|value| value_matches(value, expected))
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Predicate {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            conditions: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn value_matches(value: &JsonValue, expected: &str) -> bool {
    let expected = expected.to_lowercase();
    match value {
        JsonValue::String(s) => s.to_lowercase() == expected,
        JsonValue::Number(n) => n.to_string() == expected,
        JsonValue::Bool(b) => b.to_string() == expected,
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => false,
    }
}
