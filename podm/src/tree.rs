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

//! Chassis containment tree.
//!
//! The tree is a read-only snapshot built from one chassis listing. Every
//! chassis becomes a node keyed by its path. A chassis without
//! `ContainedBy` hangs under the synthetic root. Computer systems are
//! leaves under the deepest chassis that lists them.

use crate::chassis::ChassisNode;
use podm_core::ODataId;
use std::collections::HashMap;
use std::collections::HashSet;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use tracing::warn;

/// Key of the synthetic root.
pub const ROOT_ID: &str = "0";

/// Chassis containment is not a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataIntegrityError {
    /// Ancestor walk from `node` visits a node twice.
    Cycle { node: String },
    /// `node` is contained by a chassis missing from the listing.
    DanglingParent { node: String, parent: String },
    /// No node with this key.
    UnknownNode(String),
    /// Two chassis share one path.
    DuplicateNode(String),
}

impl Display for DataIntegrityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Cycle { node } => write!(f, "containment cycle through {node}"),
            Self::DanglingParent { node, parent } => {
                write!(f, "{node} is contained by unknown chassis {parent}")
            }
            Self::UnknownNode(node) => write!(f, "unknown tree node {node}"),
            Self::DuplicateNode(node) => write!(f, "duplicate chassis {node}"),
        }
    }
}

impl StdError for DataIntegrityError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNodeKind {
    Root,
    Chassis { chassis_type: String },
    System,
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub id: String,
    /// Human readable label: `ChassisType:Id` or `parentSegment:lastSegment`.
    pub label: String,
    pub kind: TreeNodeKind,
    pub parent: Option<String>,
    pub children: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct HierarchyTree {
    nodes: HashMap<String, TreeNode>,
}

impl HierarchyTree {
    /// Build a tree from a chassis listing.
    ///
    /// # Errors
    ///
    /// Returns `DataIntegrityError` if two chassis share a path, a parent
    /// is missing from the listing, or containment has a cycle.
    pub fn build(chassis: &[ChassisNode]) -> Result<Self, DataIntegrityError> {
        let mut nodes = HashMap::new();
        nodes.insert(
            ROOT_ID.to_string(),
            TreeNode {
                id: ROOT_ID.to_string(),
                label: String::new(),
                kind: TreeNodeKind::Root,
                parent: None,
                children: Vec::new(),
            },
        );
        for c in chassis {
            let key = c.path.to_string();
            let node = TreeNode {
                id: key.clone(),
                label: format!("{}:{}", c.chassis_type, c.id),
                kind: TreeNodeKind::Chassis {
                    chassis_type: c.chassis_type.to_string(),
                },
                parent: None,
                children: Vec::new(),
            };
            if nodes.insert(key.clone(), node).is_some() {
                return Err(DataIntegrityError::DuplicateNode(key));
            }
        }

        let mut tree = Self { nodes };
        for c in chassis {
            let key = c.path.to_string();
            let parent = match &c.contained_by {
                Some(parent) => {
                    let parent = parent.rooted().to_string();
                    if parent == key {
                        return Err(DataIntegrityError::Cycle { node: key });
                    }
                    if !tree.nodes.contains_key(&parent) {
                        warn!(chassis = %key, %parent, "dangling ContainedBy reference");
                        return Err(DataIntegrityError::DanglingParent { node: key, parent });
                    }
                    parent
                }
                None => ROOT_ID.to_string(),
            };
            tree.attach(&key, &parent);
        }
        for c in chassis {
            tree.path_to_root(c.path.as_str())?;
        }

        // Deepest chassis wins when several list the same system.
        let mut owners: HashMap<String, (usize, String)> = HashMap::new();
        for c in chassis {
            let depth = tree.path_to_root(c.path.as_str())?.len();
            for system in &c.computer_systems {
                let system = system.rooted().to_string();
                let candidate = (depth, c.path.to_string());
                match owners.get(&system) {
                    Some((known, _)) if *known >= depth => {}
                    _ => {
                        owners.insert(system, candidate);
                    }
                }
            }
        }
        let mut owners: Vec<_> = owners.into_iter().collect();
        owners.sort();
        for (system, (_, owner)) in owners {
            let path = ODataId::from(system.as_str());
            tree.nodes.insert(
                system.clone(),
                TreeNode {
                    id: system.clone(),
                    label: format!("{}:{}", path.parent_segment(), path.last_segment()),
                    kind: TreeNodeKind::System,
                    parent: None,
                    children: Vec::new(),
                },
            );
            tree.attach(&system, &owner);
        }
        Ok(tree)
    }

    fn attach(&mut self, child: &str, parent: &str) {
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent.to_string());
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child.to_string());
        }
    }

    /// Keys from the root down to `node`, root first.
    ///
    /// # Errors
    ///
    /// Returns `DataIntegrityError` if `node` is unknown or the ancestor
    /// walk does not terminate.
    pub fn path_to_root(&self, node: &str) -> Result<Vec<String>, DataIntegrityError> {
        let mut visited = HashSet::new();
        let mut path = Vec::new();
        let mut current = Some(node);
        while let Some(key) = current {
            let tree_node = self
                .nodes
                .get(key)
                .ok_or_else(|| DataIntegrityError::UnknownNode(key.to_string()))?;
            if !visited.insert(key) {
                return Err(DataIntegrityError::Cycle {
                    node: key.to_string(),
                });
            }
            path.push(key.to_string());
            current = tree_node.parent.as_deref();
        }
        path.reverse();
        Ok(path)
    }

    /// Labels from `node` up to the top chassis joined by `_`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::path_to_root`].
    pub fn location(&self, node: &str) -> Result<String, DataIntegrityError> {
        let path = self.path_to_root(node)?;
        Ok(path
            .iter()
            .rev()
            .filter(|key| key.as_str() != ROOT_ID)
            .filter_map(|key| self.nodes.get(key))
            .map(|n| n.label.as_str())
            .collect::<Vec<_>>()
            .join("_"))
    }

    #[must_use]
    pub fn get(&self, node: &str) -> Option<&TreeNode> {
        self.nodes.get(node)
    }

    #[must_use]
    pub fn root(&self) -> Option<&TreeNode> {
        self.nodes.get(ROOT_ID)
    }

    /// Direct children of `node`, in listing order.
    #[must_use]
    pub fn children(&self, node: &str) -> Vec<&TreeNode> {
        self.nodes
            .get(node)
            .map(|n| n.children.iter().filter_map(|c| self.nodes.get(c)).collect())
            .unwrap_or_default()
    }

    /// All nodes below `node`, depth first.
    #[must_use]
    pub fn descendants(&self, node: &str) -> Vec<&TreeNode> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        let mut stack: Vec<&TreeNode> = self.children(node).into_iter().rev().collect();
        while let Some(n) = stack.pop() {
            if !visited.insert(n.id.as_str()) {
                continue;
            }
            out.push(n);
            stack.extend(self.children(&n.id).into_iter().rev());
        }
        out
    }

    /// Number of nodes including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}
