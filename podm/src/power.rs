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

//! Power control vocabulary.

use crate::ids::node_path;
use crate::ids::system_path;
use crate::ids::NodeId;
use crate::ids::SystemId;
use podm_core::ODataId;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::str::FromStr;

/// Requested power transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerAction {
    PowerOn,
    PowerOff,
    Reboot,
}

/// Unknown power action name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPowerAction(pub String);

impl Display for UnknownPowerAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "unknown power action: {}", self.0)
    }
}

impl std::error::Error for UnknownPowerAction {}

impl FromStr for PowerAction {
    type Err = UnknownPowerAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "on" | "poweron" => Ok(Self::PowerOn),
            "off" | "poweroff" => Ok(Self::PowerOff),
            "reboot" | "restart" => Ok(Self::Reboot),
            _ => Err(UnknownPowerAction(s.to_string())),
        }
    }
}

/// Normalized power state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PowerState {
    On,
    Off,
    /// Status code not in the dialect's table.
    Error,
}

/// Resource a power action is issued against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerTarget {
    Node(NodeId),
    System(SystemId),
}

impl PowerTarget {
    /// Resource path.
    #[must_use]
    pub fn path(&self) -> ODataId {
        match self {
            Self::Node(id) => node_path(id),
            Self::System(id) => system_path(id),
        }
    }

    /// Name of the reset action (`ComposedNode.Reset`).
    #[must_use]
    pub const fn reset_action(&self) -> &'static str {
        match self {
            Self::Node(_) => "ComposedNode.Reset",
            Self::System(_) => "ComputerSystem.Reset",
        }
    }
}

impl Display for PowerTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.path().fmt(f)
    }
}
