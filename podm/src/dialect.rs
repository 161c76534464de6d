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

//! Vendor dialects of pod managers.
//!
//! A [`Dialect`] is chosen once per connection. Everything that differs
//! between vendors lives in its [`DialectProfile`].

use crate::power::PowerAction;
use crate::power::PowerState;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::str::FromStr;

/// Supported pod manager dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Dialect {
    /// `LENOVO-PODM`.
    Lenovo,
    /// `INTEL-COMMON`.
    IntelCommon,
}

/// Where storage services live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageServices {
    /// A single resource.
    Single(&'static str),
    /// Members of a collection.
    Collection(&'static str),
}

/// Volumes are the members of `sub_collection` of every member of
/// `services`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volumes {
    pub services: &'static str,
    pub sub_collection: &'static str,
}

/// Where the disks of a system's storage adapters live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterDisks {
    /// Sub-collection of the adapters collection itself.
    Nested(&'static str),
    /// Linked sub-collection of every adapter.
    PerAdapter(&'static str),
}

/// Dialect specific paths, field names and codes.
#[derive(Debug)]
pub struct DialectProfile {
    /// Dialect name as configured on the pod manager side.
    pub name: &'static str,
    /// Inner key of `Oem` blocks.
    pub oem_key: &'static str,
    pub storage_services: StorageServices,
    pub volumes: Volumes,
    pub adapter_disks: AdapterDisks,
    power_on: &'static str,
    power_off: &'static str,
    reboot: &'static str,
    power_states: &'static [(&'static str, PowerState)],
}

static LENOVO: DialectProfile = DialectProfile {
    name: "LENOVO-PODM",
    oem_key: "Lenovo:RackScale",
    storage_services: StorageServices::Single("/redfish/v1/Chassis/PCIeSwitchChassis1"),
    volumes: Volumes {
        services: "/redfish/v1/Chassis/PCIeSwitchChassis1/StorageAdapters",
        sub_collection: "LogicalDrives",
    },
    adapter_disks: AdapterDisks::Nested("Drives"),
    power_on: "powerOn",
    power_off: "powerOff",
    reboot: "powerCycleSoft",
    power_states: &[("8", PowerState::On), ("5", PowerState::Off)],
};

static INTEL_COMMON: DialectProfile = DialectProfile {
    name: "INTEL-COMMON",
    oem_key: "Intel:RackScale",
    storage_services: StorageServices::Collection("/redfish/v1/Services/service1/Targets"),
    volumes: Volumes {
        services: "/redfish/v1/Services",
        sub_collection: "LogicalDrives",
    },
    adapter_disks: AdapterDisks::PerAdapter("Devices"),
    power_on: "On",
    power_off: "ForceOff",
    reboot: "ForceRestart",
    power_states: &[("On", PowerState::On), ("Off", PowerState::Off)],
};

impl Dialect {
    /// Capability record of the dialect.
    #[must_use]
    pub fn profile(self) -> &'static DialectProfile {
        match self {
            Self::Lenovo => &LENOVO,
            Self::IntelCommon => &INTEL_COMMON,
        }
    }
}

impl DialectProfile {
    /// Literal `ResetType` for `action`.
    #[must_use]
    pub const fn reset_type(&self, action: PowerAction) -> &'static str {
        match action {
            PowerAction::PowerOn => self.power_on,
            PowerAction::PowerOff => self.power_off,
            PowerAction::Reboot => self.reboot,
        }
    }

    /// Normalize a reported power status.
    ///
    /// Strings and numbers are looked up in the dialect's table; anything
    /// not in the table is [`PowerState::Error`].
    #[must_use]
    pub fn power_state(&self, reported: &JsonValue) -> PowerState {
        let code = match reported {
            JsonValue::String(s) => s.clone(),
            JsonValue::Number(n) => n.to_string(),
            _ => return PowerState::Error,
        };
        self.power_states
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(code.trim()))
            .map_or(PowerState::Error, |(_, state)| *state)
    }
}

/// Unknown dialect name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDialect(pub String);

impl Display for UnknownDialect {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "unknown pod manager dialect {:?} (expected lenovo or intel-common)",
            self.0
        )
    }
}

impl std::error::Error for UnknownDialect {}

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "lenovo" | "lenovo-podm" => Ok(Self::Lenovo),
            "intel" | "intel-common" => Ok(Self::IntelCommon),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}

impl TryFrom<String> for Dialect {
    type Error = UnknownDialect;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dialect> for String {
    fn from(value: Dialect) -> Self {
        value.profile().name.to_string()
    }
}

impl Display for Dialect {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.profile().name)
    }
}
