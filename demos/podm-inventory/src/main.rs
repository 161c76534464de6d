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

//! Inventory and control of a pod manager from the command line.
//!
//! Results are printed as JSON. Log verbosity follows `PODM_LOG`
//! (`info` if unset).

use clap::Parser;
use clap::Subcommand;
use podm::ChassisType;
use podm::HttpPodManager;
use podm::NodeId;
use podm::PodmConfig;
use podm::PowerAction;
use podm::PowerTarget;
use podm::SystemFilter;
use podm::SystemId;
use podm::SystemQuery;
use podm::WalkBudget;
use serde::Serialize;
use std::error::Error as StdError;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Pod manager inventory CLI.
#[derive(Parser, Debug)]
#[command(name = "podm-inventory")]
#[command(about = "Query and drive a composable infrastructure pod manager", long_about = None)]
struct Cli {
    /// Connection settings (TOML).
    #[arg(short, long, default_value = "podm.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reachability of the service root.
    Status,
    /// Chassis, optionally of one type (`pod`, `rack`, `drawer`).
    Chassis {
        #[arg(short = 't', long = "type")]
        chassis_type: Option<String>,
    },
    /// Computer systems with location and capacity.
    Systems {
        /// Stop after this many systems.
        #[arg(short, long)]
        limit: Option<usize>,
        /// `key=value` filters. `ram`, `nw` and `storage` are minimum
        /// capacities, anything else matches a document field.
        #[arg(short, long = "filter", value_parser = parse_pair)]
        filters: Vec<(String, String)>,
        /// Give up after this many seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// One system with its processors, memory, interfaces and disks.
    Inventory { system: String },
    /// Composed nodes.
    Nodes,
    /// One composed node.
    Node { node: String },
    /// Allocate a node. Criteria is a JSON document.
    Compose {
        #[arg(long)]
        criteria: Option<String>,
    },
    /// Delete a composed node.
    Delete { node: String },
    /// Power action (`on`, `off`, `reboot`) on a node or a system.
    Power {
        action: PowerAction,
        #[command(flatten)]
        target: Target,
    },
    /// Normalized power state of a node or a system.
    PowerState {
        #[command(flatten)]
        target: Target,
    },
    /// Volumes of all storage services.
    Volumes,
}

#[derive(clap::Args, Debug)]
#[group(required = true, multiple = false)]
struct Target {
    #[arg(long)]
    node: Option<String>,
    #[arg(long)]
    system: Option<String>,
}

impl Target {
    fn power_target(&self) -> Option<PowerTarget> {
        match (&self.node, &self.system) {
            (Some(node), _) => Some(PowerTarget::Node(NodeId::new(node.clone()))),
            (None, Some(system)) => Some(PowerTarget::System(SystemId::new(system.clone()))),
            (None, None) => None,
        }
    }
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected key=value, got {s:?}"))
}

fn print(value: &impl Serialize) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn StdError>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("PODM_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PodmConfig::load(&cli.config)?;
    let connection = config.into_connection()?;
    info!(url = %connection.base_url, dialect = %connection.dialect, "connecting");
    let podm = HttpPodManager::connect(&connection)?;

    match cli.command {
        Command::Status => print(&podm.pod_status().await)?,
        Command::Chassis { chassis_type } => {
            let chassis_type = chassis_type.as_deref().map(ChassisType::from);
            print(&podm.list_chassis(chassis_type.as_ref()).await?)?;
        }
        Command::Systems {
            limit,
            filters,
            timeout_secs,
        } => {
            let mut query = SystemQuery::new().filter(SystemFilter::from_pairs(filters)?);
            if let Some(limit) = limit {
                query = query.limit(limit);
            }
            if let Some(secs) = timeout_secs {
                query = query.budget(WalkBudget::unbounded().timeout(Duration::from_secs(secs)));
            }
            print(&podm.list_systems(&query).await?)?;
        }
        Command::Inventory { system } => {
            let inventory = podm.system_inventory(&SystemId::new(system)).await?;
            print(&inventory)?;
        }
        Command::Nodes => print(&podm.list_nodes(None).await?)?,
        Command::Node { node } => print(&podm.get_node(&NodeId::new(node)).await?)?,
        Command::Compose { criteria } => {
            let criteria = criteria
                .as_deref()
                .map(serde_json::from_str::<serde_json::Value>)
                .transpose()?;
            print(&podm.compose_node(criteria.as_ref()).await?)?;
        }
        Command::Delete { node } => podm.delete_node(&NodeId::new(node)).await?,
        Command::Power { action, target } => {
            if let Some(target) = target.power_target() {
                podm.set_power_state(&target, action).await?;
            }
        }
        Command::PowerState { target } => {
            if let Some(target) = target.power_target() {
                print(&podm.get_power_state(&target).await?)?;
            }
        }
        Command::Volumes => print(&podm.list_volumes().await?)?,
    }
    Ok(())
}
