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

//! Per-node leases.
//!
//! Compose, delete and power operations hold an exclusive lease keyed by
//! node path for the duration of the call. A second caller gets
//! `NodeBusy` instead of racing. Leases older than the lease timeout are
//! considered abandoned and can be taken over.

use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;
use std::time::Instant;

/// Default lease timeout.
pub const DEFAULT_LEASE_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug)]
pub struct NodeLeases {
    held: Mutex<HashMap<String, (u64, Instant)>>,
    next_token: AtomicU64,
    timeout: Duration,
}

impl Default for NodeLeases {
    fn default() -> Self {
        Self::new(DEFAULT_LEASE_TIMEOUT)
    }
}

impl NodeLeases {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            held: Mutex::new(HashMap::new()),
            next_token: AtomicU64::new(1),
            timeout,
        }
    }

    /// Take the lease of `key`. `None` if another caller holds it.
    pub fn try_acquire(&self, key: &str) -> Option<Lease<'_>> {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        if let Some((_, since)) = held.get(key) {
            if now.duration_since(*since) < self.timeout {
                return None;
            }
        }
        held.insert(key.to_string(), (token, now));
        Some(Lease {
            leases: self,
            key: key.to_string(),
            token,
        })
    }

    fn release(&self, key: &str, token: u64) {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        if held.get(key).is_some_and(|(owner, _)| *owner == token) {
            held.remove(key);
        }
    }
}

/// Held lease. Released on drop.
#[derive(Debug)]
pub struct Lease<'a> {
    leases: &'a NodeLeases,
    key: String,
    token: u64,
}

impl Lease<'_> {
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        self.leases.release(&self.key, self.token);
    }
}
