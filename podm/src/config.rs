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

//! Pod manager configuration file.
//!
//! ```toml
//! url = "podm.local:8443"
//! username = "admin"
//! password = "admin"
//! dialect = "intel-common"
//! retry_count = 5
//! ```

use crate::connection::Connection;
use crate::connection::DEFAULT_REQUEST_TIMEOUT;
use crate::dialect::Dialect;
use crate::dialect::UnknownDialect;
use podm_core::Credentials;
use podm_core::RetryPolicy;
use serde::Deserialize;
use std::error::Error as StdError;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::fs::File;
use std::io::Error as IoError;
use std::io::Read as _;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use toml::de::Error as TomlError;
use url::ParseError;
use url::Url;

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, IoError),
    Toml(TomlError),
    InvalidUrl(String, ParseError),
    UnknownDialect(UnknownDialect),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Io(path, err) => write!(f, "cannot read {}: {err}", path.display()),
            Self::Toml(err) => write!(f, "invalid configuration: {err}"),
            Self::InvalidUrl(url, err) => write!(f, "invalid pod manager url {url}: {err}"),
            Self::UnknownDialect(err) => write!(f, "{err}"),
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(_, err) => Some(err),
            Self::Toml(err) => Some(err),
            Self::InvalidUrl(_, err) => Some(err),
            Self::UnknownDialect(err) => Some(err),
        }
    }
}

/// Configuration of one pod manager. `Debug` redacts the password.
#[derive(Clone, Deserialize)]
pub struct PodmConfig {
    /// Base URL, with or without scheme.
    pub url: String,
    pub username: String,
    pub password: String,
    pub dialect: String,
    /// Scheme used when `url` has none.
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default)]
    pub verify_tls: bool,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_interval_secs")]
    pub retry_interval_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Debug for PodmConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PodmConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("dialect", &self.dialect)
            .field("protocol", &self.protocol)
            .field("verify_tls", &self.verify_tls)
            .field("retry_count", &self.retry_count)
            .field("retry_interval_secs", &self.retry_interval_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

fn default_protocol() -> String {
    "https".into()
}

fn default_retry_count() -> u32 {
    RetryPolicy::default().attempts
}

fn default_retry_interval_secs() -> u64 {
    RetryPolicy::default().interval.as_secs()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

impl PodmConfig {
    /// Read configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Io` if failed to read file
    /// - `ConfigError::Toml` if the content is not a valid configuration
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|err| ConfigError::Io(path.into(), err))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|err| ConfigError::Io(path.into(), err))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Toml` if the content is not a valid configuration.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Toml)
    }

    /// Base URL with the configured protocol applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the url cannot be parsed.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let url = if self.url.contains("://") {
            self.url.clone()
        } else {
            format!("{}://{}", self.protocol, self.url)
        };
        Url::parse(&url).map_err(|err| ConfigError::InvalidUrl(url, err))
    }

    /// Validate and turn into a [`Connection`].
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidUrl` if the url cannot be parsed
    /// - `ConfigError::UnknownDialect` if the dialect is not supported
    pub fn into_connection(self) -> Result<Connection, ConfigError> {
        let base_url = self.base_url()?;
        let dialect: Dialect = self.dialect.parse().map_err(ConfigError::UnknownDialect)?;
        Ok(
            Connection::new(base_url, Credentials::new(self.username, self.password), dialect)
                .verify_tls(self.verify_tls)
                .retry_count(self.retry_count)
                .retry_interval(Duration::from_secs(self.retry_interval_secs))
                .request_timeout(Duration::from_secs(self.request_timeout_secs)),
        )
    }
}
