// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Core data structures for SSH configuration

use std::collections::BTreeMap;
use std::fmt;

/// Port substituted for `%p` when the configuration does not set `Port`
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Keywords that may repeat and accumulate their values in file order
pub const MULTI_VALUED_KEYS: [&str; 3] = ["identityfile", "localforward", "remoteforward"];

/// The only multi-valued keyword that also accumulates across blocks
pub(crate) const IDENTITY_FILE: &str = "identityfile";

pub(crate) const PROXY_COMMAND: &str = "proxycommand";

/// Check whether a lowercase keyword is one of the multi-valued keys
pub fn is_multi_valued(key: &str) -> bool {
    MULTI_VALUED_KEYS.contains(&key)
}

/// A single setting value as stored in a block or a lookup result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    /// A single string value
    Scalar(String),
    /// Ordered values of a multi-valued key
    List(Vec<String>),
    /// `ProxyCommand none`: explicitly turned off, distinct from absent
    Disabled,
}

impl SettingValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            SettingValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            SettingValue::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, SettingValue::Disabled)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Scalar(value) => write!(f, "{value}"),
            SettingValue::List(values) => write!(f, "{}", values.join(" ")),
            SettingValue::Disabled => write!(f, "none"),
        }
    }
}

/// One `Host` section and the settings declared under it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigBlock {
    /// Host patterns in file order, negated ones keep their leading `!`
    pub patterns: Vec<String>,
    /// Lowercase keyword to value
    pub settings: BTreeMap<String, SettingValue>,
}

impl ConfigBlock {
    /// Create an empty block for the given patterns
    pub fn new(patterns: Vec<String>) -> Self {
        Self {
            patterns,
            settings: BTreeMap::new(),
        }
    }

    /// The block that collects settings appearing before the first `Host` line
    pub fn implicit() -> Self {
        Self::new(vec!["*".to_string()])
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.settings.get(key)
    }
}

impl fmt::Display for ConfigBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Host {}", self.patterns.join(" "))?;
        if let Some(SettingValue::Scalar(hostname)) = self.settings.get("hostname") {
            write!(f, " ({hostname})")?;
        }
        if let Some(SettingValue::Scalar(user)) = self.settings.get("user") {
            write!(f, " user={user}")?;
        }
        if let Some(SettingValue::Scalar(port)) = self.settings.get("port") {
            write!(f, " port={port}")?;
        }
        Ok(())
    }
}

/// Merged and expanded settings for one looked-up host
///
/// Produced fresh by every lookup and never shared with the store it came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedSettings {
    settings: BTreeMap<String, SettingValue>,
}

impl ResolvedSettings {
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.settings.get(key)
    }

    /// Scalar value for `key`, if present and not a list
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(SettingValue::as_scalar)
    }

    /// List value for `key`, if present and multi-valued
    pub fn list(&self, key: &str) -> Option<&[String]> {
        self.settings.get(key).and_then(SettingValue::as_list)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.settings.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Entries sorted by keyword
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.settings.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Effective hostname; every lookup result carries one
    pub fn hostname(&self) -> &str {
        self.scalar("hostname").unwrap_or_default()
    }

    /// Reduce the settings to what an inventory needs to reach the host
    pub fn connection_summary(&self) -> ConnectionSummary {
        ConnectionSummary {
            host: self.hostname().to_string(),
            port: self.scalar("port").map(str::to_string),
            user: self.scalar("user").map(str::to_string),
            identity_file: self
                .list(IDENTITY_FILE)
                .and_then(|files| files.first())
                .cloned(),
        }
    }

    pub fn into_inner(self) -> BTreeMap<String, SettingValue> {
        self.settings
    }
}

impl From<BTreeMap<String, SettingValue>> for ResolvedSettings {
    fn from(settings: BTreeMap<String, SettingValue>) -> Self {
        Self { settings }
    }
}

/// Connection parameters for one host, as handed to inventory consumers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSummary {
    pub host: String,
    pub port: Option<String>,
    pub user: Option<String>,
    /// First configured identity file, already expanded
    pub identity_file: Option<String>,
}

impl fmt::Display for ConnectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.host)?;
        if let Some(ref user) = self.user {
            write!(f, " user={user}")?;
        }
        if let Some(ref port) = self.port {
            write!(f, " port={port}")?;
        }
        if let Some(ref identity_file) = self.identity_file {
            write!(f, " identity={identity_file}")?;
        }
        Ok(())
    }
}
