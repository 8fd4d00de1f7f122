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

//! SSH configuration parsing and host lookup
//!
//! This module parses client configuration files in the OpenSSH grammar into
//! ordered `Host` blocks and answers per-host lookups against them: matching
//! blocks are merged in file order and `%` tokens are expanded.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::io::BufRead;
use std::path::Path;

// Internal modules
mod context;
mod error;
mod expansion;
mod fqdn;
mod parser;
mod pattern;
mod resolver;
#[cfg(test)]
mod resolver_tests;
mod types;

// Re-export public types
pub use context::{LocalContext, NameService, SystemNameService};
pub use error::ParseError;
pub use fqdn::{AddressFamily, LazyHostname};
pub use resolver::Resolver;
pub use types::{
    is_multi_valued, ConfigBlock, ConnectionSummary, ResolvedSettings, SettingValue,
    DEFAULT_SSH_PORT, MULTI_VALUED_KEYS,
};

/// Parsed SSH configuration: blocks in file order, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshConfig {
    blocks: Vec<ConfigBlock>,
}

impl Default for SshConfig {
    /// Same as parsing an empty file: one implicit `Host *` block
    fn default() -> Self {
        Self {
            blocks: vec![ConfigBlock::implicit()],
        }
    }
}

impl SshConfig {
    /// Create an empty SSH configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse SSH configuration from a string
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        let blocks = parser::parse(content)?;
        Ok(Self { blocks })
    }

    /// Parse SSH configuration line by line from a reader
    pub fn parse_reader<R: BufRead>(reader: R) -> Result<Self, ParseError> {
        let blocks = parser::parse_reader(reader)?;
        Ok(Self { blocks })
    }

    /// Load SSH configuration from a file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read SSH config file: {}", path.display()))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse SSH config file: {}", path.display()))?;
        tracing::debug!(
            "Loaded {} blocks from {}",
            config.blocks.len(),
            path.display()
        );
        Ok(config)
    }

    /// Load SSH configuration from the default locations
    pub fn load_default() -> Result<Self> {
        // Try user-specific SSH config first
        if let Some(home_dir) = dirs::home_dir() {
            let user_config = home_dir.join(".ssh").join("config");
            if user_config.is_file() {
                return Self::load_from_file(&user_config);
            }
        }

        // Try system-wide SSH config
        let system_config = Path::new("/etc/ssh/ssh_config");
        if system_config.is_file() {
            return Self::load_from_file(system_config);
        }

        tracing::debug!("No SSH config file found, using empty configuration");
        Ok(Self::new())
    }

    /// Bind this configuration to a local context for lookups
    pub fn resolver<'a>(&'a self, context: &'a LocalContext) -> Resolver<'a> {
        Resolver::new(self, context)
    }

    /// Resolve settings for `hostname` with an explicit local context
    pub fn lookup(&self, hostname: &str, context: &LocalContext) -> ResolvedSettings {
        resolver::find_host_config(&self.blocks, hostname, context)
    }

    /// Every literal pattern token across all blocks (negated ones keep `!`)
    pub fn hostnames(&self) -> BTreeSet<String> {
        resolver::collect_hostnames(&self.blocks)
    }

    /// All blocks in file order
    pub fn blocks(&self) -> &[ConfigBlock] {
        &self.blocks
    }
}
