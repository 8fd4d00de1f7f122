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

//! Configuration resolution and merging logic for SSH configuration
//!
//! Matching blocks are merged in file order: the first block to set a key
//! wins, except that `IdentityFile` lists from every matching block are
//! concatenated.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use super::context::LocalContext;
use super::expansion::expand_settings;
use super::pattern::allowed;
use super::types::{ConfigBlock, ResolvedSettings, SettingValue, IDENTITY_FILE, PROXY_COMMAND};
use super::SshConfig;

/// Answers lookups against one parsed configuration and local context
///
/// Lookups only read the configuration, so one store can serve several
/// resolvers on different threads.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    config: &'a SshConfig,
    context: &'a LocalContext,
}

impl<'a> Resolver<'a> {
    pub fn new(config: &'a SshConfig, context: &'a LocalContext) -> Self {
        Self { config, context }
    }

    /// Merged, expanded settings that apply to a connection to `hostname`
    pub fn lookup(&self, hostname: &str) -> ResolvedSettings {
        find_host_config(self.config.blocks(), hostname, self.context)
    }

    /// Every literal pattern token in the configuration
    pub fn hostnames(&self) -> BTreeSet<String> {
        self.config.hostnames()
    }
}

/// Find configuration for a specific hostname
pub(super) fn find_host_config(
    blocks: &[ConfigBlock],
    hostname: &str,
    context: &LocalContext,
) -> ResolvedSettings {
    let mut merged = BTreeMap::new();

    for (index, block) in blocks.iter().enumerate() {
        if allowed(&block.patterns, hostname) {
            tracing::trace!("Block {} ({}) applies to '{}'", index, block, hostname);
            merge_block(&mut merged, block);
        }
    }

    expand_settings(&mut merged, hostname, context);

    if merged
        .get(PROXY_COMMAND)
        .is_some_and(SettingValue::is_disabled)
    {
        merged.remove(PROXY_COMMAND);
    }

    ResolvedSettings::from(merged)
}

/// Merge one matching block into the settings collected so far
pub(super) fn merge_block(merged: &mut BTreeMap<String, SettingValue>, block: &ConfigBlock) {
    for (key, value) in &block.settings {
        match merged.entry(key.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(value.clone());
            }
            Entry::Occupied(mut slot) => {
                if key != IDENTITY_FILE {
                    continue;
                }
                if let (SettingValue::List(existing), SettingValue::List(more)) =
                    (slot.get_mut(), value)
                {
                    existing.extend(more.iter().cloned());
                }
            }
        }
    }
}

/// Union of every pattern token across blocks, negation markers included
pub(super) fn collect_hostnames(blocks: &[ConfigBlock]) -> BTreeSet<String> {
    blocks
        .iter()
        .flat_map(|block| block.patterns.iter().cloned())
        .collect()
}
