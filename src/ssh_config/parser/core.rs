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

//! Core SSH configuration parsing functionality
//!
//! The scanner keeps a single pending block. Settings seen before the first
//! `Host` line land in an implicit `Host *` block, which is always emitted
//! first. A `Host` line closes the pending block and opens the next one.

use std::io::{self, BufRead};

use super::helpers::{is_disabled_proxy, split_host_patterns, split_setting, unquote};
use crate::ssh_config::error::ParseError;
use crate::ssh_config::types::{is_multi_valued, ConfigBlock, SettingValue, PROXY_COMMAND};

/// Parse SSH configuration content
pub fn parse(content: &str) -> Result<Vec<ConfigBlock>, ParseError> {
    parse_lines(content.lines().map(Ok::<_, io::Error>))
}

/// Parse SSH configuration from a buffered reader
pub fn parse_reader<R: BufRead>(reader: R) -> Result<Vec<ConfigBlock>, ParseError> {
    parse_lines(reader.lines())
}

/// Parse a sequence of configuration lines into blocks in file order
pub fn parse_lines<I, S>(lines: I) -> Result<Vec<ConfigBlock>, ParseError>
where
    I: IntoIterator<Item = io::Result<S>>,
    S: AsRef<str>,
{
    let mut blocks = Vec::new();
    let mut current = ConfigBlock::implicit();

    for (index, line) in lines.into_iter().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|source| ParseError::Read {
            line_number,
            source,
        })?;
        let line = line.as_ref().trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (keyword, value) = split_setting(line).ok_or_else(|| ParseError::MalformedLine {
            line_number,
            line: line.to_string(),
        })?;

        if keyword == "host" {
            let patterns = split_host_patterns(value, line_number)?;
            tracing::debug!("Opening Host block {:?} at line {}", patterns, line_number);
            blocks.push(std::mem::replace(&mut current, ConfigBlock::new(patterns)));
        } else {
            apply_setting(&mut current, keyword, value);
        }
    }

    blocks.push(current);
    Ok(blocks)
}

/// Record one setting in a block; the first occurrence of a single-valued key wins
pub(super) fn apply_setting(block: &mut ConfigBlock, keyword: String, value: &str) {
    if keyword == PROXY_COMMAND && is_disabled_proxy(value) {
        block
            .settings
            .entry(keyword)
            .or_insert(SettingValue::Disabled);
        return;
    }

    let value = unquote(value).to_string();

    if is_multi_valued(&keyword) {
        if let SettingValue::List(values) = block
            .settings
            .entry(keyword)
            .or_insert_with(|| SettingValue::List(Vec::new()))
        {
            values.push(value);
        }
    } else if block.settings.contains_key(&keyword) {
        tracing::trace!("Ignoring repeated '{}' within the same block", keyword);
    } else {
        block.settings.insert(keyword, SettingValue::Scalar(value));
    }
}
