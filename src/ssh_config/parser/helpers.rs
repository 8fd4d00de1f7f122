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

//! Helper functions for SSH configuration parsing

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ssh_config::error::ParseError;

/// `Key Value` or `Key=Value`, whitespace around `=` optional
static SETTING_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)(?:\s*=\s*|\s+)(.+)").expect("setting pattern is valid"));

/// Split a trimmed line into its lowercase keyword and raw value
pub(super) fn split_setting(line: &str) -> Option<(String, &str)> {
    let captures = SETTING_LINE.captures(line)?;
    let key = captures.get(1)?.as_str().to_lowercase();
    let value = captures.get(2)?.as_str();
    Some((key, value))
}

/// Strip one pair of surrounding double quotes
pub(super) fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// `ProxyCommand none`, compared case-insensitively
pub(super) fn is_disabled_proxy(value: &str) -> bool {
    value.eq_ignore_ascii_case("none")
}

/// Escape `#` outside quotes so shell splitting keeps it as part of a word
fn escape_hashes(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut in_single = false;
    let mut in_double = false;
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' if !in_single => {
                escaped.push(c);
                if let Some(next) = chars.next() {
                    escaped.push(next);
                }
                continue;
            }
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '#' if !in_single && !in_double => escaped.push('\\'),
            _ => {}
        }
        escaped.push(c);
    }
    escaped
}

/// Tokenize a Host value with shell word splitting; `#` is never a comment here
pub(super) fn split_host_patterns(
    value: &str,
    line_number: usize,
) -> Result<Vec<String>, ParseError> {
    shell_words::split(&escape_hashes(value)).map_err(|_| ParseError::MalformedHostPattern {
        line_number,
        value: value.to_string(),
    })
}
