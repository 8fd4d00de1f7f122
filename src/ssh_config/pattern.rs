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

//! Pattern matching utilities for SSH configuration
//!
//! Host patterns are shell-style globs supporting `*` and `?`, optionally
//! negated with a leading `!`. Matching is case-sensitive.

/// Check whether a block with the given patterns applies to `hostname`
///
/// A matching negated pattern vetoes the block outright, even when an earlier
/// positive pattern already matched. Otherwise the block applies if any
/// positive pattern matched.
pub(crate) fn allowed(patterns: &[String], hostname: &str) -> bool {
    let mut matched = false;
    for pattern in patterns {
        if let Some(negated) = pattern.strip_prefix('!') {
            if wildcard_match(hostname, negated) {
                return false;
            }
        } else if wildcard_match(hostname, pattern) {
            matched = true;
        }
    }
    matched
}

/// Glob match of `text` against `pattern`
pub(crate) fn wildcard_match(text: &str, pattern: &str) -> bool {
    let text_chars: Vec<char> = text.chars().collect();
    let pattern_chars: Vec<char> = pattern.chars().collect();

    let mut text_idx = 0;
    let mut pattern_idx = 0;
    // Position of the last '*' seen and the text index it is currently absorbing up to
    let mut backtrack: Option<(usize, usize)> = None;

    while text_idx < text_chars.len() {
        match pattern_chars.get(pattern_idx) {
            Some('*') => {
                backtrack = Some((pattern_idx, text_idx));
                pattern_idx += 1;
            }
            Some('?') => {
                text_idx += 1;
                pattern_idx += 1;
            }
            Some(&c) if c == text_chars[text_idx] => {
                text_idx += 1;
                pattern_idx += 1;
            }
            _ => match backtrack {
                // Let the last '*' swallow one more character and retry
                Some((star_idx, star_text_idx)) => {
                    backtrack = Some((star_idx, star_text_idx + 1));
                    pattern_idx = star_idx + 1;
                    text_idx = star_text_idx + 1;
                }
                None => return false,
            },
        }
    }

    pattern_chars[pattern_idx..].iter().all(|&c| c == '*')
}
