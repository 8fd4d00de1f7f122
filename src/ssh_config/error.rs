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

//! Error types for SSH configuration parsing

use thiserror::Error;

/// Errors that abort a parse; no partial configuration is produced
#[derive(Debug, Error)]
pub enum ParseError {
    /// A non-blank, non-comment line that is not `Key Value` or `Key=Value`
    #[error("unparsable line {line_number}: '{line}'")]
    MalformedLine { line_number: usize, line: String },

    /// A `Host` value with unbalanced quoting
    #[error("unparsable host patterns at line {line_number}: '{value}'")]
    MalformedHostPattern { line_number: usize, value: String },

    /// The underlying reader failed
    #[error("failed to read line {line_number}: {source}")]
    Read {
        line_number: usize,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// 1-based line the error was raised on
    pub fn line_number(&self) -> usize {
        match self {
            ParseError::MalformedLine { line_number, .. }
            | ParseError::MalformedHostPattern { line_number, .. }
            | ParseError::Read { line_number, .. } => *line_number,
        }
    }
}
