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

//! `%` token expansion for resolved settings
//!
//! Only `ControlPath`, `IdentityFile` and `ProxyCommand` carry tokens, each
//! with its own table. Every value is rewritten in one left-to-right scan, so
//! text produced by a substitution is never scanned again.

use std::collections::BTreeMap;

use super::context::LocalContext;
use super::fqdn::{AddressFamily, LazyHostname};
use super::types::{SettingValue, DEFAULT_SSH_PORT, IDENTITY_FILE, PROXY_COMMAND};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    HomeDir,
    RemoteHost,
    LocalFqdn,
    LocalShortHost,
    QueriedHost,
    Port,
    RemoteUser,
    LocalUser,
}

type TokenTable = &'static [(&'static str, Token)];

const CONTROL_PATH_TOKENS: TokenTable = &[
    ("%h", Token::RemoteHost),
    ("%l", Token::LocalFqdn),
    ("%L", Token::LocalShortHost),
    ("%n", Token::QueriedHost),
    ("%p", Token::Port),
    ("%r", Token::RemoteUser),
    ("%u", Token::LocalUser),
];

// "~" only expands at the start of the value
const IDENTITY_FILE_TOKENS: TokenTable = &[
    ("~", Token::HomeDir),
    ("%d", Token::HomeDir),
    ("%h", Token::RemoteHost),
    ("%l", Token::LocalFqdn),
    ("%u", Token::LocalUser),
    ("%r", Token::RemoteUser),
];

const PROXY_COMMAND_TOKENS: TokenTable = &[
    ("%h", Token::RemoteHost),
    ("%p", Token::Port),
    ("%r", Token::RemoteUser),
];

const TOKEN_TABLES: [(&str, TokenTable); 3] = [
    ("controlpath", CONTROL_PATH_TOKENS),
    (IDENTITY_FILE, IDENTITY_FILE_TOKENS),
    (PROXY_COMMAND, PROXY_COMMAND_TOKENS),
];

/// Substitution sources for one lookup
struct TokenValues<'a> {
    queried_host: &'a str,
    remote_host: String,
    port: String,
    remote_user: String,
    context: &'a LocalContext,
    fqdn: LazyHostname<'a>,
}

impl TokenValues<'_> {
    fn value(&self, token: Token) -> &str {
        match token {
            Token::HomeDir => &self.context.home_dir,
            Token::RemoteHost => &self.remote_host,
            Token::LocalFqdn => self.fqdn.get(),
            Token::LocalShortHost => self.context.short_hostname(),
            Token::QueriedHost => self.queried_host,
            Token::Port => &self.port,
            Token::RemoteUser => &self.remote_user,
            Token::LocalUser => &self.context.local_user,
        }
    }
}

/// Expand merged settings in place for a lookup of `hostname`
///
/// Guarantees a `hostname` entry. The effective port and remote user are only
/// substitution sources and are never written back.
pub(crate) fn expand_settings(
    settings: &mut BTreeMap<String, SettingValue>,
    hostname: &str,
    context: &LocalContext,
) {
    let remote_host = match settings.get("hostname").and_then(SettingValue::as_scalar) {
        Some(configured) => configured.replace("%h", hostname),
        None => hostname.to_string(),
    };
    settings.insert(
        "hostname".to_string(),
        SettingValue::Scalar(remote_host.clone()),
    );

    let port = settings
        .get("port")
        .and_then(SettingValue::as_scalar)
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_SSH_PORT.to_string());
    let remote_user = settings
        .get("user")
        .and_then(SettingValue::as_scalar)
        .unwrap_or(context.local_user.as_str())
        .to_string();
    let address_family = settings
        .get("addressfamily")
        .and_then(SettingValue::as_scalar)
        .map(AddressFamily::from_setting)
        .unwrap_or_default();

    let values = TokenValues {
        queried_host: hostname,
        remote_host,
        port,
        remote_user,
        context,
        fqdn: LazyHostname::new(address_family, context),
    };

    for (key, table) in TOKEN_TABLES {
        match settings.get_mut(key) {
            Some(SettingValue::Scalar(value)) => *value = substitute(value, table, &values),
            Some(SettingValue::List(items)) => {
                for item in items.iter_mut() {
                    *item = substitute(item, table, &values);
                }
            }
            Some(SettingValue::Disabled) | None => {}
        }
    }
}

fn substitute(input: &str, table: TokenTable, values: &TokenValues<'_>) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    if let Some(stripped) = rest.strip_prefix('~') {
        if let Some((_, token)) = table.iter().find(|(pattern, _)| *pattern == "~") {
            output.push_str(values.value(*token));
            rest = stripped;
        }
    }

    while let Some(pos) = rest.find('%') {
        output.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match table
            .iter()
            .find(|(pattern, _)| pattern.starts_with('%') && tail.starts_with(*pattern))
        {
            Some((pattern, token)) => {
                output.push_str(values.value(*token));
                rest = &tail[pattern.len()..];
            }
            None => {
                output.push('%');
                rest = &tail[1..];
            }
        }
    }

    output.push_str(rest);
    output
}
