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

//! Deferred computation of the local fully-qualified hostname (`%l`)

use std::fmt;

use once_cell::unsync::OnceCell;

use super::context::LocalContext;

/// Address family preference from the `AddressFamily` setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressFamily {
    #[default]
    Any,
    Inet,
    Inet6,
}

impl AddressFamily {
    /// Interpret a setting value; unknown values behave like `any`
    pub fn from_setting(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "inet" => AddressFamily::Inet,
            "inet6" => AddressFamily::Inet6,
            "any" => AddressFamily::Any,
            other => {
                tracing::debug!("Unknown AddressFamily '{}', treating as 'any'", other);
                AddressFamily::Any
            }
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::Any => write!(f, "any"),
            AddressFamily::Inet => write!(f, "inet"),
            AddressFamily::Inet6 => write!(f, "inet6"),
        }
    }
}

/// Local FQDN, resolved on first use and memoized
///
/// One instance belongs to exactly one lookup; the cell is not `Sync`.
#[derive(Debug)]
pub struct LazyHostname<'a> {
    cache: OnceCell<String>,
    address_family: AddressFamily,
    context: &'a LocalContext,
}

impl<'a> LazyHostname<'a> {
    pub fn new(address_family: AddressFamily, context: &'a LocalContext) -> Self {
        Self {
            cache: OnceCell::new(),
            address_family,
            context,
        }
    }

    /// The FQDN, computing it on the first call
    pub fn get(&self) -> &str {
        self.cache.get_or_init(|| self.resolve())
    }

    fn resolve(&self) -> String {
        let short_name = self.context.short_hostname();

        if self.address_family != AddressFamily::Any {
            match self
                .context
                .name_service()
                .canonical_names(short_name, self.address_family)
            {
                Ok(names) => {
                    if let Some(name) = names.into_iter().find(|name| name.contains('.')) {
                        return name;
                    }
                    tracing::debug!(
                        "No dotted canonical name for '{}' ({}), using local FQDN",
                        short_name,
                        self.address_family
                    );
                }
                Err(e) => {
                    tracing::debug!(
                        "Resolving '{}' ({}) failed: {}. Using local FQDN",
                        short_name,
                        self.address_family,
                        e
                    );
                }
            }
        }

        self.context.name_service().local_fqdn(&self.context.hostname)
    }
}

impl fmt::Display for LazyHostname<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.get())
    }
}
