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

//! Local environment used while expanding `%` tokens
//!
//! Lookups never read the invoking user, home directory or local hostname
//! from process state themselves. A [`LocalContext`] is captured once and
//! handed to the resolver, so tests can substitute every ambient input.

use std::fmt;
use std::io;
use std::sync::Arc;

use super::fqdn::AddressFamily;

/// Name resolution needed to compute the local FQDN
pub trait NameService: Send + Sync + fmt::Debug {
    /// Canonical names reported when resolving `host` restricted to `family`
    fn canonical_names(&self, host: &str, family: AddressFamily) -> io::Result<Vec<String>>;

    /// The platform's standard fully-qualified name for the local `hostname`
    fn local_fqdn(&self, hostname: &str) -> String;
}

/// Ambient values of the invoking process
#[derive(Debug, Clone)]
pub struct LocalContext {
    /// Invoking user (`%u`, and `%r` when no `User` is configured)
    pub local_user: String,
    /// Home directory (`~` and `%d`)
    pub home_dir: String,
    /// Local hostname as the platform reports it, possibly dotted
    pub hostname: String,
    name_service: Arc<dyn NameService>,
}

impl LocalContext {
    pub fn new(
        local_user: impl Into<String>,
        home_dir: impl Into<String>,
        hostname: impl Into<String>,
        name_service: Arc<dyn NameService>,
    ) -> Self {
        Self {
            local_user: local_user.into(),
            home_dir: home_dir.into(),
            hostname: hostname.into(),
            name_service,
        }
    }

    /// Capture the context of the running process
    pub fn from_system() -> Self {
        let local_user = std::env::var("USER")
            .ok()
            .filter(|user| !user.is_empty())
            .unwrap_or_else(whoami::username);

        let home_dir = match dirs::home_dir() {
            Some(home) => home.to_string_lossy().into_owned(),
            None => {
                tracing::warn!("Could not determine home directory; '~' stays unexpanded");
                "~".to_string()
            }
        };

        Self::new(
            local_user,
            home_dir,
            system_hostname(),
            Arc::new(SystemNameService),
        )
    }

    /// Hostname up to its first dot (`%L`)
    pub fn short_hostname(&self) -> &str {
        self.hostname.split('.').next().unwrap_or_default()
    }

    pub fn name_service(&self) -> &dyn NameService {
        self.name_service.as_ref()
    }
}

#[cfg(unix)]
fn system_hostname() -> String {
    match nix::unistd::gethostname() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(e) => {
            tracing::warn!("Failed to read local hostname: {}", e);
            "localhost".to_string()
        }
    }
}

#[cfg(not(unix))]
fn system_hostname() -> String {
    std::env::var("COMPUTERNAME").unwrap_or_else(|_| "localhost".to_string())
}

/// [`NameService`] backed by the platform resolver (`getaddrinfo`)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemNameService;

impl NameService for SystemNameService {
    fn canonical_names(&self, host: &str, family: AddressFamily) -> io::Result<Vec<String>> {
        getaddrinfo_canonical_names(host, family)
    }

    fn local_fqdn(&self, hostname: &str) -> String {
        match getaddrinfo_canonical_names(hostname, AddressFamily::Any) {
            Ok(names) => names
                .into_iter()
                .find(|name| name.contains('.'))
                .unwrap_or_else(|| hostname.to_string()),
            Err(e) => {
                tracing::debug!("Canonical name lookup for '{}' failed: {}", hostname, e);
                hostname.to_string()
            }
        }
    }
}

#[cfg(unix)]
fn getaddrinfo_canonical_names(host: &str, family: AddressFamily) -> io::Result<Vec<String>> {
    use std::ffi::{CStr, CString};
    use std::ptr;

    let c_host = CString::new(host)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "hostname contains NUL"))?;

    let ai_family = match family {
        AddressFamily::Any => libc::AF_UNSPEC,
        AddressFamily::Inet => libc::AF_INET,
        AddressFamily::Inet6 => libc::AF_INET6,
    };

    // SAFETY: hints is fully initialized by zeroing; getaddrinfo owns `result`
    // until freeaddrinfo, and every node is only read while the list is alive.
    unsafe {
        let mut hints: libc::addrinfo = std::mem::zeroed();
        hints.ai_family = ai_family;
        hints.ai_socktype = libc::SOCK_DGRAM;
        hints.ai_protocol = libc::IPPROTO_IP;
        hints.ai_flags = libc::AI_CANONNAME;

        let mut result: *mut libc::addrinfo = ptr::null_mut();
        let rc = libc::getaddrinfo(c_host.as_ptr(), ptr::null(), &hints, &mut result);
        if rc != 0 {
            let message = CStr::from_ptr(libc::gai_strerror(rc))
                .to_string_lossy()
                .into_owned();
            return Err(io::Error::other(message));
        }

        let mut names = Vec::new();
        let mut node = result;
        while !node.is_null() {
            let info = &*node;
            if !info.ai_canonname.is_null() {
                let name = CStr::from_ptr(info.ai_canonname).to_string_lossy();
                if !name.is_empty() {
                    names.push(name.into_owned());
                }
            }
            node = info.ai_next;
        }
        libc::freeaddrinfo(result);

        Ok(names)
    }
}

#[cfg(not(unix))]
fn getaddrinfo_canonical_names(_host: &str, _family: AddressFamily) -> io::Result<Vec<String>> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "canonical name lookup is not supported on this platform",
    ))
}
