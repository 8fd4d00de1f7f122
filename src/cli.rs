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

use clap::Parser;
use std::fmt::Write;
use std::path::PathBuf;

use crate::ssh_config::{ResolvedSettings, SettingValue};

#[derive(Parser, Debug)]
#[command(
    name = "sshconf",
    version,
    about = "Resolve per-host settings from an OpenSSH client configuration",
    long_about = "sshconf reads a client configuration file written in the OpenSSH ssh_config grammar\nand prints the merged, token-expanded settings that apply to a connection to the given host.\nNo connection is made and no external ssh process is invoked.",
    after_help = "EXAMPLES:\n  Show settings for a host:        sshconf web1.example.com\n  Use an alternative config file:  sshconf -F ./vagrant-ssh-config default\n  Inventory summary:               sshconf --summary default\n  List every Host pattern:         sshconf --list-hosts"
)]
pub struct Cli {
    #[arg(
        short = 'F',
        long = "config-file",
        value_name = "ssh_configfile",
        help = "Use alternative SSH configuration file\nDefaults to ~/.ssh/config, then /etc/ssh/ssh_config"
    )]
    pub config_file: Option<PathBuf>,

    #[arg(
        long,
        conflicts_with = "host",
        help = "Print every Host pattern in the configuration, one per line"
    )]
    pub list_hosts: bool,

    #[arg(
        long,
        help = "Print only hostname, port, user and the first identity file"
    )]
    pub summary: bool,

    #[arg(
        short = 'v',
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    #[arg(
        required_unless_present = "list_hosts",
        help = "Host to resolve, as it would be given to ssh"
    )]
    pub host: Option<String>,
}

/// Render settings as `keyword value` lines, one line per list entry
pub fn render_settings(settings: &ResolvedSettings) -> String {
    let mut output = String::new();
    for (key, value) in settings.iter() {
        match value {
            SettingValue::List(values) => {
                for item in values {
                    let _ = writeln!(output, "{key} {item}");
                }
            }
            other => {
                let _ = writeln!(output, "{key} {other}");
            }
        }
    }
    output
}

/// Render the inventory summary of resolved settings
pub fn render_summary(settings: &ResolvedSettings) -> String {
    let summary = settings.connection_summary();
    let mut output = String::new();
    let _ = writeln!(output, "host {}", summary.host);
    if let Some(port) = summary.port {
        let _ = writeln!(output, "port {port}");
    }
    if let Some(user) = summary.user {
        let _ = writeln!(output, "user {user}");
    }
    if let Some(identity_file) = summary.identity_file {
        let _ = writeln!(output, "identityfile {identity_file}");
    }
    output
}
