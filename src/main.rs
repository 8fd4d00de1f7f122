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

use anyhow::Result;
use clap::Parser;

use sshconf::{
    cli::{render_settings, render_summary, Cli},
    utils::init_logging,
    LocalContext, SshConfig,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match cli.config_file.as_deref() {
        Some(path) => SshConfig::load_from_file(path)?,
        None => SshConfig::load_default()?,
    };

    if cli.list_hosts {
        for pattern in config.hostnames() {
            println!("{pattern}");
        }
        return Ok(());
    }

    let Some(host) = cli.host.as_deref() else {
        anyhow::bail!("a host to resolve is required");
    };

    let context = LocalContext::from_system();
    let settings = config.resolver(&context).lookup(host);
    tracing::info!("Resolved {} settings for '{}'", settings.len(), host);

    if cli.summary {
        print!("{}", render_summary(&settings));
    } else {
        print!("{}", render_settings(&settings));
    }

    Ok(())
}
