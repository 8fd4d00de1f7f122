pub mod cli;
pub mod ssh_config;
pub mod utils;

pub use cli::Cli;
pub use ssh_config::{
    AddressFamily, ConfigBlock, ConnectionSummary, LocalContext, NameService, ParseError,
    ResolvedSettings, Resolver, SettingValue, SshConfig, SystemNameService,
};
