pub mod dapp_config;

pub use dapp_config::{DappConfig, GovernanceConfig, RollupConfig, parse_config_content};
