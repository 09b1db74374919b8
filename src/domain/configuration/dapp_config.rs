//! Dapp configuration domain models.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::AppError;
use crate::domain::proposal::DEFAULT_VOTING_PERIOD_SECS;

/// Configuration loaded from an optional `ballot-dapp.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DappConfig {
    /// Rollup server connection settings.
    #[serde(default)]
    pub rollup: RollupConfig,
    /// Proposal and voting rules.
    #[serde(default)]
    pub governance: GovernanceConfig,
}

impl DappConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        self.rollup.validate()?;
        self.governance.validate()?;
        Ok(())
    }
}

/// Rollup HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RollupConfig {
    /// Base URL of the rollup HTTP server.
    #[serde(default = "default_server_url")]
    pub server_url: Url,
    /// Connect timeout for every call and response timeout for notice and report,
    /// in seconds. The long-polling finish call waits for a response indefinitely.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Maximum attempts per transport call.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay between retries in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl RollupConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.server_url.cannot_be_a_base() {
            return Err(AppError::InvalidConfig(format!(
                "server_url must be a base URL: {}",
                self.server_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::InvalidConfig("timeout_secs must be greater than 0".to_string()));
        }
        if self.max_retries == 0 {
            return Err(AppError::InvalidConfig("max_retries must be greater than 0".to_string()));
        }
        if self.retry_delay_ms == 0 {
            return Err(AppError::InvalidConfig(
                "retry_delay_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_server_url() -> Url {
    Url::parse("http://127.0.0.1:5004").expect("Default server URL must be valid")
}

fn default_timeout() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}

/// Voting rules shared by every replica.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GovernanceConfig {
    /// Seconds after creation during which a proposal accepts votes.
    #[serde(default = "default_voting_period")]
    pub voting_period_secs: u64,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self { voting_period_secs: default_voting_period() }
    }
}

impl GovernanceConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.voting_period_secs == 0 {
            return Err(AppError::InvalidConfig(
                "voting_period_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_voting_period() -> u64 {
    DEFAULT_VOTING_PERIOD_SECS
}

/// Parse and validate configuration from TOML content.
pub fn parse_config_content(content: &str) -> Result<DappConfig, AppError> {
    let config: DappConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
