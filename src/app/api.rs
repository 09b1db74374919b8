//! API Facade for the application.
//!
//! This module glues configuration, transport construction and the request loop
//! together.

use std::convert::Infallible;

use tracing::info;

use crate::adapters::{HttpRollupTransport, RetryPolicy, RetryingRollupTransport};
use crate::app::config::{ConfigSource, load_config};
use crate::app::dispatch::Dispatcher;
use crate::app::request_loop::RequestLoop;
use crate::domain::{DappConfig, ProposalStore};

pub use crate::domain::AppError;

/// Build the request loop for a configuration, talking HTTP to the rollup server.
pub fn build_request_loop(
    config: &DappConfig,
) -> Result<RequestLoop<RetryingRollupTransport>, AppError> {
    let http = HttpRollupTransport::new(&config.rollup)?;
    let transport =
        RetryingRollupTransport::new(Box::new(http), RetryPolicy::from_config(&config.rollup));
    let dispatcher = Dispatcher::new(ProposalStore::new(config.governance.voting_period_secs));
    Ok(RequestLoop::new(transport, dispatcher))
}

/// Load configuration and process rollup requests until the transport fails.
pub fn serve(source: &ConfigSource) -> Result<Infallible, AppError> {
    let config = load_config(source)?;
    info!("HTTP rollup_server url is {}", config.rollup.server_url);
    info!("Voting period is {} seconds", config.governance.voting_period_secs);

    build_request_loop(&config)?.run()
}

/// Render the effective configuration as TOML.
pub fn effective_config(source: &ConfigSource) -> Result<String, AppError> {
    let config = load_config(source)?;
    toml::to_string(&config)
        .map_err(|e| AppError::InvalidConfig(format!("Failed to render configuration: {}", e)))
}
