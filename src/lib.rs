//! ballot-dapp: deterministic proposal and voting state machine for a rollup
//! execution environment.
//!
//! The host delivers advance requests (state changes) and inspect requests
//! (queries) one at a time; every replica that applies the same stream reaches
//! the same proposal state.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api::{build_request_loop, effective_config, serve};
pub use app::config::ConfigSource;
pub use app::dispatch::{Dispatcher, Emission, Outcome};
pub use app::request_loop::{RequestLoop, Step};
pub use domain::AppError;
