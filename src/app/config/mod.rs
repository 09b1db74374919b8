//! Environment and file-backed configuration loading.
//!
//! Pure schema parsing lives in `domain::configuration`.

mod load_config;

pub use load_config::{ConfigSource, SERVER_URL_ENV, load_config};
