pub mod rollup_http;

pub use rollup_http::{HttpRollupTransport, RetryPolicy, RetryingRollupTransport};
