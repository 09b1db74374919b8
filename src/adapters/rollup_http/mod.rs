pub mod http;
pub mod retrying;

pub use self::http::HttpRollupTransport;
pub use self::retrying::{RetryPolicy, RetryingRollupTransport};
