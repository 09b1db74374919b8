pub mod fake_rollup_transport;

pub use fake_rollup_transport::{FakeRollupTransport, Sent};
