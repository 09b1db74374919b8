mod rollup_transport;

pub use rollup_transport::RollupTransport;
