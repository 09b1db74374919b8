//! Rollup host transport port definition.

use crate::domain::{AppError, FinishStatus, RollupRequest};

/// Port for exchanging requests and outputs with the rollup host.
///
/// Every call blocks until the host answers. Payloads are plain text; encoding them for
/// the wire is the implementation's concern.
pub trait RollupTransport {
    /// Declare the outcome of the previous request and wait for the next one.
    ///
    /// Returns `None` when the host has no pending work.
    fn finish(&self, status: FinishStatus) -> Result<Option<RollupRequest>, AppError>;

    /// Emit an accepted output.
    fn notice(&self, payload: &str) -> Result<(), AppError>;

    /// Emit a diagnostic output.
    fn report(&self, payload: &str) -> Result<(), AppError>;
}

impl<T: RollupTransport + ?Sized> RollupTransport for Box<T> {
    fn finish(&self, status: FinishStatus) -> Result<Option<RollupRequest>, AppError> {
        (**self).finish(status)
    }

    fn notice(&self, payload: &str) -> Result<(), AppError> {
        (**self).notice(payload)
    }

    fn report(&self, payload: &str) -> Result<(), AppError> {
        (**self).report(payload)
    }
}
