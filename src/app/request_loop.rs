//! Top-level finish/dispatch control loop.

use std::convert::Infallible;

use tracing::{info, warn};

use crate::app::dispatch::{Dispatcher, Emission};
use crate::domain::{AppError, FinishStatus};
use crate::ports::RollupTransport;

/// What one iteration of the loop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The host had no pending work.
    Idle,
    /// One request was handled with the given outcome.
    Processed(FinishStatus),
}

/// Drives the rollup handshake: declare the previous outcome, receive the next
/// request, dispatch it, emit its output. Strictly one request at a time.
pub struct RequestLoop<T: RollupTransport> {
    transport: T,
    dispatcher: Dispatcher,
    status: FinishStatus,
}

impl<T: RollupTransport> RequestLoop<T> {
    pub fn new(transport: T, dispatcher: Dispatcher) -> Self {
        Self { transport, dispatcher, status: FinishStatus::Accept }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Status that the next finish handshake will declare.
    pub fn pending_status(&self) -> FinishStatus {
        self.status
    }

    /// Perform one handshake and, if work arrived, process it.
    pub fn step(&mut self) -> Result<Step, AppError> {
        let request = match self.transport.finish(self.status) {
            Ok(Some(request)) => request,
            Ok(None) => {
                info!("No pending rollup request, trying again");
                return Ok(Step::Idle);
            }
            Err(AppError::Protocol(message)) => {
                warn!("Discarding malformed rollup request: {}", message);
                self.status = FinishStatus::Reject;
                return Ok(Step::Processed(self.status));
            }
            Err(error) => return Err(error),
        };

        info!(request_type = request.kind(), "Received rollup request");
        let outcome = self.dispatcher.handle(&request);

        match &outcome.emission {
            Emission::Notice(payload) => self.transport.notice(payload)?,
            Emission::Report(payload) => self.transport.report(payload)?,
        }

        self.status = outcome.status;
        Ok(Step::Processed(outcome.status))
    }

    /// Loop forever. Returns only when the transport fails for good.
    pub fn run(&mut self) -> Result<Infallible, AppError> {
        loop {
            self.step()?;
        }
    }
}
