use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::{AppError, FinishStatus, RollupRequest};
use crate::ports::RollupTransport;

/// Output recorded by [`FakeRollupTransport`], as decoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Notice(String),
    Report(String),
}

/// Scripted transport: each `finish` pops the next scripted answer.
#[derive(Clone, Default)]
pub struct FakeRollupTransport {
    script: Arc<Mutex<VecDeque<Result<Option<RollupRequest>, AppError>>>>,
    finish_statuses: Arc<Mutex<Vec<FinishStatus>>>,
    sent: Arc<Mutex<Vec<Sent>>>,
}

impl FakeRollupTransport {
    pub fn new(script: Vec<Result<Option<RollupRequest>, AppError>>) -> Self {
        Self { script: Arc::new(Mutex::new(script.into())), ..Default::default() }
    }

    pub fn finish_statuses(&self) -> Vec<FinishStatus> {
        self.finish_statuses.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

impl RollupTransport for FakeRollupTransport {
    fn finish(&self, status: FinishStatus) -> Result<Option<RollupRequest>, AppError> {
        self.finish_statuses.lock().unwrap().push(status);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::transport("test: script exhausted", None)))
    }

    fn notice(&self, payload: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(Sent::Notice(payload.to_string()));
        Ok(())
    }

    fn report(&self, payload: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(Sent::Report(payload.to_string()));
        Ok(())
    }
}
