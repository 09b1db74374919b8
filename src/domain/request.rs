//! Rollup request and outcome types exchanged with the host.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of processing one request, also sent as the next finish status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinishStatus {
    #[default]
    Accept,
    Reject,
}

impl FinishStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinishStatus::Accept => "accept",
            FinishStatus::Reject => "reject",
        }
    }
}

impl fmt::Display for FinishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of work handed out by the finish handshake.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "request_type", content = "data", rename_all = "snake_case")]
pub enum RollupRequest {
    AdvanceState(AdvanceRequest),
    InspectState(InspectRequest),
}

impl RollupRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            RollupRequest::AdvanceState(_) => "advance_state",
            RollupRequest::InspectState(_) => "inspect_state",
        }
    }
}

/// State-changing input, delivered in the global input order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdvanceRequest {
    pub metadata: AdvanceMetadata,
    /// Hex-encoded payload.
    pub payload: String,
}

/// Host-supplied, pre-authenticated input metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdvanceMetadata {
    pub msg_sender: String,
    /// Block timestamp in seconds; the only time source of the state machine.
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default)]
    pub epoch_index: Option<u64>,
    #[serde(default)]
    pub input_index: Option<u64>,
    #[serde(default)]
    pub block_number: Option<u64>,
}

/// Read-only query.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InspectRequest {
    /// Hex-encoded payload.
    pub payload: String,
}
