//! Routing of rollup requests onto the proposal store.

use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::{
    AdvanceCommand, AdvanceRequest, CommandError, FinishStatus, InspectRequest, InspectRoute,
    ProposalError, ProposalId, ProposalStore, RollupRequest, decode_payload,
};

/// Output a request produces for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    Notice(String),
    Report(String),
}

/// Everything the loop needs to resolve one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub emission: Emission,
    pub status: FinishStatus,
}

impl Outcome {
    fn accepted_notice(text: String) -> Self {
        Self { emission: Emission::Notice(text), status: FinishStatus::Accept }
    }

    fn rejected(error: &CommandError) -> Self {
        Self { emission: Emission::Report(error.to_string()), status: FinishStatus::Reject }
    }

    fn answered(json: String) -> Self {
        Self { emission: Emission::Report(json), status: FinishStatus::Accept }
    }
}

/// Owns the proposal store and the logical clock derived from the advance stream.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    store: ProposalStore,
    clock: u64,
}

impl Dispatcher {
    pub fn new(store: ProposalStore) -> Self {
        Self { store, clock: 0 }
    }

    pub fn store(&self) -> &ProposalStore {
        &self.store
    }

    /// Latest block timestamp seen on an advance request.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn handle(&mut self, request: &RollupRequest) -> Outcome {
        match request {
            RollupRequest::AdvanceState(advance) => self.handle_advance(advance),
            RollupRequest::InspectState(inspect) => self.handle_inspect(inspect),
        }
    }

    /// Apply an advance request. Any failure becomes a report and a rejection.
    pub fn handle_advance(&mut self, request: &AdvanceRequest) -> Outcome {
        // Never let a stale timestamp move time backwards.
        self.clock = self.clock.max(request.metadata.timestamp);

        match self.advance(request) {
            Ok(message) => {
                info!(sender = %request.metadata.msg_sender, "{}", message);
                Outcome::accepted_notice(message)
            }
            Err(error) => {
                info!(sender = %request.metadata.msg_sender, "Rejected advance request: {}", error);
                Outcome::rejected(&error)
            }
        }
    }

    fn advance(&mut self, request: &AdvanceRequest) -> Result<String, CommandError> {
        let text = decode_payload(&request.payload)?;
        debug!(payload = %text, "Decoded advance payload");
        let sender = &request.metadata.msg_sender;
        let now = self.clock;

        match AdvanceCommand::decode(&text)? {
            AdvanceCommand::Create { description } => {
                let id = self.store.create_proposal(&description, sender, now)?;
                Ok(format!("Proposal created with ID: {}", id))
            }
            AdvanceCommand::Vote { proposal_id, choice } => {
                let id = ProposalId::parse(&proposal_id).ok_or(ProposalError::NotFound)?;
                self.store.cast_vote(id, sender, &choice, now)?;
                Ok(format!("Vote recorded for proposal {}", id))
            }
        }
    }

    /// Answer an inspect request. Always accepted; errors travel as `{"error": ...}`.
    ///
    /// Inspect requests carry no timestamp, so status and outcome are evaluated at the
    /// latest advance timestamp seen. A proposal whose window has elapsed in wall-clock
    /// time keeps reading as `Open`/`Ongoing` until the next advance request arrives.
    pub fn handle_inspect(&self, request: &InspectRequest) -> Outcome {
        let body = match self.inspect(request) {
            Ok(body) => body,
            Err(error) => json!({ "error": error.to_string() }).to_string(),
        };
        Outcome::answered(body)
    }

    fn inspect(&self, request: &InspectRequest) -> Result<String, CommandError> {
        let route = decode_payload(&request.payload)?;
        debug!(%route, "Decoded inspect route");

        match InspectRoute::parse(&route)? {
            InspectRoute::List => Ok(to_json(&self.store.list_proposals(self.clock))),
            InspectRoute::Result { proposal_id } => {
                let id = ProposalId::parse(&proposal_id).ok_or(ProposalError::NotFound)?;
                Ok(to_json(&self.store.get_result(id, self.clock)?))
            }
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        json!({ "error": format!("Failed to encode response: {}", e) }).to_string()
    })
}
