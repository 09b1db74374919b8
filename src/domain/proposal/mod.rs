//! Proposal and vote state.

mod error;
mod model;
mod store;

pub use error::ProposalError;
pub use model::{
    Proposal, ProposalId, ProposalOutcome, ProposalResult, ProposalStatus, ProposalSummary,
    VoteChoice,
};
pub use store::{DEFAULT_VOTING_PERIOD_SECS, ProposalStore};
