use thiserror::Error;

/// Rejection reasons raised by the proposal store.
///
/// Display strings are the exact texts reported back to the rollup host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProposalError {
    /// A required field is missing or malformed.
    #[error("{0}")]
    InvalidInput(String),

    #[error("Proposal does not exist.")]
    NotFound,

    #[error("Voting period has ended for this proposal.")]
    WindowClosed,

    #[error("You have already voted on this proposal.")]
    DuplicateVote,
}

impl ProposalError {
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        ProposalError::InvalidInput(message.into())
    }
}
