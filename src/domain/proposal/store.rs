use std::collections::BTreeMap;

use super::error::ProposalError;
use super::model::{Proposal, ProposalId, ProposalResult, ProposalSummary, VoteChoice};

/// Five minutes, in seconds of rollup block time.
pub const DEFAULT_VOTING_PERIOD_SECS: u64 = 5 * 60;

const DESCRIPTION_REQUIRED: &str = "Proposal description is required.";
const INVALID_VOTE: &str = "Invalid vote. Use 'yes' or 'no'.";

/// Single owner of every proposal and its votes.
///
/// Every operation is a function of the stored state and the caller-supplied `now`;
/// the store never reads a clock.
#[derive(Debug, Clone)]
pub struct ProposalStore {
    proposals: BTreeMap<ProposalId, Proposal>,
    next_id: ProposalId,
    voting_period: u64,
}

impl Default for ProposalStore {
    fn default() -> Self {
        Self::new(DEFAULT_VOTING_PERIOD_SECS)
    }
}

impl ProposalStore {
    pub fn new(voting_period: u64) -> Self {
        Self { proposals: BTreeMap::new(), next_id: ProposalId::FIRST, voting_period }
    }

    pub fn voting_period(&self) -> u64 {
        self.voting_period
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    pub fn get(&self, id: ProposalId) -> Option<&Proposal> {
        self.proposals.get(&id)
    }

    /// Create a proposal and return its freshly assigned id.
    pub fn create_proposal(
        &mut self,
        description: &str,
        creator: &str,
        now: u64,
    ) -> Result<ProposalId, ProposalError> {
        if description.is_empty() {
            return Err(ProposalError::invalid_input(DESCRIPTION_REQUIRED));
        }

        let id = self.next_id;
        self.next_id = id.next();
        self.proposals
            .insert(id, Proposal::new(id, description.to_string(), creator.to_string(), now));
        Ok(id)
    }

    /// Record `voter`'s ballot on a proposal.
    ///
    /// Checks run in a fixed order (existence, choice, window, uniqueness) and all of
    /// them precede the mutation, so a rejected vote leaves the store untouched.
    pub fn cast_vote(
        &mut self,
        proposal_id: ProposalId,
        voter: &str,
        choice: &str,
        now: u64,
    ) -> Result<(), ProposalError> {
        let voting_period = self.voting_period;
        let proposal = self.proposals.get_mut(&proposal_id).ok_or(ProposalError::NotFound)?;

        let choice =
            VoteChoice::parse(choice).ok_or_else(|| ProposalError::invalid_input(INVALID_VOTE))?;

        if now > proposal.closes_at(voting_period) {
            return Err(ProposalError::WindowClosed);
        }
        if proposal.has_voted(voter) {
            return Err(ProposalError::DuplicateVote);
        }

        proposal.record_vote(voter.to_string(), choice);
        Ok(())
    }

    /// Summaries of all proposals in ascending id order.
    pub fn list_proposals(&self, now: u64) -> Vec<ProposalSummary> {
        self.proposals.values().map(|p| p.summary(now, self.voting_period)).collect()
    }

    pub fn get_result(
        &self,
        proposal_id: ProposalId,
        now: u64,
    ) -> Result<ProposalResult, ProposalError> {
        self.proposals
            .get(&proposal_id)
            .map(|p| p.result(now, self.voting_period))
            .ok_or(ProposalError::NotFound)
    }
}
