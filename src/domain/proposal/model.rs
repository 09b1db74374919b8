use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Positive, store-assigned proposal identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProposalId(u64);

impl ProposalId {
    pub const FIRST: ProposalId = ProposalId(1);

    /// Parse a textual id.
    ///
    /// Only the canonical decimal form of a positive integer names a proposal:
    /// `"7"` does, `"07"`, `"+7"`, `"7.0"` and `"0"` do not.
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.parse::<u64>().ok()?;
        if value == 0 || value.to_string() != raw {
            return None;
        }
        Some(ProposalId(value))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        ProposalId(self.0 + 1)
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ballot choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteChoice {
    Yes,
    No,
}

impl VoteChoice {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "yes" => Some(VoteChoice::Yes),
            "no" => Some(VoteChoice::No),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteChoice::Yes => "yes",
            VoteChoice::No => "no",
        }
    }
}

/// Whether a proposal still accepts votes. Derived on read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProposalStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProposalOutcome {
    Ongoing,
    Passed,
    Failed,
}

/// A governance proposal and its tally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    id: ProposalId,
    description: String,
    creator: String,
    yes_votes: u64,
    no_votes: u64,
    created_at: u64,
    voters: BTreeSet<String>,
}

impl Proposal {
    pub(crate) fn new(id: ProposalId, description: String, creator: String, now: u64) -> Self {
        Self {
            id,
            description,
            creator,
            yes_votes: 0,
            no_votes: 0,
            created_at: now,
            voters: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> ProposalId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn yes_votes(&self) -> u64 {
        self.yes_votes
    }

    pub fn no_votes(&self) -> u64 {
        self.no_votes
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn voters(&self) -> &BTreeSet<String> {
        &self.voters
    }

    pub fn has_voted(&self, voter: &str) -> bool {
        self.voters.contains(voter)
    }

    /// Last instant (inclusive) at which a vote is still accepted.
    pub fn closes_at(&self, voting_period: u64) -> u64 {
        self.created_at.saturating_add(voting_period)
    }

    pub fn status(&self, now: u64, voting_period: u64) -> ProposalStatus {
        if now > self.closes_at(voting_period) {
            ProposalStatus::Closed
        } else {
            ProposalStatus::Open
        }
    }

    pub fn outcome(&self, now: u64, voting_period: u64) -> ProposalOutcome {
        match self.status(now, voting_period) {
            ProposalStatus::Open => ProposalOutcome::Ongoing,
            ProposalStatus::Closed if self.yes_votes > self.no_votes => ProposalOutcome::Passed,
            ProposalStatus::Closed => ProposalOutcome::Failed,
        }
    }

    pub fn summary(&self, now: u64, voting_period: u64) -> ProposalSummary {
        ProposalSummary {
            id: self.id,
            description: self.description.clone(),
            yes_votes: self.yes_votes,
            no_votes: self.no_votes,
            status: self.status(now, voting_period),
        }
    }

    pub fn result(&self, now: u64, voting_period: u64) -> ProposalResult {
        ProposalResult {
            summary: self.summary(now, voting_period),
            result: self.outcome(now, voting_period),
        }
    }

    /// Caller must have checked the voting window and voter uniqueness.
    pub(crate) fn record_vote(&mut self, voter: String, choice: VoteChoice) {
        self.voters.insert(voter);
        match choice {
            VoteChoice::Yes => self.yes_votes += 1,
            VoteChoice::No => self.no_votes += 1,
        }
    }
}

/// Entry of the `list` inspect route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSummary {
    pub id: ProposalId,
    pub description: String,
    pub yes_votes: u64,
    pub no_votes: u64,
    pub status: ProposalStatus,
}

/// Answer of the `result/<id>` inspect route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProposalResult {
    #[serde(flatten)]
    pub summary: ProposalSummary,
    pub result: ProposalOutcome,
}
