//! Typed commands decoded from request payloads.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::codec::CodecError;
use crate::domain::proposal::ProposalError;

const VOTE_FIELDS_REQUIRED: &str = "ProposalId and vote are required.";
const DESCRIPTION_REQUIRED: &str = "Proposal description is required.";

/// Why a request could not be carried out. Display strings are what the host receives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error(transparent)]
    Proposal(#[from] ProposalError),

    #[error("Invalid action. Use 'create' or 'vote'.")]
    UnknownAction,

    #[error("Route not implemented. Use 'list' or 'result/<proposalId>'.")]
    UnknownRoute,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Invalid JSON payload: {0}")]
    Json(String),
}

/// State-changing action of an advance request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceCommand {
    Create {
        description: String,
    },
    /// `proposal_id` and `choice` are kept as text; the store decides whether they name
    /// an existing proposal and a valid ballot.
    Vote {
        proposal_id: String,
        choice: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAdvance {
    #[serde(default)]
    action: Option<Value>,
    #[serde(default)]
    description: Option<Value>,
    #[serde(default)]
    proposal_id: Option<Value>,
    #[serde(default)]
    vote: Option<Value>,
}

impl AdvanceCommand {
    /// Decode the UTF-8 JSON body of an advance payload.
    pub fn decode(text: &str) -> Result<Self, CommandError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| CommandError::Json(e.to_string()))?;
        if !value.is_object() {
            return Err(CommandError::Json("expected a JSON object".to_string()));
        }
        let raw: RawAdvance =
            serde_json::from_value(value).map_err(|e| CommandError::Json(e.to_string()))?;

        match raw.action.as_ref().and_then(Value::as_str) {
            Some("create") => {
                let description = raw
                    .description
                    .as_ref()
                    .and_then(Value::as_str)
                    .filter(|d| !d.is_empty())
                    .ok_or_else(|| ProposalError::invalid_input(DESCRIPTION_REQUIRED))?;
                Ok(AdvanceCommand::Create { description: description.to_string() })
            }
            Some("vote") => {
                let (Some(proposal_id), Some(choice)) =
                    (present(raw.proposal_id.as_ref()), present(raw.vote.as_ref()))
                else {
                    return Err(ProposalError::invalid_input(VOTE_FIELDS_REQUIRED).into());
                };
                Ok(AdvanceCommand::Vote { proposal_id, choice })
            }
            _ => Err(CommandError::UnknownAction),
        }
    }
}

/// Text of a field that carries a value; absent, null, empty, zero and false carry none.
///
/// Integral numbers are rendered without a fraction, so `1.0` reads as `1`.
fn present(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(integral_text(n).unwrap_or_else(|| n.to_string())),
        other => Some(other.to_string()),
    }
}

fn integral_text(n: &serde_json::Number) -> Option<String> {
    if let Some(u) = n.as_u64() {
        return Some(u.to_string());
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f > 0.0 && f < u64::MAX as f64).then(|| (f as u64).to_string())
}

/// Read-only query of an inspect request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectRoute {
    List,
    Result { proposal_id: String },
}

impl InspectRoute {
    pub fn parse(route: &str) -> Result<Self, CommandError> {
        if route == "list" {
            return Ok(InspectRoute::List);
        }
        if let Some(rest) = route.strip_prefix("result/") {
            let proposal_id = rest.split('/').next().unwrap_or_default();
            return Ok(InspectRoute::Result { proposal_id: proposal_id.to_string() });
        }
        Err(CommandError::UnknownRoute)
    }
}
