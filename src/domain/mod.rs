pub mod codec;
pub mod command;
pub mod configuration;
pub mod error;
pub mod proposal;
pub mod request;

pub use codec::{CodecError, decode_payload, encode_payload};
pub use command::{AdvanceCommand, CommandError, InspectRoute};
pub use configuration::{DappConfig, GovernanceConfig, RollupConfig};
pub use error::AppError;
pub use proposal::{ProposalError, ProposalId, ProposalStore};
pub use request::{AdvanceMetadata, AdvanceRequest, FinishStatus, InspectRequest, RollupRequest};
