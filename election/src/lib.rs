//! Pseudonymous polls carried over broadcast channels.
//!
//! An election (question, answers, voter roster) is content-addressed: its
//! SHA-256 seeds a deterministic channel address that every participant
//! derives independently and joins. Votes are 4-byte answer indices posted
//! to that channel.
//!
//! - [`election`]: validation, content hash, channel address derivation
//! - [`membership`]: join/leave recorded in the configuration store
//! - [`codec`]: vote payload encoding and range checks
//! - [`transport`]: outbound rows for the send worker, inbound votes
//! - [`portable`]: single-election file import/export

pub mod codec;
pub mod election;
pub mod error;
pub mod membership;
pub mod portable;
pub mod state;
pub mod transport;

pub use codec::{decode_vote, encode_vote, VOTE_PAYLOAD_LEN};
pub use election::{
    canonical_encoding, chan_label, content_hash, validate, DefinedElection, Election,
    ElectionParams, HashBoundElection, CHAN_LABEL_PREFIX, MIN_ANSWERS, MIN_VOTERS,
};
pub use error::{DecodeError, ElectionError, InvalidVoter, ValidationError, VoteRejection};
pub use membership::{JoinOutcome, Membership};
pub use state::ElectionState;
pub use transport::{ReceiveOutcome, VoteTransport};
