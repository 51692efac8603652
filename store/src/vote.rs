//! Vote ledger trait.

use crate::StoreError;
use chanvote_types::{Address, AnswerIndex, Timestamp};
use serde::{Deserialize, Serialize};

/// One received vote. Appended once, never updated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    /// The election's channel address.
    pub chan_address: Address,
    pub voter_address: Address,
    pub received_at: Timestamp,
    /// The payload exactly as it arrived.
    pub raw_payload: Vec<u8>,
    pub answer_index: AnswerIndex,
}

/// Append-only storage for received votes.
pub trait VoteLedger: Send + Sync {
    fn append_vote(&self, vote: &VoteRecord) -> Result<(), StoreError>;

    /// All votes recorded for a channel, in arrival order.
    fn votes_for(&self, chan_address: &Address) -> Result<Vec<VoteRecord>, StoreError>;
}
