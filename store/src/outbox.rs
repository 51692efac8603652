//! Outbound message ledger trait.

use crate::StoreError;
use chanvote_types::{Address, Timestamp};
use serde::{Deserialize, Serialize};

/// Message encoding tag for plain subject/body messages.
pub const ENCODING_SIMPLE: u8 = 2;

/// Delivery status of an outbound message. Later states belong to the send
/// worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageStatus {
    /// Queued locally, waiting for the send worker.
    MsgQueued,
}

/// Mailbox folder an outbound message is filed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Folder {
    Sent,
}

/// One row of the outbound message ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentMessage {
    /// Assigned by the send worker once the object is built; empty until then.
    pub msgid: Vec<u8>,
    pub to_address: Address,
    /// Routing value of the recipient, taken from its decoded address.
    pub to_ripe: [u8; 20],
    pub from_address: Address,
    pub subject: String,
    pub body: Vec<u8>,
    /// Opaque token the recipient echoes back as an acknowledgement.
    pub ack_data: [u8; 32],
    pub last_action_time: Timestamp,
    pub status: MessageStatus,
    pub pubkey_retry_number: u32,
    pub msg_retry_number: u32,
    pub folder: Folder,
    pub encoding_type: u8,
}

/// Storage for messages waiting to be sent.
pub trait OutboxLedger: Send + Sync {
    fn queue_message(&self, message: &SentMessage) -> Result<(), StoreError>;

    /// Messages addressed to a channel, in queue order.
    fn messages_to(&self, to_address: &Address) -> Result<Vec<SentMessage>, StoreError>;
}
