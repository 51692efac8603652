//! Requests exchanged between the election core and its workers.
//!
//! The address service derives and joins deterministic channel addresses;
//! the send worker picks up queued outbound messages. Both run outside the
//! core and are reached only through these values.

use chanvote_types::Address;
use serde::{Deserialize, Serialize};

/// Address version requested for channel addresses.
pub const CHAN_ADDRESS_VERSION: u64 = 4;
/// Stream every channel address lives in.
pub const CHAN_STREAM: u64 = 1;

/// A command for the address service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressCommand {
    /// Derive `count` addresses from `seed` without joining anything.
    GetDeterministicAddress {
        version: u64,
        stream: u64,
        label: String,
        count: u32,
        seed: String,
        /// Request a shorter address by grinding for extra leading zeros.
        short_form: bool,
    },
    /// Derive the keys for `chan_address` from `seed` and start listening.
    JoinChan {
        chan_address: Address,
        label: String,
        seed: String,
    },
}

impl AddressCommand {
    /// The single-address derivation request used for channel addresses.
    pub fn chan_address(label: impl Into<String>, seed: impl Into<String>) -> Self {
        Self::GetDeterministicAddress {
            version: CHAN_ADDRESS_VERSION,
            stream: CHAN_STREAM,
            label: label.into(),
            count: 1,
            seed: seed.into(),
            short_form: false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::GetDeterministicAddress { .. } => "getDeterministicAddress",
            Self::JoinChan { .. } => "joinChan",
        }
    }
}

/// A unit of work for the send worker. Nothing is returned to the sender.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkItem {
    /// Build and send every queued message addressed to the channel.
    SendMessage { chan_address: Address },
}

impl WorkItem {
    pub fn operation(&self) -> &'static str {
        match self {
            Self::SendMessage { .. } => "sendmessage",
        }
    }
}
