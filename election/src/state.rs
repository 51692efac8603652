//! Election lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an election is in its lifecycle.
///
/// ```text
/// Defined -> HashBound -> AddressBound <-> Joined
/// ```
///
/// `leave` moves a joined election back to `AddressBound`. Elections read
/// from the configuration store start out `Joined`; elections read from a
/// portable file start out `AddressBound`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectionState {
    /// Parameters validated, nothing derived yet.
    Defined,
    /// Content hash computed (and checked against any expected hash).
    HashBound,
    /// Channel address derived (and checked against any expected address).
    AddressBound,
    /// Membership recorded in the configuration store.
    Joined,
}

impl ElectionState {
    /// Only joined elections may send votes or accept inbound ones.
    pub fn accepts_votes(&self) -> bool {
        matches!(self, Self::Joined)
    }
}

impl fmt::Display for ElectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Defined => "defined",
            Self::HashBound => "hash-bound",
            Self::AddressBound => "address-bound",
            Self::Joined => "joined",
        };
        f.write_str(s)
    }
}
