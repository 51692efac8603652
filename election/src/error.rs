use chanvote_crypto::{AddressError, CryptoError};
use chanvote_network::ServiceError;
use chanvote_store::StoreError;
use chanvote_types::{Address, AnswerIndex, ContentHash};
use std::fmt;
use thiserror::Error;

/// A voter entry that failed structural address validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidVoter {
    pub address: Address,
    pub reason: AddressError,
}

impl fmt::Display for InvalidVoter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.address, self.reason)
    }
}

fn join_list<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why a set of election parameters was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no question provided")]
    EmptyQuestion,

    #[error("at least two answers are required, got {0}")]
    TooFewAnswers(usize),

    #[error("at least three voters are required, got {0}")]
    TooFewVoters(usize),

    #[error("invalid voter addresses: {}", join_list(.0))]
    InvalidVoterAddresses(Vec<InvalidVoter>),

    #[error("duplicate voter addresses: {}", join_list(.0))]
    DuplicateVoters(Vec<Address>),
}

#[derive(Debug, Error)]
pub enum ElectionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("content hash mismatch: expected {expected}, computed {computed}")]
    HashMismatch {
        expected: ContentHash,
        computed: ContentHash,
    },

    #[error("channel address mismatch: expected {expected}, derived {derived}")]
    AddressMismatch { expected: Address, derived: Address },

    #[error("joining {expected} returned {returned:?}")]
    JoinProtocol {
        expected: Address,
        returned: Vec<Address>,
    },

    #[error("answer index {index} out of range for {answers} answers")]
    EncodeRange { index: AnswerIndex, answers: usize },

    #[error("election channel {0} is not joined")]
    NotJoined(Address),

    #[error("channel address {address} is malformed: {reason}")]
    InvalidChanAddress {
        address: Address,
        reason: AddressError,
    },

    #[error("stored election {address} is unreadable: {reason}")]
    CorruptConfig { address: Address, reason: String },

    #[error("election file: {0}")]
    File(String),

    #[error("address service: {0}")]
    Service(#[from] ServiceError),

    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error("crypto: {0}")]
    Crypto(#[from] CryptoError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// A vote payload shorter than the fixed four-byte encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("vote payload is {0} bytes, need 4")]
pub struct DecodeError(pub usize);

/// Why an inbound vote was dropped. Inbound traffic never fails the caller;
/// these are logged and returned as data.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VoteRejection {
    #[error("election is not joined")]
    NotJoined,

    #[error(transparent)]
    Malformed(#[from] DecodeError),

    #[error("answer index {index} out of range for {answers} answers")]
    OutOfRange { index: AnswerIndex, answers: usize },

    #[error("vote ledger unavailable: {0}")]
    LedgerUnavailable(String),
}
