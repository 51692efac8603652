//! Storage traits for chanvote.
//!
//! The election core never touches a file or a database directly. It talks to
//! these traits, and each backend (TOML keys file, LMDB, in-memory for
//! testing) implements them.

pub mod config;
pub mod error;
pub mod keys_file;
pub mod outbox;
pub mod vote;

pub use config::{parse_bool, ConfigStore};
pub use error::StoreError;
pub use keys_file::KeysFile;
pub use outbox::{Folder, MessageStatus, OutboxLedger, SentMessage, ENCODING_SIMPLE};
pub use vote::{VoteLedger, VoteRecord};
