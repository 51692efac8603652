//! LMDB storage backend for chanvote.
//!
//! Implements the ledger traits from `chanvote-store` using the `heed` LMDB
//! bindings. Both ledgers live in one environment, each in its own named
//! database.

pub mod environment;
pub mod error;
pub mod outbox;
pub mod vote;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use outbox::LmdbOutboxLedger;
pub use vote::LmdbVoteLedger;
