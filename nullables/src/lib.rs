//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator of the election core (clock, randomness, address
//! service, configuration store, ledgers) is reached through a trait or a
//! port. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled and inspected programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod address;
pub mod clock;
pub mod random;
pub mod store;

pub use address::{null_address_client, test_address, CommandLog, NullAddressGenerator};
pub use clock::NullClock;
pub use random::NullRandom;
pub use store::{NullConfigStore, NullOutbox, NullVoteLedger};
