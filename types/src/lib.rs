//! Fundamental types for chanvote.
//!
//! This crate defines the value types shared across every other crate in the
//! workspace: network addresses, election content hashes, answer indices and
//! timestamps.

pub mod address;
pub mod error;
pub mod hash;
pub mod time;

pub use address::Address;
pub use error::TypesError;
pub use hash::ContentHash;
pub use time::{Clock, SystemClock, Timestamp};

/// Position of an answer in an election's answer list.
///
/// The wire encoding is a 4-byte big-endian unsigned integer, so the index
/// space is exactly `u32`.
pub type AnswerIndex = u32;
