//! Cryptographic primitives for chanvote.
//!
//! - **SHA-256** for election content hashes
//! - **SHA-512** (doubled) for address checksums
//! - Base58 + varint address codec with the `BM-` prefix
//! - OS-backed randomness for per-message acknowledgement tokens

pub mod address;
pub mod error;
pub mod hash;
pub mod random;
pub mod varint;

pub use address::{decode_address, encode_address, DecodedAddress};
pub use error::{AddressError, CryptoError};
pub use hash::{double_sha512, sha256, sha512};
pub use random::{EntropySource, OsEntropy};
pub use varint::{decode_varint, encode_varint};
