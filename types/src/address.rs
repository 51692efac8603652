//! Network address type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A network address as text, e.g. `BM-2cW67GEKkHGonXKZLCzouLLxnLym3azS8r`.
///
/// This is the raw, undecoded form. Structural validation (base58, checksum,
/// version rules) lives in `chanvote_crypto::decode_address`, because a voter
/// roster has to be able to carry invalid entries far enough to report all of
/// them at once.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// The conventional textual prefix. Optional on input.
    pub const PREFIX: &'static str = "BM-";

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The address text without the `BM-` prefix, trimmed of whitespace.
    pub fn body(&self) -> &str {
        let trimmed = self.0.trim();
        trimmed.strip_prefix(Self::PREFIX).unwrap_or(trimmed)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
