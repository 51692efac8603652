//! Nullable random: deterministic acknowledgement tokens.

use chanvote_crypto::{CryptoError, EntropySource};
use std::sync::Mutex;

/// A deterministic entropy source for testing.
///
/// Returns pre-configured tokens in order, cycling when exhausted.
pub struct NullRandom {
    outputs: Vec<[u8; 32]>,
    index: Mutex<usize>,
}

impl NullRandom {
    /// Create with a sequence of deterministic tokens.
    pub fn new(outputs: Vec<[u8; 32]>) -> Self {
        assert!(!outputs.is_empty(), "NullRandom needs at least one output");
        Self {
            outputs,
            index: Mutex::new(0),
        }
    }

    /// Create with a single value that will be returned for every call.
    pub fn constant(value: [u8; 32]) -> Self {
        Self::new(vec![value])
    }
}

impl EntropySource for NullRandom {
    fn ack_data(&self) -> Result<[u8; 32], CryptoError> {
        let mut idx = self.index.lock().unwrap();
        let current = *idx % self.outputs.len();
        *idx += 1;
        Ok(self.outputs[current])
    }
}
