//! Secure randomness for acknowledgement tokens.

use crate::CryptoError;

/// Supplies the opaque 32-byte acknowledgement token attached to every
/// outbound message.
pub trait EntropySource: Send + Sync {
    fn ack_data(&self) -> Result<[u8; 32], CryptoError>;
}

/// Reads from the operating system's CSPRNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn ack_data(&self) -> Result<[u8; 32], CryptoError> {
        let mut buf = [0u8; 32];
        getrandom::getrandom(&mut buf).map_err(|e| CryptoError::Entropy(e.to_string()))?;
        Ok(buf)
    }
}
