//! SHA-2 hashing.

use sha2::{Digest, Sha256, Sha512};

/// Compute a 256-bit SHA-256 hash of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let result = Sha256::digest(data);
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

pub fn sha512(data: &[u8]) -> [u8; 64] {
    let result = Sha512::digest(data);
    let mut output = [0u8; 64];
    output.copy_from_slice(&result);
    output
}

/// SHA-512 applied twice. The first 4 bytes are the address checksum.
pub fn double_sha512(data: &[u8]) -> [u8; 64] {
    sha512(&sha512(data))
}
