use thiserror::Error;

/// Why an address failed structural decoding.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,

    #[error("address contains characters outside the base58 alphabet")]
    InvalidCharacters,

    #[error("address is too short to carry a version, stream and checksum")]
    TooShort,

    #[error("address checksum does not match")]
    ChecksumFailed,

    #[error("address varint is malformed")]
    VarintMalformed,

    #[error("unsupported address version {0}")]
    UnsupportedVersion(u64),

    #[error("embedded ripe is too short ({0} bytes)")]
    RipeTooShort(usize),

    #[error("embedded ripe is too long ({0} bytes)")]
    RipeTooLong(usize),

    #[error("embedded ripe has a leading zero byte")]
    EncodingProblem,
}

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("secure random source failed: {0}")]
    Entropy(String),
}
