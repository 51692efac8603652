//! Address encoding and structural validation.
//!
//! Address format: `BM-` + base58(varint(version) ++ varint(stream) ++ ripe ++ checksum)
//!
//! Checksum: first 4 bytes of SHA-512(SHA-512(payload)).
//! Base58 is a big-number encoding, so leading zero bytes of the payload are
//! not represented (the version varint is never zero).
//! The ripe is stored with leading zero bytes stripped: all of them for
//! version 4, at most two for versions 2 and 3.

use chanvote_types::Address;

use crate::varint::{decode_varint, encode_varint};
use crate::AddressError;

/// Base58 alphabet (no 0, O, I, l).
const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Reverse lookup table: ASCII byte → digit value (0xFF = invalid).
const BASE58_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let alpha = BASE58_ALPHABET;
    let mut i = 0;
    while i < 58 {
        table[alpha[i] as usize] = i as u8;
        i += 1;
    }
    table
};

const CHECKSUM_LEN: usize = 4;
const RIPE_LEN: usize = 20;
const MAX_VERSION: u64 = 4;

/// The structural content of a valid address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecodedAddress {
    pub version: u64,
    pub stream: u64,
    /// Full 20-byte ripe with stripped zero bytes restored. This is the
    /// routing value messages to the address are keyed on.
    pub ripe: [u8; RIPE_LEN],
}

/// Encode a big-endian byte string as a base58 number.
fn encode_base58(bytes: &[u8]) -> String {
    // Little-endian base58 digits.
    let mut digits: Vec<u8> = Vec::with_capacity(bytes.len() * 138 / 100 + 1);
    for &byte in bytes {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            let value = ((*digit as u32) << 8) | carry;
            *digit = (value % 58) as u8;
            carry = value / 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }
    if digits.is_empty() {
        return (BASE58_ALPHABET[0] as char).to_string();
    }
    digits
        .iter()
        .rev()
        .map(|&d| BASE58_ALPHABET[d as usize] as char)
        .collect()
}

/// Decode a base58 number into its minimal big-endian byte string.
///
/// Returns `None` on characters outside the alphabet.
fn decode_base58(s: &str) -> Option<Vec<u8>> {
    let mut bytes: Vec<u8> = Vec::with_capacity(s.len());
    for c in s.bytes() {
        if c >= 128 {
            return None;
        }
        let digit = BASE58_DECODE[c as usize];
        if digit == 0xFF {
            return None;
        }
        let mut carry = digit as u32;
        for byte in bytes.iter_mut().rev() {
            let value = (*byte as u32) * 58 + carry;
            *byte = (value & 0xFF) as u8;
            carry = value >> 8;
        }
        while carry > 0 {
            bytes.insert(0, (carry & 0xFF) as u8);
            carry >>= 8;
        }
    }
    Some(bytes)
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = crate::double_sha512(payload);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

/// Left-pad an embedded ripe back to 20 bytes.
fn pad_ripe(embedded: &[u8]) -> [u8; RIPE_LEN] {
    let mut ripe = [0u8; RIPE_LEN];
    ripe[RIPE_LEN - embedded.len()..].copy_from_slice(embedded);
    ripe
}

/// Encode an address from its structural parts.
pub fn encode_address(
    version: u64,
    stream: u64,
    ripe: &[u8; RIPE_LEN],
) -> Result<Address, AddressError> {
    let embedded: &[u8] = match version {
        1 => ripe,
        2 | 3 => {
            if ripe[..2] == [0, 0] {
                &ripe[2..]
            } else if ripe[0] == 0 {
                &ripe[1..]
            } else {
                ripe
            }
        }
        4 => {
            let start = ripe.iter().position(|&b| b != 0).unwrap_or(RIPE_LEN);
            let stripped = &ripe[start..];
            if stripped.len() < 4 {
                return Err(AddressError::RipeTooShort(stripped.len()));
            }
            stripped
        }
        other => return Err(AddressError::UnsupportedVersion(other)),
    };

    let mut payload = encode_varint(version);
    payload.extend_from_slice(&encode_varint(stream));
    payload.extend_from_slice(embedded);
    let sum = checksum(&payload);
    payload.extend_from_slice(&sum);

    Ok(Address::new(format!(
        "{}{}",
        Address::PREFIX,
        encode_base58(&payload)
    )))
}

/// Structurally decode an address.
///
/// Accepts the address with or without the `BM-` prefix and ignores
/// surrounding whitespace.
pub fn decode_address(address: &str) -> Result<DecodedAddress, AddressError> {
    let trimmed = address.trim();
    let body = trimmed.strip_prefix(Address::PREFIX).unwrap_or(trimmed);
    if body.is_empty() {
        return Err(AddressError::Empty);
    }

    let data = decode_base58(body).ok_or(AddressError::InvalidCharacters)?;
    // version + stream + checksum at minimum
    if data.len() < 2 + CHECKSUM_LEN {
        return Err(AddressError::TooShort);
    }

    let (payload, sum) = data.split_at(data.len() - CHECKSUM_LEN);
    if checksum(payload) != sum {
        return Err(AddressError::ChecksumFailed);
    }

    let (version, version_len) = decode_varint(payload).ok_or(AddressError::VarintMalformed)?;
    if version == 0 || version > MAX_VERSION {
        return Err(AddressError::UnsupportedVersion(version));
    }
    let (stream, stream_len) =
        decode_varint(&payload[version_len..]).ok_or(AddressError::VarintMalformed)?;
    let embedded = &payload[version_len + stream_len..];

    let ripe = match version {
        1 => {
            if embedded.len() < RIPE_LEN {
                return Err(AddressError::RipeTooShort(embedded.len()));
            }
            if embedded.len() > RIPE_LEN {
                return Err(AddressError::RipeTooLong(embedded.len()));
            }
            pad_ripe(embedded)
        }
        2 | 3 => match embedded.len() {
            18..=RIPE_LEN => pad_ripe(embedded),
            n if n < 18 => return Err(AddressError::RipeTooShort(n)),
            n => return Err(AddressError::RipeTooLong(n)),
        },
        _ => {
            if embedded.first() == Some(&0) {
                return Err(AddressError::EncodingProblem);
            }
            if embedded.len() > RIPE_LEN {
                return Err(AddressError::RipeTooLong(embedded.len()));
            }
            if embedded.len() < 4 {
                return Err(AddressError::RipeTooShort(embedded.len()));
            }
            pad_ripe(embedded)
        }
    };

    Ok(DecodedAddress {
        version,
        stream,
        ripe,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ripe_of(seed: &str) -> [u8; 20] {
        let digest = crate::sha512(seed.as_bytes());
        let mut ripe = [0u8; 20];
        ripe.copy_from_slice(&digest[..20]);
        ripe
    }

    #[test]
    fn encode_matches_reference_vectors() {
        assert_eq!(
            encode_address(4, 1, &ripe_of("alice")).unwrap().as_str(),
            "BM-87YKYCH5zAiq9X14gzeu6odtF63eYnj5ifz"
        );
        assert_eq!(
            encode_address(4, 1, &ripe_of("bob")).unwrap().as_str(),
            "BM-87Sot4jroKs3h4pbXF9h7PPWXU1YNWNrzye"
        );
    }

    #[test]
    fn leading_zero_ripe_is_stripped() {
        let mut ripe = ripe_of("zero");
        ripe[0] = 0;
        let v4 = encode_address(4, 1, &ripe).unwrap();
        assert_eq!(v4.as_str(), "BM-2cWm4ZHe9sLhB8EF4tWfrsoRQxAYcciK82");
        let v3 = encode_address(3, 1, &ripe).unwrap();
        assert_eq!(v3.as_str(), "BM-2DBA5SzMSgspMh6A3UBMNkXdnSubyDtzYg");

        assert_eq!(decode_address(v4.as_str()).unwrap().ripe, ripe);
        assert_eq!(decode_address(v3.as_str()).unwrap().ripe, ripe);
    }

    #[test]
    fn decode_roundtrip() {
        let ripe = ripe_of("carol");
        let addr = encode_address(4, 1, &ripe).unwrap();
        let decoded = decode_address(addr.as_str()).unwrap();
        assert_eq!(
            decoded,
            DecodedAddress {
                version: 4,
                stream: 1,
                ripe
            }
        );
    }

    #[test]
    fn prefix_is_optional() {
        let addr = encode_address(4, 1, &ripe_of("dave")).unwrap();
        let bare = addr.as_str().trim_start_matches("BM-");
        assert_eq!(
            decode_address(addr.as_str()).unwrap(),
            decode_address(bare).unwrap()
        );
    }

    #[test]
    fn invalid_checksum_rejected() {
        let addr = encode_address(4, 1, &ripe_of("alice")).unwrap();
        let mut bad = addr.as_str().to_string();
        let last = bad.pop().unwrap();
        bad.push(if last == 'z' { 'y' } else { 'z' });
        assert_eq!(decode_address(&bad), Err(AddressError::ChecksumFailed));
    }

    #[test]
    fn invalid_characters_rejected() {
        assert_eq!(
            decode_address("BM-0OIl"),
            Err(AddressError::InvalidCharacters)
        );
        assert_eq!(decode_address("BM-"), Err(AddressError::Empty));
        assert_eq!(decode_address("BM-abc"), Err(AddressError::TooShort));
    }

    #[test]
    fn unsupported_version_rejected() {
        assert_eq!(
            encode_address(5, 1, &ripe_of("x")),
            Err(AddressError::UnsupportedVersion(5))
        );
    }

    #[test]
    fn base58_roundtrip() {
        let data = [0x04, 0x01, 0xDE, 0xAD, 0xBE, 0xEF];
        let encoded = encode_base58(&data);
        assert_eq!(decode_base58(&encoded).unwrap(), data);
    }

    #[test]
    fn base58_zero_is_first_symbol() {
        assert_eq!(encode_base58(&[]), "1");
        assert_eq!(decode_base58("1").unwrap(), Vec::<u8>::new());
    }
}
