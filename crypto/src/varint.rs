//! Variable-length integers as used inside addresses.
//!
//! Values below 253 take one byte; larger values are tagged with `0xFD`,
//! `0xFE` or `0xFF` followed by a big-endian `u16`, `u32` or `u64`.
//! Decoding rejects non-minimal encodings.

pub fn encode_varint(value: u64) -> Vec<u8> {
    if value < 253 {
        vec![value as u8]
    } else if value <= 0xFFFF {
        let mut out = vec![0xFD];
        out.extend_from_slice(&(value as u16).to_be_bytes());
        out
    } else if value <= 0xFFFF_FFFF {
        let mut out = vec![0xFE];
        out.extend_from_slice(&(value as u32).to_be_bytes());
        out
    } else {
        let mut out = vec![0xFF];
        out.extend_from_slice(&value.to_be_bytes());
        out
    }
}

/// Decode a varint from the front of `data`.
///
/// Returns the value and the number of bytes consumed, or `None` when the
/// input is truncated or not minimally encoded.
pub fn decode_varint(data: &[u8]) -> Option<(u64, usize)> {
    let (&tag, rest) = data.split_first()?;
    match tag {
        0xFD => {
            let bytes: [u8; 2] = rest.get(..2)?.try_into().ok()?;
            let value = u16::from_be_bytes(bytes) as u64;
            (value >= 253).then_some((value, 3))
        }
        0xFE => {
            let bytes: [u8; 4] = rest.get(..4)?.try_into().ok()?;
            let value = u32::from_be_bytes(bytes) as u64;
            (value > 0xFFFF).then_some((value, 5))
        }
        0xFF => {
            let bytes: [u8; 8] = rest.get(..8)?.try_into().ok()?;
            let value = u64::from_be_bytes(bytes);
            (value > 0xFFFF_FFFF).then_some((value, 9))
        }
        small => Some((small as u64, 1)),
    }
}
