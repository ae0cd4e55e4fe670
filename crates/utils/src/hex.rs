//! Hexadecimal encoding and decoding
//!
//! Encoding always emits uppercase digits, two per byte. Decoding accepts
//! either case. An odd-length input is accepted too: its leading digit stands
//! alone as the first output byte, and the rest is read in pairs.

use commonutil_core::{Error, Result};

/// Uppercase digit for each nibble value
pub const HEX_DIGITS: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F',
];

/// Encode every byte of `bytes`
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        out.push(HEX_DIGITS[usize::from(byte >> 4)]);
        out.push(HEX_DIGITS[usize::from(byte & 0x0F)]);
    }
    out
}

/// Encode `length` bytes of `bytes` starting at `offset`
///
/// Fails with `OutOfRange` when the range does not fit inside `bytes`.
pub fn encode_range(bytes: &[u8], offset: usize, length: usize) -> Result<String> {
    let end = offset
        .checked_add(length)
        .filter(|&end| end <= bytes.len())
        .ok_or_else(|| {
            Error::out_of_range(format!(
                "offset {offset} with length {length} exceeds input of {} bytes",
                bytes.len()
            ))
        })?;

    Ok(encode(&bytes[offset..end]))
}

/// Decode a string of hex digits into bytes
pub fn decode(hex: &str) -> Result<Vec<u8>> {
    let digits: Vec<char> = hex.chars().collect();
    let (lead, pairs) = digits.split_at(digits.len() % 2);

    let mut out = Vec::with_capacity(lead.len() + pairs.len() / 2);
    for &ch in lead {
        out.push(from_digit(ch)?);
    }
    for pair in pairs.chunks_exact(2) {
        out.push((from_digit(pair[0])? << 4) | from_digit(pair[1])?);
    }

    Ok(out)
}

/// Uppercase hex digit for a value in `0..=15`
pub fn to_digit(n: u32) -> Result<char> {
    usize::try_from(n)
        .ok()
        .and_then(|index| HEX_DIGITS.get(index))
        .copied()
        .ok_or_else(|| Error::out_of_range(format!("{n} is out of range for a hex digit")))
}

/// Value of a single hex digit, either case
pub fn from_digit(ch: char) -> Result<u8> {
    match ch {
        '0'..='9' => Ok(ch as u8 - b'0'),
        'A'..='F' => Ok(ch as u8 - b'A' + 10),
        'a'..='f' => Ok(ch as u8 - b'a' + 10),
        _ => Err(Error::invalid_digit(ch)),
    }
}
