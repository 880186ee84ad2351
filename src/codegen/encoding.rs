//! Hashing and Base-62 Encoding
//!
//! The digest is treated as a big-endian, unsigned, base-256 integer and
//! converted to base 62 by repeated long division. Only the leading bytes
//! that the requested code length needs are consumed.

use hex::FromHexError;
use sha2::{Digest, Sha256};

/// The base-62 alphabet. Index `i` is the symbol for digit value `i`.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const BASE: u32 = 62;

/// Errors produced while encoding hash material.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// The digest holds fewer bytes than the code length requires
    #[error("hash material too short: need {needed} bytes, got {available}")]
    InsufficientDigest { needed: usize, available: usize },

    /// Hex input contained a non-hex character
    #[error("malformed hex digest at position {position}")]
    MalformedHex { position: usize },

    /// A code must have at least one character
    #[error("code length must be greater than zero")]
    ZeroLength,
}

/// Hashes the input with SHA-256.
pub fn hash(input: &str) -> [u8; 32] {
    Sha256::digest(input.as_bytes()).into()
}

/// Hashes the input with SHA-256 and returns the lowercase hex digest.
pub fn hash_hex(input: &str) -> String {
    hex::encode(hash(input))
}

/// Encodes the leading `length` bytes of `digest` as exactly `length` base-62 characters.
///
/// Each output character consumes one byte (two hex positions) of the digest.
/// Short results are left-padded with `'0'`; long results keep the
/// least-significant characters.
///
/// # Errors
///
/// Returns [`EncodingError::InsufficientDigest`] if `digest` is shorter than
/// `length`, and [`EncodingError::ZeroLength`] if `length` is zero.
pub fn encode(digest: &[u8], length: usize) -> Result<String, EncodingError> {
    if length == 0 {
        return Err(EncodingError::ZeroLength);
    }
    if digest.len() < length {
        return Err(EncodingError::InsufficientDigest {
            needed: length,
            available: digest.len(),
        });
    }

    let digits = to_base62(&digest[..length]);
    Ok(fit_to_length(&digits, length))
}

/// Same as [`encode`], but reads the digest from a hex string.
///
/// `2 * length` hex characters are required.
pub fn encode_hex(hex: &str, length: usize) -> Result<String, EncodingError> {
    if length == 0 {
        return Err(EncodingError::ZeroLength);
    }
    let needed = match length.checked_mul(2) {
        Some(needed) if hex.len() >= needed => needed,
        _ => {
            return Err(EncodingError::InsufficientDigest {
                needed: length,
                available: hex.len() / 2,
            })
        }
    };

    let bytes = decode_hex(&hex.as_bytes()[..needed])?;
    encode(&bytes, length)
}

/// Encodes an integer in base 62 with no padding. Zero encodes as `"0"`.
pub fn encode_u64(number: u64) -> String {
    base62::encode_alternative(number)
}

/// Converts big-endian base-256 bytes into base-62 digit values, most significant first.
///
/// Returns an empty vector for an all-zero input.
fn to_base62(bytes: &[u8]) -> Vec<u8> {
    let mut dividend: Vec<u8> = bytes.iter().copied().skip_while(|&b| b == 0).collect();
    let mut digits = Vec::with_capacity(bytes.len() * 2);

    while !dividend.is_empty() {
        let mut quotient = Vec::with_capacity(dividend.len());
        let mut remainder = 0u32;

        for &byte in &dividend {
            let acc = (remainder << 8) | byte as u32;
            let q = acc / BASE;
            remainder = acc % BASE;
            if !(quotient.is_empty() && q == 0) {
                quotient.push(q as u8);
            }
        }

        digits.push(remainder as u8);
        dividend = quotient;
    }

    digits.reverse();
    digits
}

fn fit_to_length(digits: &[u8], length: usize) -> String {
    let mut out = String::with_capacity(length);

    if digits.len() < length {
        for _ in digits.len()..length {
            out.push(ALPHABET[0] as char);
        }
        out.extend(digits.iter().map(|&d| ALPHABET[d as usize] as char));
    } else {
        let start = digits.len() - length;
        out.extend(digits[start..].iter().map(|&d| ALPHABET[d as usize] as char));
    }

    out
}

fn decode_hex(input: &[u8]) -> Result<Vec<u8>, EncodingError> {
    hex::decode(input).map_err(|e| match e {
        FromHexError::InvalidHexCharacter { index, .. } => {
            EncodingError::MalformedHex { position: index }
        }
        // Callers pass an even number of bytes
        _ => {
            EncodingError::MalformedHex {
                position: input.len(),
            }
        }
    })
}
