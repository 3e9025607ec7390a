//! Reversible `u64` ↔ base62 string codec.
//!
//! Digits are emitted least-significant first: `encode` appends `id % 62`
//! before dividing, and `decode` weights the character at index `i` by
//! `62^i`. Do not reverse either side on its own, the round trip depends on
//! both using the same order.

/// Symbol table, indexed by digit value.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

const BASE: u64 = ALPHABET.len() as u64;

/// Longest encoding a `u64` can produce (`62^11 > 2^64`).
pub const MAX_ENCODED_LEN: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("invalid character '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },
}

/// Encodes `id` in base62, least-significant digit first.
///
/// `encode(0)` is the empty string.
///
/// # Examples
///
/// ```
/// use linkforge::utils::base62::encode;
///
/// assert_eq!(encode(1), "b");
/// assert_eq!(encode(62), "ab");
/// ```
pub fn encode(mut id: u64) -> String {
    let mut encoded = String::with_capacity(MAX_ENCODED_LEN);

    while id > 0 {
        encoded.push(ALPHABET[(id % BASE) as usize] as char);
        id /= BASE;
    }

    encoded
}

/// Decodes a base62 string produced by [`encode`].
///
/// The empty string decodes to `0`. Inputs longer than
/// [`MAX_ENCODED_LEN`] wrap around instead of failing.
///
/// # Errors
///
/// Returns [`CodecError::InvalidCharacter`] for the first character outside
/// [`ALPHABET`].
pub fn decode(input: &str) -> Result<u64, CodecError> {
    if input.is_empty() {
        return Ok(0);
    }

    let mut number: u64 = 0;
    let mut place: u64 = 1;

    for (position, character) in input.chars().enumerate() {
        let digit = digit_value(character)
            .ok_or(CodecError::InvalidCharacter {
                character,
                position,
            })?;

        number = number.wrapping_add(digit.wrapping_mul(place));
        place = place.wrapping_mul(BASE);
    }

    Ok(number)
}

fn digit_value(character: char) -> Option<u64> {
    match character {
        'a'..='z' => Some(character as u64 - 'a' as u64),
        'A'..='Z' => Some(character as u64 - 'A' as u64 + 26),
        '0'..='9' => Some(character as u64 - '0' as u64 + 52),
        _ => None,
    }
}
