//! Base-62 short code codec.
//!
//! Short codes are the base-62 representation of a link's store-assigned
//! identifier plus a fixed padding offset. The padding keeps the first few
//! identifiers from producing one-character codes.
//!
//! The alphabet is `a-z`, `A-Z`, `0-9` in that order, so `a` is the zero
//! digit and `9` is digit 61. Codes are case-sensitive.

/// Ordered code alphabet; the index of a character is its digit value.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Offset added to every identifier before encoding.
pub const DEFAULT_PADDING: u64 = 100;

const RADIX: u64 = ALPHABET.len() as u64;

/// Errors produced while encoding or decoding short codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Short code is empty")]
    Empty,

    #[error("Invalid character '{character}' at position {position} in short code")]
    InvalidCharacter { character: char, position: usize },

    #[error("Short code value does not fit in 64 bits")]
    Overflow,

    #[error("Short code value {value} is below the padding offset")]
    BelowPadding { value: u64 },

    #[error("Short code has a leading zero digit")]
    NonCanonical,
}

/// Encoder/decoder for short codes with a configurable padding offset.
///
/// # Examples
///
/// ```
/// use shortlink::utils::short_code::ShortCodeCodec;
///
/// let codec = ShortCodeCodec::default();
/// let code = codec.encode(0).unwrap();
/// assert_eq!(code, "bM");
/// assert_eq!(codec.decode(&code).unwrap(), 100);
/// assert_eq!(codec.identifier(&code).unwrap(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortCodeCodec {
    padding: u64,
}

impl Default for ShortCodeCodec {
    fn default() -> Self {
        Self::new(DEFAULT_PADDING)
    }
}

impl ShortCodeCodec {
    /// Creates a codec with the given padding offset.
    pub fn new(padding: u64) -> Self {
        Self { padding }
    }

    pub fn padding(&self) -> u64 {
        self.padding
    }

    /// Encodes an identifier as a short code.
    ///
    /// The padded value is converted most-significant digit first. A value of
    /// zero still produces one digit, and zero digits in the middle or at the
    /// end of the number are kept.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Overflow`] if `id + padding` exceeds `u64::MAX`.
    pub fn encode(&self, id: u64) -> Result<String, CodecError> {
        let mut value = id.checked_add(self.padding).ok_or(CodecError::Overflow)?;

        let mut digits = Vec::with_capacity(11);
        loop {
            digits.push(ALPHABET[(value % RADIX) as usize]);
            value /= RADIX;
            if value == 0 {
                break;
            }
        }
        digits.reverse();

        Ok(digits.into_iter().map(char::from).collect())
    }

    /// Decodes a short code into its padded value.
    ///
    /// `decode(encode(id)) == id + padding` for every encodable `id`.
    ///
    /// # Errors
    ///
    /// - [`CodecError::Empty`] for an empty code
    /// - [`CodecError::InvalidCharacter`] for any character outside [`ALPHABET`]
    /// - [`CodecError::Overflow`] if the value exceeds `u64::MAX`
    pub fn decode(&self, code: &str) -> Result<u64, CodecError> {
        if code.is_empty() {
            return Err(CodecError::Empty);
        }

        code.chars()
            .enumerate()
            .try_fold(0u64, |acc, (position, character)| {
                let digit = digit_value(character)
                    .ok_or(CodecError::InvalidCharacter { character, position })?;

                acc.checked_mul(RADIX)
                    .and_then(|v| v.checked_add(digit))
                    .ok_or(CodecError::Overflow)
            })
    }

    /// Decodes a short code back into the store identifier it was built from.
    ///
    /// Only canonical codes are accepted: a multi-character code starting
    /// with the zero digit `a` decodes to the same value as the code without
    /// it, and is rejected so every identifier has exactly one code.
    ///
    /// # Errors
    ///
    /// Any [`decode`](Self::decode) error, plus [`CodecError::NonCanonical`]
    /// and [`CodecError::BelowPadding`].
    pub fn identifier(&self, code: &str) -> Result<u64, CodecError> {
        let value = self.decode(code)?;

        if code.len() > 1 && code.as_bytes()[0] == ALPHABET[0] {
            return Err(CodecError::NonCanonical);
        }

        value
            .checked_sub(self.padding)
            .ok_or(CodecError::BelowPadding { value })
    }
}

/// Returns the partition metadata of a code: its length and first character.
pub fn partition(code: &str) -> Option<(i32, char)> {
    let first = code.chars().next()?;
    let length = i32::try_from(code.chars().count()).ok()?;
    Some((length, first))
}

fn digit_value(character: char) -> Option<u64> {
    let digit = match character {
        'a'..='z' => character as u32 - 'a' as u32,
        'A'..='Z' => character as u32 - 'A' as u32 + 26,
        '0'..='9' => character as u32 - '0' as u32 + 52,
        _ => return None,
    };
    Some(u64::from(digit))
}
