//! IMEI shape classification and Luhn-style checksum validation.

use std::fmt;

/// Number of digits in an IMEI.
pub const IMEI_LEN: usize = 15;

/// A 15-digit identifier whose shape (length + all ASCII digits) has been checked.
///
/// The checksum is evaluated separately, see [`Imei::has_valid_checksum`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Imei(String);

impl Imei {
    pub fn parse(raw: &str) -> Option<Self> {
        has_imei_shape(raw).then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn has_valid_checksum(&self) -> bool {
        validate(&self.0)
    }
}

impl fmt::Display for Imei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of classifying raw user text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImeiInput {
    /// 15 digits; checksum not yet evaluated.
    Candidate(Imei),
    InvalidShape,
}

/// Classify a user message. Surrounding whitespace is ignored.
pub fn classify(text: &str) -> ImeiInput {
    match Imei::parse(text.trim()) {
        Some(imei) => ImeiInput::Candidate(imei),
        None => ImeiInput::InvalidShape,
    }
}

/// Validate length, digits and the Luhn-style checksum.
pub fn validate(imei: &str) -> bool {
    if !has_imei_shape(imei) {
        return false;
    }

    let total: u32 = imei
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let mut n = u32::from(b - b'0');
            if i % 2 == 1 {
                n *= 2;
                if n > 9 {
                    n -= 9;
                }
            }
            n
        })
        .sum();

    total % 10 == 0
}

fn has_imei_shape(s: &str) -> bool {
    s.len() == IMEI_LEN && s.bytes().all(|b| b.is_ascii_digit())
}
