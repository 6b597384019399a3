// T.C. Kimlik No (TCKN): 11 digits, no leading zero, the last two digits are
// checksums over the first nine and first ten digits.

use crate::models::NationalIdNumber;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref TCKN_RE: Regex = Regex::new(r"\b[1-9][0-9]{10}\b").unwrap();
}

/// First word-bounded 11-digit run with a non-zero first digit, scanning the
/// text in reading order. The checksum is not consulted.
pub fn extract_id(text: &str) -> Option<NationalIdNumber> {
    let found = TCKN_RE
        .find(text)
        .and_then(|m| NationalIdNumber::parse(m.as_str()));
    match &found {
        Some(id) => debug!("TCKN found: {}", id),
        None => debug!("TCKN not found"),
    }
    found
}

/// Why a candidate failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum IdRejection {
    WrongLength { length: usize },
    NonDigit,
    LeadingZero,
    /// Tenth digit does not match the alternating-sum checksum.
    FirstChecksum { expected: u8, found: u8 },
    /// Eleventh digit does not match the digit-sum checksum.
    SecondChecksum { expected: u8, found: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdCheck {
    Valid,
    Invalid(IdRejection),
}

impl IdCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, IdCheck::Valid)
    }
}

/// Tenth and eleventh digits implied by the first nine.
pub fn checksum_digits(first_nine: &[u8; 9]) -> (u8, u8) {
    let odd: i32 = first_nine.iter().step_by(2).map(|&d| i32::from(d)).sum();
    let even: i32 = first_nine.iter().skip(1).step_by(2).map(|&d| i32::from(d)).sum();
    let tenth = (odd * 7 - even).rem_euclid(10) as u8;
    let eleventh = ((odd + even + i32::from(tenth)) % 10) as u8;
    (tenth, eleventh)
}

pub fn check_id(candidate: &str) -> IdCheck {
    let length = candidate.chars().count();
    if length != NationalIdNumber::LEN {
        return IdCheck::Invalid(IdRejection::WrongLength { length });
    }
    if !candidate.bytes().all(|b| b.is_ascii_digit()) {
        return IdCheck::Invalid(IdRejection::NonDigit);
    }

    let digits: Vec<u8> = candidate.bytes().map(|b| b - b'0').collect();
    if digits[0] == 0 {
        return IdCheck::Invalid(IdRejection::LeadingZero);
    }

    let mut first_nine = [0u8; 9];
    first_nine.copy_from_slice(&digits[..9]);
    let (tenth, _) = checksum_digits(&first_nine);
    if tenth != digits[9] {
        return IdCheck::Invalid(IdRejection::FirstChecksum {
            expected: tenth,
            found: digits[9],
        });
    }

    let eleventh = (digits[..10].iter().map(|&d| u32::from(d)).sum::<u32>() % 10) as u8;
    if eleventh != digits[10] {
        return IdCheck::Invalid(IdRejection::SecondChecksum {
            expected: eleventh,
            found: digits[10],
        });
    }

    IdCheck::Valid
}

pub fn is_valid_id(candidate: &str) -> bool {
    let check = check_id(candidate);
    if let IdCheck::Invalid(reason) = check {
        debug!("TCKN {} rejected: {:?}", candidate, reason);
    }
    check.is_valid()
}
