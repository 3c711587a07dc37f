//! Identifier format predicates, used as guards before any store or OTP call.

use regex::Regex;
use std::sync::OnceLock;

static REG_NUMBER_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

/// Validates an institutional registration number, e.g. `X123-45-6789/2024`.
///
/// Shape: one letter, three digits, `-`, two digits, `-`, four digits, `/`,
/// four-digit year. Case-insensitive.
pub fn is_valid_reg_number(s: &str) -> bool {
    let re = REG_NUMBER_RE
        .get_or_init(|| Regex::new(r"^(?i)[a-z]\d{3}-\d{2}-\d{4}/\d{4}$").expect("valid regex"));
    re.is_match(s)
}

/// Validates a student email, e.g. `jane.doe22@students.dkut.ac.ke`.
///
/// Shape: `firstname.lastname<2-digit-year>@students.<institution-domain>`.
/// Case-insensitive.
pub fn is_valid_email(s: &str) -> bool {
    let re = EMAIL_RE.get_or_init(|| {
        Regex::new(r"^(?i)[a-z]+\.[a-z]+\d{2}@students\.[a-z0-9-]+(\.[a-z]{2,})+$")
            .expect("valid regex")
    });
    re.is_match(s)
}

/// True when the string is either a valid registration number or a valid
/// student email. Login and reset accept both interchangeably.
pub fn is_valid_identifier(s: &str) -> bool {
    is_valid_reg_number(s) || is_valid_email(s)
}
