use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::domain::validation::ValidationError;

static DOMESTIC_MOBILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^0(?:20|60|70|80|90)[1-9]\d{7}$").expect("invalid domestic mobile pattern")
});

static DOMESTIC_LONG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^0(?:200|600|700|800|900)\d{10}$").expect("invalid domestic long-form pattern")
});

static INTERNATIONAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^81(?:70|80|90)\d{8}$").expect("invalid international pattern")
});

const COUNTRY_PREFIX: &str = "81";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
/// Which numbering pattern a [`CanonicalPhone`] was accepted under.
pub enum NumberPattern {
    /// `0` + carrier prefix + 7 digits, 11 digits total. Also covers bare 11-digit `0` numbers.
    DomesticMobile,
    /// `0` + `200|600|700|800|900` + 10 digits, 14 digits total.
    DomesticLong,
    /// An `81`-prefixed input rewritten to its domestic form.
    International,
}

#[derive(Debug, Clone)]
/// Phone number in the gateway's domestic (`0`-leading) form.
///
/// Equality, ordering, and hashing use the digit string only.
pub struct CanonicalPhone {
    digits: String,
    pattern: NumberPattern,
}

impl CanonicalPhone {
    /// Strip everything but digits (full-width digits count) and classify the result.
    ///
    /// Patterns are tried in order (domestic mobile, domestic long form, `81` international);
    /// after those, an `81` number of 11 or 12 digits or a `0` number of exactly 11 digits is
    /// still accepted. Anything else is rejected with [`ValidationError::UnrecognizedPhone`].
    pub fn normalize(raw: &str) -> Result<Self, ValidationError> {
        let digits: String = raw.chars().filter_map(ascii_digit).collect();

        if DOMESTIC_MOBILE.is_match(&digits) {
            return Ok(Self::domestic(digits, NumberPattern::DomesticMobile));
        }
        if DOMESTIC_LONG.is_match(&digits) {
            return Ok(Self::domestic(digits, NumberPattern::DomesticLong));
        }
        if INTERNATIONAL.is_match(&digits) {
            return Ok(Self::from_international(&digits));
        }

        match (digits.strip_prefix(COUNTRY_PREFIX), digits.len()) {
            (Some(_), 11 | 12) => Ok(Self::from_international(&digits)),
            _ if digits.starts_with('0') && digits.len() == 11 => {
                Ok(Self::domestic(digits, NumberPattern::DomesticMobile))
            }
            _ => Err(ValidationError::UnrecognizedPhone {
                cleaned_digits: digits,
            }),
        }
    }

    fn domestic(digits: String, pattern: NumberPattern) -> Self {
        Self { digits, pattern }
    }

    fn from_international(digits: &str) -> Self {
        Self {
            digits: format!("0{}", &digits[COUNTRY_PREFIX.len()..]),
            pattern: NumberPattern::International,
        }
    }

    /// Domestic digit string as sent on a first attempt.
    pub fn as_str(&self) -> &str {
        &self.digits
    }

    pub fn pattern(&self) -> NumberPattern {
        self.pattern
    }

    /// The `81` form of this number: leading `0` dropped, `81` prepended.
    pub fn to_international(&self) -> MobileNumber {
        let national = self.digits.strip_prefix('0').unwrap_or(&self.digits);
        MobileNumber {
            digits: format!("{COUNTRY_PREFIX}{national}"),
            form: PhoneForm::International,
        }
    }

    /// This number as it is sent on a first attempt.
    pub fn to_domestic(&self) -> MobileNumber {
        MobileNumber {
            digits: self.digits.clone(),
            form: PhoneForm::Domestic,
        }
    }

    /// The number in the requested wire form.
    pub fn in_form(&self, form: PhoneForm) -> MobileNumber {
        match form {
            PhoneForm::Domestic => self.to_domestic(),
            PhoneForm::International => self.to_international(),
        }
    }
}

fn ascii_digit(c: char) -> Option<char> {
    match c {
        '0'..='9' => Some(c),
        '\u{FF10}'..='\u{FF19}' => char::from_u32(u32::from(c) - 0xFF10 + u32::from('0')),
        _ => None,
    }
}

impl PartialEq for CanonicalPhone {
    fn eq(&self, other: &Self) -> bool {
        self.digits == other.digits
    }
}

impl Eq for CanonicalPhone {}

impl std::hash::Hash for CanonicalPhone {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.digits.hash(state);
    }
}

impl PartialOrd for CanonicalPhone {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CanonicalPhone {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.digits.cmp(&other.digits)
    }
}

impl fmt::Display for CanonicalPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

impl Serialize for CanonicalPhone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.digits)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
/// Wire form of a `mobilenumber` value.
pub enum PhoneForm {
    /// `0`-leading domestic digits.
    Domestic,
    /// `81`-leading digits.
    International,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
/// The exact `mobilenumber` value sent to the gateway.
pub struct MobileNumber {
    digits: String,
    form: PhoneForm,
}

impl MobileNumber {
    /// Form field name used by the gateway (`mobilenumber`).
    pub const FIELD: &'static str = "mobilenumber";

    pub fn as_str(&self) -> &str {
        &self.digits
    }

    pub fn form(&self) -> PhoneForm {
        self.form
    }
}

impl fmt::Display for MobileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(raw: &str) -> String {
        CanonicalPhone::normalize(raw).unwrap().as_str().to_owned()
    }

    #[test]
    fn domestic_mobile_is_identity() {
        for raw in ["09012345678", "08011112222", "07098765432", "02012345678", "06019999999"] {
            let phone = CanonicalPhone::normalize(raw).unwrap();
            assert_eq!(phone.as_str(), raw);
            assert_eq!(phone.pattern(), NumberPattern::DomesticMobile);
        }
    }

    #[test]
    fn domestic_long_form_is_identity() {
        let phone = CanonicalPhone::normalize("09001234567890").unwrap();
        assert_eq!(phone.as_str(), "09001234567890");
        assert_eq!(phone.pattern(), NumberPattern::DomesticLong);
    }

    #[test]
    fn international_form_becomes_domestic() {
        for (raw, expected) in [
            ("819012345678", "09012345678"),
            ("818011112222", "08011112222"),
            ("817098765432", "07098765432"),
        ] {
            let phone = CanonicalPhone::normalize(raw).unwrap();
            assert_eq!(phone.as_str(), expected);
            assert_eq!(phone.pattern(), NumberPattern::International);
        }
    }

    #[test]
    fn punctuation_and_spacing_are_ignored() {
        assert_eq!(normalized("090-1234-5678"), "09012345678");
        assert_eq!(normalized(" (090) 1234 5678 "), "09012345678");
        assert_eq!(normalized("+81 90 1234 5678"), "09012345678");
        assert_eq!(normalized("+81-90-1234-5678"), normalized("819012345678"));
    }

    #[test]
    fn fullwidth_digits_are_read_as_digits() {
        assert_eq!(normalized("０９０－１２３４－５６７８"), "09012345678");
    }

    #[test]
    fn equality_ignores_the_accepted_pattern() {
        let domestic = CanonicalPhone::normalize("09012345678").unwrap();
        let international = CanonicalPhone::normalize("+81 90 1234 5678").unwrap();
        assert_ne!(domestic.pattern(), international.pattern());
        assert_eq!(domestic, international);
    }

    #[test]
    fn lenient_fallbacks_are_accepted() {
        // 81 + 9 digits and 81 + 10 digits outside the carrier prefixes.
        let phone = CanonicalPhone::normalize("81312345678").unwrap();
        assert_eq!(phone.as_str(), "0312345678");
        assert_eq!(phone.pattern(), NumberPattern::International);

        let phone = CanonicalPhone::normalize("813123456789").unwrap();
        assert_eq!(phone.as_str(), "03123456789");

        // 11-digit landline-style number starting with 0.
        let phone = CanonicalPhone::normalize("03123456789").unwrap();
        assert_eq!(phone.as_str(), "03123456789");
        assert_eq!(phone.pattern(), NumberPattern::DomesticMobile);
    }

    #[test]
    fn unrecognized_numbers_are_rejected() {
        for raw in ["", "abcdefg", "012345678", "+1 415 555 0100", "0901234567890123"] {
            let err = CanonicalPhone::normalize(raw).unwrap_err();
            assert!(
                matches!(err, ValidationError::UnrecognizedPhone { .. }),
                "expected rejection for {raw:?}"
            );
        }

        assert_eq!(
            CanonicalPhone::normalize("090-1234").unwrap_err(),
            ValidationError::UnrecognizedPhone {
                cleaned_digits: "0901234".to_owned()
            }
        );
    }

    #[test]
    fn international_retry_form_drops_leading_zero() {
        let phone = CanonicalPhone::normalize("09012345678").unwrap();
        let alt = phone.to_international();
        assert_eq!(alt.as_str(), "819012345678");
        assert_eq!(alt.form(), PhoneForm::International);

        let first = phone.in_form(PhoneForm::Domestic);
        assert_eq!(first.as_str(), "09012345678");
        assert_eq!(first.form(), PhoneForm::Domestic);
    }
}
