use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::checksum::is_valid_abn;
use super::error::VatError;
use super::patterns::{has_checksum, pattern_for};

/// Shortest input (after whitespace removal) that can hold a prefix and a body.
const MIN_LENGTH: usize = 3;

/// A VAT number whose shape has been validated.
///
/// Only [`VatId::parse`] constructs one, so `country_code` is always a
/// supported code and `number` always matches that country's pattern.
///
/// ```
/// use vatid::core::VatId;
///
/// let id = VatId::parse("nl 822010690 b01").unwrap();
/// assert_eq!(id.country_code(), "NL");
/// assert_eq!(id.number(), "822010690B01");
/// assert_eq!(id.to_string(), "NL822010690B01");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct VatId {
    country_code: String,
    number: String,
}

impl VatId {
    /// Normalize `raw` and validate it against the country's format rule.
    ///
    /// All whitespace is removed and the input is uppercased before the
    /// two-letter prefix is split off.
    ///
    /// # Errors
    ///
    /// Returns `VatError::InvalidFormat` for input that is too short, does
    /// not match the pattern, or fails check digits, and
    /// `VatError::InvalidCountryCode` for an unsupported prefix.
    pub fn parse(raw: &str) -> Result<Self, VatError> {
        let stripped: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        // Checked before uppercasing, which can expand a character ("ß" -> "SS").
        if stripped.chars().count() < MIN_LENGTH {
            return Err(VatError::InvalidFormat);
        }
        let normalized = stripped.to_uppercase();

        // A non-ASCII first character cannot start a country code.
        let Some((country_code, number)) = normalized.split_at_checked(2) else {
            return Err(VatError::InvalidCountryCode);
        };

        let pattern = pattern_for(country_code).ok_or(VatError::InvalidCountryCode)?;
        if !pattern.is_match(number) {
            return Err(VatError::InvalidFormat);
        }
        if has_checksum(country_code) && !is_valid_abn(number) {
            return Err(VatError::InvalidFormat);
        }

        Ok(Self {
            country_code: country_code.to_string(),
            number: number.to_string(),
        })
    }

    /// Like [`VatId::parse`], but panics on invalid input.
    ///
    /// Meant for tests and trusted constants, never for user input.
    ///
    /// # Panics
    ///
    /// Panics if `raw` is not a valid VAT number.
    pub fn must_parse(raw: &str) -> Self {
        match Self::parse(raw) {
            Ok(id) => id,
            Err(e) => panic!("invalid VAT number {raw:?}: {e}"),
        }
    }

    /// Two-letter uppercase country code (e.g. "DE", "EL", "XI").
    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Number body without the country prefix.
    pub fn number(&self) -> &str {
        &self.number
    }
}

impl fmt::Display for VatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.country_code, self.number)
    }
}

impl FromStr for VatId {
    type Err = VatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VatId {
    type Error = VatError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<VatId> for String {
    fn from(id: VatId) -> Self {
        id.to_string()
    }
}
