use thiserror::Error;

/// Errors that can occur while parsing or validating a VAT number.
///
/// This is the whole taxonomy a caller ever sees: parser errors and
/// backend outcomes are both expressed with it, and backend-specific
/// failure modes are folded into these variants at the backend boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum VatError {
    /// The number is structurally malformed, or a backend rejected its shape.
    #[error("invalid VAT number format")]
    InvalidFormat,

    /// The two-letter prefix is not a supported country code.
    #[error("invalid country code")]
    InvalidCountryCode,

    /// The number is well-formed but not registered.
    #[error("VAT number not found")]
    NotFound,

    /// The backend could not give an answer (transport, auth, decode,
    /// unexpected status, or an ambiguous response).
    #[error("validation service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl VatError {
    /// Shorthand for a [`VatError::ServiceUnavailable`] with a detail message.
    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self::ServiceUnavailable(detail.into())
    }

    /// `true` for [`VatError::ServiceUnavailable`].
    pub fn is_service_unavailable(&self) -> bool {
        matches!(self, Self::ServiceUnavailable(_))
    }

    /// `true` for negative results that retrying cannot change:
    /// [`VatError::InvalidFormat`] and [`VatError::NotFound`].
    pub fn is_authoritative(&self) -> bool {
        matches!(self, Self::InvalidFormat | Self::NotFound)
    }
}

/// Errors loading backend configuration from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required environment variable is unset or not valid unicode.
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),
}

/// Read a required environment variable.
#[cfg_attr(not(any(feature = "ukvat", feature = "abn")), allow(dead_code))]
pub(crate) fn require_env(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnv(name))
}
