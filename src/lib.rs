//! # vatid
//!
//! VAT and tax ID validation: parsing, per-country format rules, and
//! existence checks against the registries that can confirm a number.
//!
//! Every check yields the same small error taxonomy, [`VatError`]:
//! invalid format, invalid country code, not found, or service unavailable.
//!
//! ## Quick Start
//!
//! ```rust
//! use vatid::core::*;
//!
//! let id = VatId::parse("NL 822010690 B01").unwrap();
//! assert_eq!(id.country_code(), "NL");
//! assert_eq!(id.number(), "822010690B01");
//!
//! assert_eq!(VatId::parse("AU41824753556"), Err(VatError::InvalidFormat));
//! assert_eq!(VatId::parse("AR822010690B05"), Err(VatError::InvalidCountryCode));
//! ```
//!
//! Existence checks go through a [`Validator`], which dispatches by
//! country: `GB` to HMRC, `AU` to the ABR, and everything else to VIES.
//! A route without a backend is checked by format only.
//!
//! ```ignore
//! use vatid::core::Validator;
//! use vatid::vies::ViesClient;
//!
//! let validator = Validator::builder()
//!     .vies(ViesClient::builder().retries(3).build()?)
//!     .build();
//! validator.validate("NL822010690B01").await?;
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Parsing, format patterns, ABN checksum, routing |
//! | `vies` | EU VIES REST client (with retries) and legacy SOAP client |
//! | `ukvat` | HMRC VAT registered companies lookup (OAuth2) |
//! | `abn` | Australian Business Register ABN lookup |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(any(feature = "vies", feature = "abn"))]
mod xml_utils;

#[cfg(feature = "vies")]
pub mod vies;

#[cfg(feature = "ukvat")]
pub mod ukvat;

#[cfg(feature = "abn")]
pub mod abn;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
