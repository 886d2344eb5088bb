//! VAT number parsing, format rules, and backend routing.
//!
//! This module is always available. It validates the shape of a VAT
//! number without any network access, and routes existence checks to
//! whichever [`ValidationBackend`] is configured for the number's country.

mod backend;
mod checksum;
mod error;
mod id;
pub mod patterns;
mod validator;

pub use backend::*;
pub use checksum::is_valid_abn;
pub use error::*;
pub use id::*;
pub use patterns::{pattern_for, supported_country_codes};
pub use validator::*;
