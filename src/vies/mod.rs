//! EU VIES integration.
//!
//! [`ViesClient`] talks to the VIES REST API and retries transient
//! failures with linear backoff. [`ViesSoapClient`] talks to the legacy
//! SOAP service and makes a single attempt. Both implement
//! [`ValidationBackend`](crate::core::ValidationBackend) and serve the
//! default route of a [`Validator`](crate::core::Validator).
//!
//! # Example
//!
//! ```ignore
//! use vatid::core::{VatId, Validator};
//! use vatid::vies::ViesClient;
//!
//! let vies = ViesClient::builder().retries(3).build()?;
//!
//! // Registry details (async, requires network)
//! let result = vies.lookup(&VatId::parse("NL822010690B01")?).await?;
//! println!("{:?}", result.name);
//!
//! // As a validator backend
//! let validator = Validator::builder().vies(vies).build();
//! validator.validate("NL822010690B01").await?;
//! ```

mod rest;
mod retry;
mod soap;

pub use rest::{SERVICE_BASE_URL, ViesClient, ViesClientBuilder, ViesResult};
pub use retry::RetryPolicy;
pub use soap::{SOAP_SERVICE_URL, ViesSoapClient, ViesSoapClientBuilder};
