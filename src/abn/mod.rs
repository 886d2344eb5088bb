//! Australian Business Register (ABR) XML search for AU numbers.
//!
//! Uses the `SearchByABNv202001` operation, which needs an authentication
//! GUID issued by the ABR. See
//! <https://abr.business.gov.au/abrxmlsearch/Forms/Documentation.aspx>.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use crate::core::{ConfigError, ValidationBackend, VatError, VatId, require_env};
use crate::xml_utils;

/// Production ABR XML search root.
pub const SERVICE_BASE_URL: &str = "https://abr.business.gov.au/abrxmlsearch/AbrXmlSearch.asmx";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Exception description the ABR returns for malformed search text.
const INVALID_SEARCH_TEXT: &str = "Search text is not a valid ABN or ACN";

#[derive(Debug, Deserialize)]
struct AbrPayload {
    response: Option<AbrResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AbrResponse {
    #[serde(default)]
    usage_statement: String,
    exception: Option<AbrException>,
}

/// Exception codes are listed at
/// <https://api.gov.au/service/5b639f0f63f18432cd0e1a66/Exceptions#exception-codes-and-descriptions>.
#[derive(Debug, Deserialize)]
struct AbrException {
    #[serde(rename = "exceptionDescription", default)]
    description: String,
    #[serde(rename = "exceptionCode", default)]
    code: String,
}

impl AbrException {
    fn into_error(self) -> VatError {
        if self.description == INVALID_SEARCH_TEXT {
            return VatError::InvalidFormat;
        }
        VatError::unavailable(format!("ABR exception {}: {}", self.code, self.description))
    }
}

/// Map a decoded ABR payload to an outcome.
fn classify_payload(payload: AbrPayload) -> Result<(), VatError> {
    let Some(response) = payload.response else {
        return Err(VatError::unavailable("ABR payload has no response element"));
    };

    match response.exception {
        Some(exception) if response.usage_statement.is_empty() => Err(exception.into_error()),
        _ => Ok(()),
    }
}

/// Client for the ABR ABN lookup.
///
/// `Debug` redacts the authentication GUID.
#[derive(Clone)]
pub struct AbnClient {
    http: reqwest::Client,
    base_url: String,
    guid: String,
}

impl fmt::Debug for AbnClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbnClient")
            .field("base_url", &self.base_url)
            .field("guid", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl AbnClient {
    /// Client for the production service.
    ///
    /// # Errors
    ///
    /// Returns `VatError::ServiceUnavailable` if the HTTP client cannot be built.
    pub fn new(guid: impl Into<String>) -> Result<Self, VatError> {
        Self::builder(guid).build()
    }

    pub fn builder(guid: impl Into<String>) -> AbnClientBuilder {
        AbnClientBuilder::new(guid)
    }

    /// Builder seeded with the GUID from `ABN_API_AUTH_GUID`.
    pub fn from_env() -> Result<AbnClientBuilder, ConfigError> {
        Ok(AbnClientBuilder::new(require_env("ABN_API_AUTH_GUID")?))
    }
}

#[async_trait]
impl ValidationBackend for AbnClient {
    async fn validate(&self, id: &VatId) -> Result<(), VatError> {
        let resp = self
            .http
            .get(format!("{}/SearchByABNv202001", self.base_url))
            .query(&[
                ("searchString", id.number()),
                ("includeHistoricalDetails", "N"),
                ("authenticationGuid", self.guid.as_str()),
            ])
            .send()
            .await
            .map_err(|e| VatError::unavailable(format!("ABR request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| VatError::unavailable(format!("ABR read failed: {e}")))?;

        if status == StatusCode::BAD_REQUEST {
            return Err(VatError::InvalidFormat);
        }
        if status != StatusCode::OK {
            return Err(VatError::unavailable(format!("ABR returned HTTP {status}")));
        }

        classify_payload(xml_utils::decode(&body)?)
    }
}

/// Options for [`AbnClient`].
#[derive(Clone)]
pub struct AbnClientBuilder {
    guid: String,
    base_url: String,
    http: Option<reqwest::Client>,
    timeout: Duration,
}

impl AbnClientBuilder {
    pub fn new(guid: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            base_url: SERVICE_BASE_URL.to_string(),
            http: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// # Errors
    ///
    /// Returns `VatError::ServiceUnavailable` if the HTTP client cannot be built.
    pub fn build(self) -> Result<AbnClient, VatError> {
        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| VatError::unavailable(format!("HTTP client init failed: {e}")))?,
        };

        Ok(AbnClient {
            http,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            guid: self.guid,
        })
    }
}
