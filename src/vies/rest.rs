//! EU VIES REST API client for VAT number validation.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::retry::{AttemptError, RetryPolicy};
use crate::core::{ValidationBackend, VatError, VatId};

/// Production VIES REST endpoint root.
pub const SERVICE_BASE_URL: &str = "https://ec.europa.eu/taxation_customs/vies/rest-api";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a VIES VAT number check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViesResult {
    /// Whether the VAT number is currently valid.
    pub valid: bool,
    /// Date of the request (YYYY-MM-DD, possibly with a zone suffix).
    pub request_date: Option<String>,
    /// Registered company name (if the member state discloses it).
    pub name: Option<String>,
    /// Registered address (if the member state discloses it).
    pub address: Option<String>,
}

/// VIES API response structure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViesApiResponse {
    action_succeed: Option<bool>,
    #[serde(default)]
    error_wrappers: Vec<ViesErrorWrapper>,
    valid: Option<bool>,
    request_date: Option<String>,
    name: Option<String>,
    address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ViesErrorWrapper {
    error: Option<String>,
}

/// VIES API request body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ViesRequest<'a> {
    country_code: &'a str,
    vat_number: &'a str,
}

/// VIES reports "---" for fields a member state does not disclose.
fn disclosed(value: Option<String>) -> Option<String> {
    value.filter(|v| v != "---" && !v.is_empty())
}

/// Map a failed VIES action to an attempt outcome by its first error code.
fn classify_action_error(wrappers: &[ViesErrorWrapper]) -> AttemptError {
    let Some(code) = wrappers.first().and_then(|w| w.error.as_deref()) else {
        return VatError::unavailable("VIES action failed without an error code").into();
    };

    match code {
        "INVALID_INPUT" => VatError::InvalidFormat.into(),
        "MS_MAX_CONCURRENT_REQ" | "GLOBAL_MAX_CONCURRENT_REQ" => {
            AttemptError::RateLimited(code.to_string())
        }
        "MS_UNAVAILABLE" => VatError::unavailable("member state service unavailable").into(),
        other => VatError::unavailable(format!("VIES error {other}")).into(),
    }
}

fn network(e: reqwest::Error) -> AttemptError {
    VatError::unavailable(format!("VIES request failed: {e}")).into()
}

/// Client for the VIES `check-vat-number` REST endpoint.
///
/// Transient failures are retried according to the configured
/// [`RetryPolicy`]; the default is a single attempt.
#[derive(Debug, Clone)]
pub struct ViesClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl ViesClient {
    /// Client for the production endpoint with default options.
    ///
    /// # Errors
    ///
    /// Returns `VatError::ServiceUnavailable` if the HTTP client cannot be built.
    pub fn new() -> Result<Self, VatError> {
        Self::builder().build()
    }

    pub fn builder() -> ViesClientBuilder {
        ViesClientBuilder::new()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    fn endpoint(&self) -> String {
        format!("{}/check-vat-number", self.base_url)
    }

    /// Look up a VAT number, returning the registry's details.
    ///
    /// A number that is well-formed but unregistered yields
    /// `Ok(ViesResult { valid: false, .. })`.
    ///
    /// # Errors
    ///
    /// `VatError::InvalidFormat` if VIES rejects the input, otherwise
    /// `VatError::ServiceUnavailable` once the retry budget is spent.
    pub async fn lookup(&self, id: &VatId) -> Result<ViesResult, VatError> {
        self.retry.run(|| self.check_once(id)).await
    }

    async fn validate_once(&self, id: &VatId) -> Result<(), AttemptError> {
        let result = self.check_once(id).await?;
        if !result.valid {
            return Err(VatError::NotFound.into());
        }
        Ok(())
    }

    async fn check_once(&self, id: &VatId) -> Result<ViesResult, AttemptError> {
        let req = ViesRequest {
            country_code: id.country_code(),
            vat_number: id.number(),
        };

        let resp = self
            .http
            .post(self.endpoint())
            .header(ACCEPT, "application/json")
            .json(&req)
            .send()
            .await
            .map_err(network)?;

        let status = resp.status();
        let body = resp.text().await.map_err(network)?;

        if status == StatusCode::BAD_REQUEST {
            return Err(VatError::InvalidFormat.into());
        }
        if status != StatusCode::OK {
            return Err(VatError::unavailable(format!("VIES returned HTTP {status}")).into());
        }

        let api_resp: ViesApiResponse = serde_json::from_str(&body)
            .map_err(|e| VatError::unavailable(format!("malformed VIES response: {e}")))?;

        if api_resp.action_succeed == Some(false) || !api_resp.error_wrappers.is_empty() {
            return Err(classify_action_error(&api_resp.error_wrappers));
        }

        let Some(valid) = api_resp.valid else {
            return Err(VatError::unavailable("VIES response has no valid flag").into());
        };

        Ok(ViesResult {
            valid,
            request_date: api_resp.request_date,
            name: disclosed(api_resp.name),
            address: disclosed(api_resp.address),
        })
    }
}

#[async_trait]
impl ValidationBackend for ViesClient {
    async fn validate(&self, id: &VatId) -> Result<(), VatError> {
        self.retry.run(|| self.validate_once(id)).await
    }
}

/// Options for [`ViesClient`].
#[derive(Debug, Clone)]
pub struct ViesClientBuilder {
    base_url: String,
    http: Option<reqwest::Client>,
    retries: u32,
    timeout: Duration,
}

impl Default for ViesClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ViesClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: SERVICE_BASE_URL.to_string(),
            http: None,
            retries: 0,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Endpoint root, e.g. a mock server in tests.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Use a preconfigured HTTP client. Its own timeout applies instead of
    /// [`ViesClientBuilder::timeout`].
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Total attempt budget for transient failures (0 = a single call).
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// # Errors
    ///
    /// Returns `VatError::ServiceUnavailable` if the HTTP client cannot be built.
    pub fn build(self) -> Result<ViesClient, VatError> {
        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| VatError::unavailable(format!("HTTP client init failed: {e}")))?,
        };

        Ok(ViesClient {
            http,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::new(self.retries),
        })
    }
}
