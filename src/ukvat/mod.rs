//! HMRC "VAT registered companies" lookup for GB numbers.
//!
//! Authenticates with OAuth2 client credentials and caches the bearer
//! token until two minutes before it expires.
//!
//! API documentation:
//! <https://developer.service.hmrc.gov.uk/api-documentation/docs/api/service/vat-registered-companies-api/2.0>
//!
//! # Example
//!
//! ```ignore
//! use vatid::core::Validator;
//! use vatid::ukvat::{TEST_SERVICE_BASE_URL, UkVatClient, UkVatCredentials};
//!
//! let client = UkVatClient::builder(UkVatCredentials::from_env()?)
//!     .base_url(TEST_SERVICE_BASE_URL)
//!     .build()?;
//! let validator = Validator::builder().uk_vat(client).build();
//! validator.validate("GB146295999727").await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::core::{ConfigError, ValidationBackend, VatError, VatId, require_env};

/// Production API root.
pub const SERVICE_BASE_URL: &str = "https://api.service.hmrc.gov.uk";
/// Sandbox API root.
pub const TEST_SERVICE_BASE_URL: &str = "https://test-api.service.hmrc.gov.uk";

/// Tokens are refreshed once they are this close to expiry.
const REFRESH_MARGIN_SECS: i64 = 120;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const LOOKUP_ACCEPT: &str = "application/vnd.hmrc.2.0+json";

/// OAuth2 client credentials issued by the HMRC developer hub.
///
/// `Debug` redacts the secret.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UkVatCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for UkVatCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UkVatCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

impl UkVatCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Load credentials from `UKVAT_API_CLIENT_ID` and `UKVAT_API_CLIENT_SECRET`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: require_env("UKVAT_API_CLIENT_ID")?,
            client_secret: require_env("UKVAT_API_CLIENT_SECRET")?,
        })
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    error_description: Option<String>,
}

#[derive(Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at - TimeDelta::seconds(REFRESH_MARGIN_SECS)
    }
}

/// Client for the HMRC VAT number lookup.
///
/// The cached token sits behind a mutex that is held only while reading
/// or writing it. Refreshes are serialized by a second, async mutex so a
/// burst of callers with a stale token triggers one token request.
pub struct UkVatClient {
    http: reqwest::Client,
    base_url: String,
    credentials: UkVatCredentials,
    token: Mutex<Option<CachedToken>>,
    refresh: tokio::sync::Mutex<()>,
}

impl fmt::Debug for UkVatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UkVatClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl UkVatClient {
    /// Client for the production API.
    ///
    /// # Errors
    ///
    /// Returns `VatError::ServiceUnavailable` if the HTTP client cannot be built.
    pub fn new(credentials: UkVatCredentials) -> Result<Self, VatError> {
        Self::builder(credentials).build()
    }

    pub fn builder(credentials: UkVatCredentials) -> UkVatClientBuilder {
        UkVatClientBuilder::new(credentials)
    }

    fn cached_token(&self) -> Option<String> {
        let guard = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|t| t.is_fresh(Utc::now()))
            .map(|t| t.value.clone())
    }

    fn store_token(&self, token: CachedToken) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    fn clear_token(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Fetch a new access token and cache it, regardless of the current one.
    ///
    /// # Errors
    ///
    /// Returns `VatError::ServiceUnavailable` if HMRC rejects the
    /// credentials or the token response cannot be decoded.
    pub async fn authenticate(&self) -> Result<(), VatError> {
        let _refresh = self.refresh.lock().await;
        let token = self.request_token().await?;
        self.store_token(token);
        Ok(())
    }

    /// A fresh bearer token, refreshing it if it is near expiry.
    async fn bearer_token(&self) -> Result<String, VatError> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let _refresh = self.refresh.lock().await;
        // Another caller may have refreshed while we waited.
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let token = self.request_token().await?;
        let value = token.value.clone();
        self.store_token(token);
        Ok(value)
    }

    async fn request_token(&self) -> Result<CachedToken, VatError> {
        tracing::debug!(client_id = %self.credentials.client_id, "requesting HMRC access token");

        let form = [
            ("client_secret", self.credentials.client_secret.as_str()),
            ("client_id", self.credentials.client_id.as_str()),
            ("grant_type", "client_credentials"),
            ("scope", "read:vat"),
        ];
        let resp = self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .form(&form)
            .send()
            .await
            .map_err(|e| VatError::unavailable(format!("HMRC token request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| VatError::unavailable(format!("HMRC token read failed: {e}")))?;

        if status != StatusCode::OK {
            let description = serde_json::from_str::<TokenErrorResponse>(&body)
                .ok()
                .and_then(|r| r.error_description)
                .unwrap_or_else(|| "failed to decode error response".to_string());
            tracing::warn!(%status, %description, "HMRC authentication failed");
            return Err(VatError::unavailable(format!(
                "failed to authenticate with UK VAT API: {description}"
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            VatError::unavailable(format!("failed to decode UK VAT API token response: {e}"))
        })?;

        // An out-of-range lifetime is treated as already expired.
        let now = Utc::now();
        let expires_at = TimeDelta::try_seconds(token.expires_in)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(now);

        Ok(CachedToken {
            value: token.access_token,
            expires_at,
        })
    }
}

#[async_trait]
impl ValidationBackend for UkVatClient {
    async fn validate(&self, id: &VatId) -> Result<(), VatError> {
        let token = self.bearer_token().await?;

        let url = format!(
            "{}/organisations/vat/check-vat-number/lookup/{}",
            self.base_url,
            id.number()
        );
        let resp = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(ACCEPT, LOOKUP_ACCEPT)
            .send()
            .await
            .map_err(|e| VatError::unavailable(format!("UK VAT lookup failed: {e}")))?;

        // A 200 means the number is registered; the body is not needed.
        match resp.status() {
            StatusCode::OK => Ok(()),
            StatusCode::BAD_REQUEST => Err(VatError::InvalidFormat),
            StatusCode::NOT_FOUND => Err(VatError::NotFound),
            StatusCode::UNAUTHORIZED => {
                // The token was revoked early; make the next call re-authenticate.
                self.clear_token();
                Err(VatError::unavailable("unauthorized request to UK VAT API"))
            }
            status => Err(VatError::unavailable(format!(
                "unexpected status code from UK VAT API: {status}"
            ))),
        }
    }
}

/// Options for [`UkVatClient`].
#[derive(Debug, Clone)]
pub struct UkVatClientBuilder {
    credentials: UkVatCredentials,
    base_url: String,
    http: Option<reqwest::Client>,
    timeout: Duration,
}

impl UkVatClientBuilder {
    pub fn new(credentials: UkVatCredentials) -> Self {
        Self {
            credentials,
            base_url: SERVICE_BASE_URL.to_string(),
            http: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// API root, e.g. [`TEST_SERVICE_BASE_URL`] for the sandbox.
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
    pub fn build(self) -> Result<UkVatClient, VatError> {
        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| VatError::unavailable(format!("HTTP client init failed: {e}")))?,
        };

        Ok(UkVatClient {
            http,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            credentials: self.credentials,
            token: Mutex::new(None),
            refresh: tokio::sync::Mutex::new(()),
        })
    }
}
