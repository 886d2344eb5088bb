//! Legacy VIES SOAP `checkVat` client.
//!
//! The response body is searched for the VIES fault codes as plain
//! substrings before it is parsed as XML, so a fault code anywhere in the
//! body wins over the `valid` flag. This mirrors how the service has
//! historically been consumed but is brittle: prefer [`super::ViesClient`].

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use crate::core::{ValidationBackend, VatError, VatId};
use crate::xml_utils::{XmlWriter, find_text};

/// Production VIES SOAP endpoint.
pub const SOAP_SERVICE_URL: &str =
    "https://ec.europa.eu/taxation_customs/vies/services/checkVatService";

const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const CHECK_VAT_NS: &str = "urn:ec.europa.eu:taxud:vies:services:checkVat:types";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the `checkVat` request envelope.
fn build_envelope(id: &VatId) -> Result<String, VatError> {
    let mut w = XmlWriter::new()?;
    w.start_element_with_attrs("soapenv:Envelope", &[("xmlns:soapenv", SOAP_ENV_NS)])?;
    w.empty_element("soapenv:Header")?;
    w.start_element("soapenv:Body")?;
    w.start_element_with_attrs("checkVat", &[("xmlns", CHECK_VAT_NS)])?;
    w.text_element("countryCode", id.country_code())?;
    w.text_element("vatNumber", id.number())?;
    w.end_element("checkVat")?;
    w.end_element("soapenv:Body")?;
    w.end_element("soapenv:Envelope")?;
    w.into_string()
}

/// Classify a raw `checkVat` response body.
fn classify_response(body: &str) -> Result<(), VatError> {
    if body.contains("INVALID_INPUT") {
        return Err(VatError::InvalidFormat);
    }
    if body.contains("MS_UNAVAILABLE") {
        return Err(VatError::unavailable("member state service unavailable"));
    }
    if body.contains("MS_MAX_CONCURRENT_REQ") {
        return Err(VatError::unavailable("max concurrent requests limit hit"));
    }

    match find_text(body, "checkVatResponse", "valid")?.as_deref() {
        Some("true" | "1") => Ok(()),
        Some("false" | "0") => Err(VatError::NotFound),
        Some(other) => {
            Err(VatError::unavailable(format!("unexpected checkVat valid flag {other:?}")))
        }
        None => Err(VatError::unavailable("response has no checkVatResponse/valid")),
    }
}

/// Client for the VIES SOAP service. Makes a single attempt per call.
#[derive(Debug, Clone)]
pub struct ViesSoapClient {
    http: reqwest::Client,
    url: String,
}

impl ViesSoapClient {
    /// # Errors
    ///
    /// Returns `VatError::ServiceUnavailable` if the HTTP client cannot be built.
    pub fn new() -> Result<Self, VatError> {
        Self::builder().build()
    }

    pub fn builder() -> ViesSoapClientBuilder {
        ViesSoapClientBuilder::default()
    }
}

#[async_trait]
impl ValidationBackend for ViesSoapClient {
    async fn validate(&self, id: &VatId) -> Result<(), VatError> {
        let envelope = build_envelope(id)?;

        let resp = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .body(envelope)
            .send()
            .await
            .map_err(|e| VatError::unavailable(format!("VIES SOAP request failed: {e}")))?;

        // Faults come back as HTTP 500 with the code in the body, so the
        // status is not checked before classification.
        let body = resp
            .text()
            .await
            .map_err(|e| VatError::unavailable(format!("VIES SOAP read failed: {e}")))?;

        classify_response(&body)
    }
}

/// Options for [`ViesSoapClient`].
#[derive(Debug, Clone)]
pub struct ViesSoapClientBuilder {
    url: String,
    http: Option<reqwest::Client>,
    timeout: Duration,
}

impl Default for ViesSoapClientBuilder {
    fn default() -> Self {
        Self {
            url: SOAP_SERVICE_URL.to_string(),
            http: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ViesSoapClientBuilder {
    /// Full service URL (not a root: the SOAP endpoint has no sub-paths).
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
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
    pub fn build(self) -> Result<ViesSoapClient, VatError> {
        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| VatError::unavailable(format!("HTTP client init failed: {e}")))?,
        };
        Ok(ViesSoapClient {
            http,
            url: self.url,
        })
    }
}
