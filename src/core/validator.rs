use std::fmt;
use std::sync::Arc;

use super::backend::ValidationBackend;
use super::error::VatError;
use super::id::VatId;

/// Which backend slot a VAT number is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// EU VIES, the default for every country without a dedicated route.
    Vies,
    /// HMRC lookup for `GB` numbers.
    UkVat,
    /// Australian Business Register lookup for `AU` numbers.
    Abn,
}

impl Route {
    /// Route for an (uppercase) country code.
    pub fn for_country(country_code: &str) -> Self {
        match country_code {
            "GB" => Self::UkVat,
            "AU" => Self::Abn,
            _ => Self::Vies,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vies => write!(f, "vies"),
            Self::UkVat => write!(f, "ukvat"),
            Self::Abn => write!(f, "abn"),
        }
    }
}

type SharedBackend = Arc<dyn ValidationBackend>;

/// Validates VAT numbers by format, and by existence where a backend is
/// configured for the number's route.
///
/// A route without a backend only gets the format check. The validator is
/// immutable after [`ValidatorBuilder::build`] and can be shared freely.
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use vatid::core::Validator;
///
/// let validator = Validator::new();
/// assert!(validator.validate("NL822010690B01").await.is_ok());
/// # }
/// ```
#[derive(Clone, Default)]
pub struct Validator {
    vies: Option<SharedBackend>,
    uk_vat: Option<SharedBackend>,
    abn: Option<SharedBackend>,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("vies", &self.vies.is_some())
            .field("uk_vat", &self.uk_vat.is_some())
            .field("abn", &self.abn.is_some())
            .finish()
    }
}

impl Validator {
    /// A format-only validator with no backends.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::default()
    }

    /// The route a parsed number is dispatched to.
    pub fn route_for(&self, id: &VatId) -> Route {
        Route::for_country(id.country_code())
    }

    fn backend(&self, route: Route) -> Option<&SharedBackend> {
        match route {
            Route::Vies => self.vies.as_ref(),
            Route::UkVat => self.uk_vat.as_ref(),
            Route::Abn => self.abn.as_ref(),
        }
    }

    /// Parse `raw` and check it against the backend for its route.
    ///
    /// # Errors
    ///
    /// Parse errors are returned before any backend is called. Backend
    /// errors are returned unchanged.
    pub async fn validate(&self, raw: &str) -> Result<(), VatError> {
        let id = VatId::parse(raw)?;
        self.validate_id(&id).await
    }

    /// Check an already parsed number against the backend for its route.
    ///
    /// # Errors
    ///
    /// Returns the backend's error unchanged.
    pub async fn validate_id(&self, id: &VatId) -> Result<(), VatError> {
        let route = self.route_for(id);
        let Some(backend) = self.backend(route) else {
            tracing::debug!(%id, %route, "no backend configured, skipping existence check");
            return Ok(());
        };

        tracing::debug!(%id, %route, "dispatching to validation backend");
        backend.validate(id).await
    }
}

/// Builder for [`Validator`]. Every backend is optional.
#[derive(Default)]
pub struct ValidatorBuilder {
    vies: Option<SharedBackend>,
    uk_vat: Option<SharedBackend>,
    abn: Option<SharedBackend>,
}

impl ValidatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend for the default route (every country except GB and AU).
    pub fn vies(mut self, backend: impl ValidationBackend + 'static) -> Self {
        self.vies = Some(Arc::new(backend));
        self
    }

    /// Backend for `GB` numbers.
    pub fn uk_vat(mut self, backend: impl ValidationBackend + 'static) -> Self {
        self.uk_vat = Some(Arc::new(backend));
        self
    }

    /// Backend for `AU` numbers.
    pub fn abn(mut self, backend: impl ValidationBackend + 'static) -> Self {
        self.abn = Some(Arc::new(backend));
        self
    }

    pub fn build(self) -> Validator {
        Validator {
            vies: self.vies,
            uk_vat: self.uk_vat,
            abn: self.abn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Backend returning a canned result and recording what it was asked.
    struct Canned {
        result: Result<(), VatError>,
        seen: Mutex<Vec<String>>,
    }

    impl Canned {
        fn new(result: Result<(), VatError>) -> Arc<Self> {
            Arc::new(Self {
                result,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ValidationBackend for Canned {
        async fn validate(&self, id: &VatId) -> Result<(), VatError> {
            self.seen.lock().unwrap().push(id.to_string());
            self.result.clone()
        }
    }

    #[test]
    fn routes_by_country() {
        assert_eq!(Route::for_country("GB"), Route::UkVat);
        assert_eq!(Route::for_country("AU"), Route::Abn);
        assert_eq!(Route::for_country("XI"), Route::Vies);
        assert_eq!(Route::for_country("DE"), Route::Vies);
    }

    #[tokio::test]
    async fn no_backends_is_format_only() {
        let validator = Validator::new();
        assert_eq!(validator.validate("NL822010690B01").await, Ok(()));
        assert_eq!(validator.validate("GB123456789").await, Ok(()));
        assert_eq!(validator.validate("AU51824753556").await, Ok(()));
    }

    #[tokio::test]
    async fn parse_errors_never_reach_backend() {
        let vies = Canned::new(Ok(()));
        let validator = Validator::builder().vies(vies.clone()).build();

        assert_eq!(validator.validate("NL").await, Err(VatError::InvalidFormat));
        assert_eq!(
            validator.validate("AR822010690B05").await,
            Err(VatError::InvalidCountryCode)
        );
        assert!(vies.seen().is_empty());
    }

    #[tokio::test]
    async fn default_route_passes_outcome_through() {
        let vies = Canned::new(Err(VatError::NotFound));
        let validator = Validator::builder().vies(vies.clone()).build();

        assert_eq!(
            validator.validate("nl822010690b01").await,
            Err(VatError::NotFound)
        );
        assert_eq!(vies.seen(), vec!["NL822010690B01".to_string()]);
    }

    #[tokio::test]
    async fn dedicated_routes_do_not_fall_back_to_vies() {
        let vies = Canned::new(Err(VatError::NotFound));
        let validator = Validator::builder().vies(vies.clone()).build();

        assert_eq!(validator.validate("GB123456789").await, Ok(()));
        assert_eq!(validator.validate("AU51824753556").await, Ok(()));
        assert!(vies.seen().is_empty());
    }

    #[tokio::test]
    async fn each_route_uses_its_backend() {
        let vies = Canned::new(Ok(()));
        let uk = Canned::new(Err(VatError::unavailable("down")));
        let abn = Canned::new(Err(VatError::InvalidFormat));
        let validator = Validator::builder()
            .vies(vies.clone())
            .uk_vat(uk.clone())
            .abn(abn.clone())
            .build();

        assert_eq!(validator.validate("DE123456789").await, Ok(()));
        assert!(
            validator
                .validate("GB123456789")
                .await
                .unwrap_err()
                .is_service_unavailable()
        );
        assert_eq!(
            validator.validate("AU51824753556").await,
            Err(VatError::InvalidFormat)
        );

        assert_eq!(vies.seen(), vec!["DE123456789".to_string()]);
        assert_eq!(uk.seen(), vec!["GB123456789".to_string()]);
        assert_eq!(abn.seen(), vec!["AU51824753556".to_string()]);
    }

    #[test]
    fn debug_shows_configured_slots() {
        let validator = Validator::builder().vies(Canned::new(Ok(()))).build();
        let dbg = format!("{validator:?}");
        assert!(dbg.contains("vies: true"));
        assert!(dbg.contains("abn: false"));
    }
}
