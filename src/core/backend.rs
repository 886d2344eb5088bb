use async_trait::async_trait;
use std::sync::Arc;

use super::error::VatError;
use super::id::VatId;

/// An external service that confirms a VAT number exists.
///
/// Implementations own their transport and auth, and must classify every
/// failure into [`VatError`] before returning: `InvalidFormat` for a
/// backend-side shape rejection, `NotFound` for an unregistered number,
/// and `ServiceUnavailable` for everything else.
#[async_trait]
pub trait ValidationBackend: Send + Sync {
    /// Check that `id` is registered. `Ok(())` means it is.
    async fn validate(&self, id: &VatId) -> Result<(), VatError>;
}

#[async_trait]
impl<T: ValidationBackend + ?Sized> ValidationBackend for Arc<T> {
    async fn validate(&self, id: &VatId) -> Result<(), VatError> {
        (**self).validate(id).await
    }
}

#[async_trait]
impl<T: ValidationBackend + ?Sized> ValidationBackend for Box<T> {
    async fn validate(&self, id: &VatId) -> Result<(), VatError> {
        (**self).validate(id).await
    }
}
