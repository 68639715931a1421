//! Driving port for account registration.
//!
//! Inbound adapters depend on this trait rather than the concrete service so
//! handler tests can substitute a double without wiring either store.

use async_trait::async_trait;

use crate::domain::{Error, ProvisionedUser, RegistrationPayload};

/// Domain use-case port for creating user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProvisioning: Send + Sync {
    /// Create the account in every system of record or in none of them.
    async fn provision(&self, payload: RegistrationPayload) -> Result<ProvisionedUser, Error>;
}
