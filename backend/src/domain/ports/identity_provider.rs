//! Driven port for the external credential store.
//!
//! Accounts are keyed by the relational user id rendered as a decimal
//! string, so creating and deleting an identity needs no lookup table.

use async_trait::async_trait;

use crate::domain::{DisplayName, EmailAddress, Password, UserId};

use super::define_port_error;

/// Account creation request sent to the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIdentityRequest {
    pub id: UserId,
    pub email: EmailAddress,
    pub password: Password,
    pub display_name: DisplayName,
}

/// Credential record returned once the provider accepted an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityCredential {
    pub id: UserId,
    /// Account key as the provider reports it.
    pub provider_uid: String,
}

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// An account already uses the id or the email.
        AlreadyExists { message: String } => "identity already exists: {message}",
        /// The provider rejected a field (malformed email, weak password).
        InvalidArgument { message: String } => "identity provider rejected input: {message}",
        /// No account exists for the requested id.
        NotFound { message: String } => "identity not found: {message}",
        /// The call did not complete in time.
        Timeout { message: String } => "identity provider timed out: {message}",
        /// The provider answered with a server-side failure.
        Unavailable { message: String } => "identity provider unavailable: {message}",
        /// The request could not be delivered or the reply was unreadable.
        Transport { message: String } => "identity provider transport failed: {message}",
    }
}

impl IdentityProviderError {
    /// Whether the provider may have created the account despite the error.
    ///
    /// Callers treat such failures as if the account exists and schedule its
    /// removal.
    #[must_use]
    pub fn outcome_unknown(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Unavailable { .. } | Self::Transport { .. }
        )
    }
}

/// Port for managing credential accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account whose key is `request.id` in decimal form.
    async fn create_user(
        &self,
        request: &CreateIdentityRequest,
    ) -> Result<IdentityCredential, IdentityProviderError>;

    /// Delete the account keyed by `id`.
    async fn delete_user(&self, id: UserId) -> Result<(), IdentityProviderError>;
}
