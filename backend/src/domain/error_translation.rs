//! Normalise heterogeneous provisioning failures into [`Error`].
//!
//! Matching is on the port error tags only. Store and provider text is
//! logged here and never copied into the caller-facing message.

use tracing::{error, warn};

use super::Error;
use super::ports::{IdentityProviderError, UserStoreError};

/// Any failure the provisioning flow can observe.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// Already translated; returned unchanged.
    Domain(Error),
    /// Raised by the relational store.
    Store(UserStoreError),
    /// Raised by the identity provider.
    Identity(IdentityProviderError),
}

impl From<Error> for Failure {
    fn from(value: Error) -> Self {
        Self::Domain(value)
    }
}

impl From<UserStoreError> for Failure {
    fn from(value: UserStoreError) -> Self {
        Self::Store(value)
    }
}

impl From<IdentityProviderError> for Failure {
    fn from(value: IdentityProviderError) -> Self {
        Self::Identity(value)
    }
}

/// Map `failure` to the caller-facing taxonomy, stamping `path` on the result.
///
/// Domain errors pass through untouched apart from a default path.
///
/// # Examples
/// ```
/// use user_service::domain::ErrorCode;
/// use user_service::domain::error_translation::{Failure, translate};
/// use user_service::domain::ports::UserStoreError;
///
/// let err = translate(Failure::Store(UserStoreError::unique_violation("email")), "/usuarios");
/// assert_eq!(err.code(), ErrorCode::Conflict);
/// assert_eq!(err.path(), Some("/usuarios"));
/// ```
pub fn translate(failure: Failure, path: &str) -> Error {
    match failure {
        Failure::Domain(err) => err.with_default_path(path),
        Failure::Store(UserStoreError::UniqueViolation { field }) => {
            warn!(%field, path, "user store rejected duplicate value");
            Error::conflict(format!("{field} already in use")).with_path(path)
        }
        Failure::Identity(IdentityProviderError::AlreadyExists { message }) => {
            warn!(error = %message, path, "identity provider reported duplicate account");
            Error::conflict("account already exists").with_path(path)
        }
        Failure::Store(err) => {
            error!(error = %err, path, "user store failure");
            Error::internal("failed to create user").with_path(path)
        }
        Failure::Identity(err) => {
            error!(error = %err, path, "identity provider failure");
            Error::internal("failed to register credentials").with_path(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    const PATH: &str = "/usuarios";

    #[rstest]
    #[case(Failure::Store(UserStoreError::unique_violation("email")), ErrorCode::Conflict)]
    #[case(Failure::Identity(IdentityProviderError::already_exists("EMAIL_EXISTS")), ErrorCode::Conflict)]
    #[case(Failure::Store(UserStoreError::connection("refused")), ErrorCode::InternalError)]
    #[case(Failure::Store(UserStoreError::query("syntax")), ErrorCode::InternalError)]
    #[case(Failure::Identity(IdentityProviderError::transport("reset")), ErrorCode::InternalError)]
    #[case(Failure::Identity(IdentityProviderError::invalid_argument("WEAK_PASSWORD")), ErrorCode::InternalError)]
    #[case(Failure::Identity(IdentityProviderError::timeout("deadline")), ErrorCode::InternalError)]
    fn tags_decide_the_category(#[case] failure: Failure, #[case] expected: ErrorCode) {
        let err = translate(failure, PATH);
        assert_eq!(err.code(), expected);
        assert_eq!(err.path(), Some(PATH));
    }

    #[rstest]
    fn duplicates_report_conflict_status() {
        let store = translate(UserStoreError::unique_violation("email").into(), PATH);
        let identity = translate(IdentityProviderError::already_exists("id").into(), PATH);
        assert_eq!(store.status_equivalent(), 409);
        assert_eq!(identity.status_equivalent(), 409);
    }

    #[rstest]
    fn domain_errors_pass_through_unchanged() {
        let original = Error::not_found("genre missing").with_path("/generos");
        let translated = translate(Failure::Domain(original.clone()), PATH);
        assert_eq!(translated, original);
    }

    #[rstest]
    fn domain_errors_without_path_receive_one() {
        let translated = translate(Error::invalid_request("email is required").into(), PATH);
        assert_eq!(translated.code(), ErrorCode::InvalidRequest);
        assert_eq!(translated.path(), Some(PATH));
    }

    #[rstest]
    fn internal_messages_do_not_leak_adapter_text() {
        let err = translate(UserStoreError::query("relation users missing").into(), PATH);
        assert!(!err.message().contains("relation"));
    }
}
