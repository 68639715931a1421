//! Domain primitives, ports and the provisioning use-case.
//!
//! Purpose: keep account registration independent of transport and storage.
//! Adapters in `inbound` and `outbound` depend on this module; it depends on
//! neither.
//!
//! Public surface:
//! - Error / ErrorCode: caller-facing failure payload and its taxonomy.
//! - User, ArtistProfile, ProvisionedUser: the data model.
//! - RegistrationPayload and `split_registration`: input shape and its
//!   partition into user and profile records.
//! - UserProvisioningService: the saga across both systems of record.

pub mod compensation;
pub mod error;
pub mod error_translation;
pub mod ports;
pub mod provisioning;
pub mod registration;
pub mod trace_id;
pub mod user;

pub use self::compensation::{Compensation, CompensationLog};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::error_translation::{Failure, translate};
pub use self::provisioning::{USERS_PATH, UserProvisioningService};
pub use self::registration::{RegistrationError, RegistrationPayload, split_registration};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    ArtistAccount, ArtistProfile, DisplayName, EmailAddress, GenreId, NewArtistProfile, NewUser,
    Password, ProvisionedUser, User, UserId, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use user_service::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::conflict("email already in use"))
/// }
/// # assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
