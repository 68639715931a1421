//! User and artist profile data model.
//!
//! Identifiers are assigned by the relational store and reused verbatim as
//! the identity provider's account id, so no mapping table exists between the
//! two systems of record.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use zeroize::Zeroizing;

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 64;
/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 255;

/// Validation errors raised by the user value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must be a positive integer")]
    InvalidId,
    #[error("display name must not be empty")]
    EmptyDisplayName,
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong { max: usize },
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
    #[error("email must look like local@domain")]
    InvalidEmail,
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("genre id must be a positive integer")]
    InvalidGenreId,
}

impl UserValidationError {
    /// Stable reason code used in error details.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::EmptyDisplayName | Self::EmptyEmail | Self::EmptyPassword => "empty",
            Self::DisplayNameTooLong { .. } | Self::EmailTooLong { .. } => "too_long",
            Self::InvalidEmail => "invalid_format",
            Self::InvalidGenreId => "out_of_range",
        }
    }
}

/// Store-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Validate and wrap a store key.
    pub fn new(raw: i64) -> Result<Self, UserValidationError> {
        if raw <= 0 {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(raw))
    }

    /// Raw key as stored.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Decimal form used as the external account identifier.
    #[must_use]
    pub fn as_external_id(self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a display name; surrounding whitespace is trimmed.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Contact address, normalised to lowercase.
///
/// # Examples
/// ```
/// use user_service::domain::EmailAddress;
///
/// let email = EmailAddress::new(" Ana@X.com ").expect("valid email");
/// assert_eq!(email.as_ref(), "ana@x.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an email address.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        let well_formed = !local.is_empty()
            && !domain.is_empty()
            && !domain.contains('@')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !trimmed.chars().any(char::is_whitespace);
        if !well_formed {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Credential secret forwarded to the identity provider and never persisted.
///
/// The buffer is wiped on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Wrap a non-empty secret. The value is taken as-is; strength rules
    /// belong to the identity provider.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = Zeroizing::new(raw.into());
        if raw.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self(raw))
    }

    /// Expose the secret for forwarding to the credential provider.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Catalogue genre reference; resolved lazily by readers, never on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenreId(i32);

impl GenreId {
    /// Validate and wrap a genre identifier.
    pub fn new(raw: i64) -> Result<Self, UserValidationError> {
        i32::try_from(raw)
            .ok()
            .filter(|value| *value > 0)
            .map(Self)
            .ok_or(UserValidationError::InvalidGenreId)
    }

    /// Raw identifier.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

/// User record shape before the store assigns a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub display_name: DisplayName,
    pub email: EmailAddress,
    pub password: Password,
    pub is_artist: bool,
}

/// Persisted user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    #[serde(rename = "name")]
    display_name: DisplayName,
    email: EmailAddress,
    is_artist: bool,
}

impl User {
    /// Assemble a persisted user from its parts.
    #[must_use]
    pub fn new(id: UserId, display_name: DisplayName, email: EmailAddress, is_artist: bool) -> Self {
        Self {
            id,
            display_name,
            email,
            is_artist,
        }
    }

    /// Store-assigned key.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Contact address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Role flag.
    #[must_use]
    pub fn is_artist(&self) -> bool {
        self.is_artist
    }
}

/// Artist profile shape before it is bound to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NewArtistProfile {
    pub genre_id: Option<GenreId>,
}

/// Persisted artist profile, owned 1:1 by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistProfile {
    #[serde(skip)]
    pub user_id: UserId,
    pub genre_id: Option<GenreId>,
}

/// Combined result of a successful artist provisioning.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistAccount {
    #[serde(flatten)]
    pub user: User,
    #[serde(flatten)]
    pub profile: ArtistProfile,
    /// Genre placeholder echoed from the request; `null` when absent.
    pub genre: Option<Value>,
}

/// Outcome of a successful provisioning call.
///
/// Listeners serialise as plain user fields; artists add the profile fields
/// and an always-present `genre` key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProvisionedUser {
    Listener(User),
    Artist(ArtistAccount),
}

impl ProvisionedUser {
    /// The user record regardless of role.
    #[must_use]
    pub fn user(&self) -> &User {
        match self {
            Self::Listener(user) => user,
            Self::Artist(account) => &account.user,
        }
    }

    /// The artist profile, if one was created.
    #[must_use]
    pub fn profile(&self) -> Option<&ArtistProfile> {
        match self {
            Self::Listener(_) => None,
            Self::Artist(account) => Some(&account.profile),
        }
    }
}
