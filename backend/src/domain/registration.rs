//! Registration payload and the pure split into user and profile shapes.
//!
//! Clients written against the legacy API send Spanish keys, so each field
//! also accepts its legacy alias.

use serde::Deserialize;
use serde_json::{Value, json};

use super::{
    DisplayName, EmailAddress, Error, GenreId, NewArtistProfile, NewUser, Password,
    UserValidationError,
};

/// Raw registration request as received by inbound adapters.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    #[serde(default, alias = "nombreusuario")]
    pub name: Option<String>,
    #[serde(default, alias = "correo")]
    pub email: Option<String>,
    #[serde(default, alias = "contrasenia")]
    pub password: Option<String>,
    #[serde(default, alias = "esartista")]
    pub is_artist: bool,
    #[serde(default, alias = "idgenero")]
    pub genre_id: Option<i64>,
    /// Opaque genre object echoed back for artists; may carry `idgenero`.
    #[serde(default, alias = "genero")]
    pub genre: Option<Value>,
}

/// Reasons a payload cannot be split.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("{field} is invalid: {source}")]
    Invalid {
        field: &'static str,
        #[source]
        source: UserValidationError,
    },
}

impl RegistrationError {
    /// Payload field the error refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } | Self::Invalid { field, .. } => field,
        }
    }

    /// Stable reason code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "missing",
            Self::Invalid { source, .. } => source.code(),
        }
    }
}

impl From<RegistrationError> for Error {
    fn from(value: RegistrationError) -> Self {
        Error::invalid_request(value.to_string())
            .with_details(json!({ "field": value.field(), "code": value.code() }))
    }
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, RegistrationError> {
    value.ok_or(RegistrationError::MissingField { field })
}

fn invalid(field: &'static str) -> impl FnOnce(UserValidationError) -> RegistrationError {
    move |source| RegistrationError::Invalid { field, source }
}

/// Genre reference: the flat id wins, the nested `genre.idgenero` is the
/// fallback.
fn genre_reference(payload: &RegistrationPayload) -> Option<i64> {
    payload.genre_id.or_else(|| {
        payload
            .genre
            .as_ref()
            .and_then(|genre| genre.get("idgenero"))
            .and_then(Value::as_i64)
    })
}

/// Partition `payload` into a user shape and, for artists, a profile shape.
///
/// # Examples
/// ```
/// use user_service::domain::{RegistrationPayload, split_registration};
///
/// let payload = RegistrationPayload {
///     name: Some("Ana".into()),
///     email: Some("a@x.com".into()),
///     password: Some("s3cret".into()),
///     ..RegistrationPayload::default()
/// };
/// let (user, profile) = split_registration(&payload, false).expect("valid payload");
/// assert_eq!(user.email.as_ref(), "a@x.com");
/// assert!(profile.is_none());
/// ```
pub fn split_registration(
    payload: &RegistrationPayload,
    is_artist: bool,
) -> Result<(NewUser, Option<NewArtistProfile>), RegistrationError> {
    let display_name = DisplayName::new(required(payload.name.as_deref(), "name")?)
        .map_err(invalid("name"))?;
    let email =
        EmailAddress::new(required(payload.email.as_deref(), "email")?).map_err(invalid("email"))?;
    let password = Password::new(required(payload.password.as_deref(), "password")?)
        .map_err(invalid("password"))?;

    let profile = if is_artist {
        let genre_id = genre_reference(payload)
            .map(GenreId::new)
            .transpose()
            .map_err(invalid("genreId"))?;
        Some(NewArtistProfile { genre_id })
    } else {
        None
    };

    let user = NewUser {
        display_name,
        email,
        password,
        is_artist,
    };
    Ok((user, profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::{fixture, rstest};

    #[fixture]
    fn listener() -> RegistrationPayload {
        RegistrationPayload {
            name: Some("Ana".into()),
            email: Some("a@x.com".into()),
            password: Some("s3cret".into()),
            ..RegistrationPayload::default()
        }
    }

    #[rstest]
    fn listener_has_no_profile(listener: RegistrationPayload) {
        let (user, profile) = split_registration(&listener, false).expect("split");
        assert!(!user.is_artist);
        assert!(profile.is_none());
    }

    #[rstest]
    fn artist_without_genre_gets_empty_profile(listener: RegistrationPayload) {
        let (user, profile) = split_registration(&listener, true).expect("split");
        assert!(user.is_artist);
        assert_eq!(profile, Some(NewArtistProfile { genre_id: None }));
    }

    #[rstest]
    #[case(Some(7), None, Some(7))]
    #[case(None, Some(json!({ "idgenero": 3, "nombre": "Rock" })), Some(3))]
    #[case(Some(7), Some(json!({ "idgenero": 3 })), Some(7))]
    #[case(None, Some(json!({ "nombre": "Rock" })), None)]
    fn genre_prefers_flat_id_over_nested_object(
        mut listener: RegistrationPayload,
        #[case] genre_id: Option<i64>,
        #[case] genre: Option<Value>,
        #[case] expected: Option<i32>,
    ) {
        listener.genre_id = genre_id;
        listener.genre = genre;
        let (_, profile) = split_registration(&listener, true).expect("split");
        let resolved = profile.and_then(|p| p.genre_id).map(GenreId::get);
        assert_eq!(resolved, expected);
    }

    #[rstest]
    fn genre_is_ignored_for_listeners(mut listener: RegistrationPayload) {
        listener.genre_id = Some(-1);
        let (_, profile) = split_registration(&listener, false).expect("split");
        assert!(profile.is_none());
    }

    #[rstest]
    #[case("name", "missing")]
    #[case("email", "missing")]
    #[case("password", "missing")]
    fn missing_required_fields_are_named(
        mut listener: RegistrationPayload,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        match field {
            "name" => listener.name = None,
            "email" => listener.email = None,
            _ => listener.password = None,
        }
        let err = split_registration(&listener, false).expect_err("missing field");
        assert_eq!(err.field(), field);
        assert_eq!(err.code(), code);
    }

    #[rstest]
    fn invalid_genre_is_rejected_for_artists(mut listener: RegistrationPayload) {
        listener.genre_id = Some(0);
        let err = split_registration(&listener, true).expect_err("bad genre");
        assert_eq!(err.field(), "genreId");
        assert_eq!(err.code(), "out_of_range");
    }

    #[rstest]
    fn converts_into_invalid_request_with_details(mut listener: RegistrationPayload) {
        listener.email = Some("not-an-email".into());
        let err: Error = split_registration(&listener, false)
            .expect_err("bad email")
            .into();
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "email", "code": "invalid_format" }))
        );
    }

    #[rstest]
    fn accepts_legacy_spanish_keys() {
        let payload: RegistrationPayload = serde_json::from_value(json!({
            "nombreusuario": "Ana",
            "correo": "a@x.com",
            "contrasenia": "s3cret",
            "esartista": true,
            "idgenero": 7,
        }))
        .expect("deserialise");
        assert_eq!(payload.name.as_deref(), Some("Ana"));
        assert!(payload.is_artist);
        assert_eq!(payload.genre_id, Some(7));
    }

    #[rstest]
    fn accepts_camel_case_keys() {
        let payload: RegistrationPayload = serde_json::from_value(json!({
            "name": "Ana",
            "email": "a@x.com",
            "password": "s3cret",
            "isArtist": false,
        }))
        .expect("deserialise");
        assert_eq!(payload.email.as_deref(), Some("a@x.com"));
        assert!(!payload.is_artist);
    }
}
