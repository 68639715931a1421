//! Wire DTOs for the Identity Toolkit account endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateAccountRequestDto<'a> {
    pub(super) local_id: String,
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) display_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DeleteAccountRequestDto {
    pub(super) local_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateAccountResponseDto {
    #[serde(default)]
    pub(super) local_id: Option<String>,
}

/// `{"error": {"code": 400, "message": "EMAIL_EXISTS"}}`
#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelopeDto {
    pub(super) error: ErrorBodyDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    pub(super) message: String,
}

impl ErrorEnvelopeDto {
    /// Leading reason token, e.g. `WEAK_PASSWORD` from
    /// `WEAK_PASSWORD : Password should be at least 6 characters`.
    pub(super) fn reason(&self) -> Option<&str> {
        self.error
            .message
            .split([' ', ':'])
            .next()
            .filter(|token| !token.is_empty())
    }
}
