//! Reqwest-backed Identity Toolkit adapter.
//!
//! Owns transport concerns only: URL construction, bearer authentication,
//! request timeout and mapping provider error reasons onto
//! [`IdentityProviderError`] tags. Reason strings are interpreted here and
//! nowhere else.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::dto::{
    CreateAccountRequestDto, CreateAccountResponseDto, DeleteAccountRequestDto, ErrorEnvelopeDto,
};
use crate::domain::UserId;
use crate::domain::ports::{
    CreateIdentityRequest, IdentityCredential, IdentityProvider, IdentityProviderError,
};

/// Connection settings for the Identity Toolkit admin API.
pub struct IdentityToolkitConfig {
    pub endpoint: Url,
    pub project_id: String,
    /// OAuth bearer token; omitted when talking to an emulator.
    pub access_token: Option<Zeroizing<String>>,
    pub timeout: Duration,
}

/// Errors raised while constructing the adapter.
#[derive(Debug, thiserror::Error)]
pub enum IdentityToolkitBuildError {
    #[error("identity project id must be a non-empty path segment")]
    InvalidProject,
    #[error("invalid identity endpoint: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to build identity HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Identity provider adapter speaking the Identity Toolkit REST surface.
pub struct IdentityToolkitProvider {
    client: Client,
    accounts_url: Url,
    delete_url: Url,
    access_token: Option<Zeroizing<String>>,
}

impl IdentityToolkitProvider {
    /// Build an adapter with a request timeout applied to every call.
    ///
    /// # Errors
    ///
    /// Returns an error when the project id is unusable, the endpoint cannot
    /// be joined, or the reqwest client cannot be constructed.
    pub fn new(config: IdentityToolkitConfig) -> Result<Self, IdentityToolkitBuildError> {
        let project = config.project_id.trim();
        if project.is_empty() || project.contains('/') {
            return Err(IdentityToolkitBuildError::InvalidProject);
        }
        let accounts_url = config
            .endpoint
            .join(&format!("v1/projects/{project}/accounts"))?;
        let delete_url = config
            .endpoint
            .join(&format!("v1/projects/{project}/accounts:delete"))?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            accounts_url,
            delete_url,
            access_token: config.access_token,
        })
    }

    fn post(&self, url: &Url) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .post(url.clone())
            .header(reqwest::header::ACCEPT, "application/json");
        match &self.access_token {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitProvider {
    async fn create_user(
        &self,
        request: &CreateIdentityRequest,
    ) -> Result<IdentityCredential, IdentityProviderError> {
        let body = CreateAccountRequestDto {
            local_id: request.id.as_external_id(),
            email: request.email.as_ref(),
            password: request.password.expose(),
            display_name: request.display_name.as_ref(),
        };
        let response = self
            .post(&self.accounts_url)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }

        let provider_uid = parse_local_id(bytes.as_ref()).unwrap_or_else(|| body.local_id.clone());
        info!(user_id = %request.id, "identity account created");
        Ok(IdentityCredential {
            id: request.id,
            provider_uid,
        })
    }

    async fn delete_user(&self, id: UserId) -> Result<(), IdentityProviderError> {
        let body = DeleteAccountRequestDto {
            local_id: id.as_external_id(),
        };
        let response = self
            .post(&self.delete_url)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if status.is_success() {
            info!(user_id = %id, "identity account deleted");
            return Ok(());
        }
        match map_status_error(status, bytes.as_ref()) {
            IdentityProviderError::NotFound { .. } => {
                debug!(user_id = %id, "identity account already absent");
                Ok(())
            }
            err => Err(err),
        }
    }
}

fn parse_local_id(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<CreateAccountResponseDto>(body)
        .ok()
        .and_then(|dto| dto.local_id)
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    if error.is_timeout() {
        IdentityProviderError::timeout(error.to_string())
    } else {
        IdentityProviderError::transport(error.to_string())
    }
}

fn map_reason(reason: &str, message: String) -> Option<IdentityProviderError> {
    match reason {
        "DUPLICATE_LOCAL_ID" | "EMAIL_EXISTS" | "DUPLICATE_EMAIL" => {
            Some(IdentityProviderError::already_exists(message))
        }
        "USER_NOT_FOUND" => Some(IdentityProviderError::not_found(message)),
        "WEAK_PASSWORD" | "MISSING_PASSWORD" | "MISSING_EMAIL" | "MISSING_LOCAL_ID" => {
            Some(IdentityProviderError::invalid_argument(message))
        }
        other if other.starts_with("INVALID_") => {
            Some(IdentityProviderError::invalid_argument(message))
        }
        _ => None,
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    let envelope = serde_json::from_slice::<ErrorEnvelopeDto>(body).ok();
    let detail = envelope
        .as_ref()
        .map(|envelope| envelope.error.message.clone())
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| body_preview(body));
    let message = if detail.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {detail}", status.as_u16())
    };

    if let Some(mapped) = envelope
        .as_ref()
        .and_then(ErrorEnvelopeDto::reason)
        .and_then(|reason| map_reason(reason, message.clone()))
    {
        return mapped;
    }

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            IdentityProviderError::timeout(message)
        }
        StatusCode::NOT_FOUND => IdentityProviderError::not_found(message),
        _ if status.is_server_error() => IdentityProviderError::unavailable(message),
        _ => IdentityProviderError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
