//! Recording [`IdentityProvider`] double.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::UserId;
use crate::domain::ports::{
    CreateIdentityRequest, IdentityCredential, IdentityProvider, IdentityProviderError,
};

use super::lock;

#[derive(Debug, Default)]
struct IdentityState {
    /// Live accounts keyed by provider uid, holding the account email.
    accounts: BTreeMap<String, String>,
    creates: Vec<UserId>,
    deletes: Vec<UserId>,
    create_failure: Option<IdentityProviderError>,
    delete_failure: Option<IdentityProviderError>,
    create_delay: Option<Duration>,
}

/// Identity double that records calls and keeps accounts in memory.
///
/// A configured create delay elapses *after* the account is stored, which
/// models a provider that committed the account but answered too late.
#[derive(Debug, Clone, Default)]
pub struct RecordingIdentityProvider {
    state: Arc<Mutex<IdentityState>>,
}

impl RecordingIdentityProvider {
    /// Provider with no accounts and no failures armed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next create fail without storing an account.
    pub fn fail_create(&self, error: IdentityProviderError) {
        lock(&self.state).create_failure = Some(error);
    }

    /// Make every delete fail.
    pub fn fail_delete(&self, error: IdentityProviderError) {
        lock(&self.state).delete_failure = Some(error);
    }

    /// Hold each create response for `delay` after storing the account.
    pub fn delay_create(&self, delay: Duration) {
        lock(&self.state).create_delay = Some(delay);
    }

    /// Ids passed to `create_user`, in call order.
    #[must_use]
    pub fn created_ids(&self) -> Vec<UserId> {
        lock(&self.state).creates.clone()
    }

    /// Ids passed to `delete_user`, in call order.
    #[must_use]
    pub fn deleted_ids(&self) -> Vec<UserId> {
        lock(&self.state).deletes.clone()
    }

    /// Whether an account exists for `id`.
    #[must_use]
    pub fn has_account(&self, id: UserId) -> bool {
        lock(&self.state)
            .accounts
            .contains_key(&id.as_external_id())
    }

    /// Number of live accounts.
    #[must_use]
    pub fn account_count(&self) -> usize {
        lock(&self.state).accounts.len()
    }
}

#[async_trait]
impl IdentityProvider for RecordingIdentityProvider {
    async fn create_user(
        &self,
        request: &CreateIdentityRequest,
    ) -> Result<IdentityCredential, IdentityProviderError> {
        let uid = request.id.as_external_id();
        let delay = {
            let mut state = lock(&self.state);
            state.creates.push(request.id);
            if let Some(err) = state.create_failure.take() {
                return Err(err);
            }
            if state.accounts.contains_key(&uid) {
                return Err(IdentityProviderError::already_exists("DUPLICATE_LOCAL_ID"));
            }
            let email = request.email.as_ref();
            if state.accounts.values().any(|existing| existing == email) {
                return Err(IdentityProviderError::already_exists("EMAIL_EXISTS"));
            }
            state.accounts.insert(uid.clone(), email.to_owned());
            state.create_delay
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        Ok(IdentityCredential {
            id: request.id,
            provider_uid: uid,
        })
    }

    async fn delete_user(&self, id: UserId) -> Result<(), IdentityProviderError> {
        let mut state = lock(&self.state);
        state.deletes.push(id);
        if let Some(err) = state.delete_failure.clone() {
            return Err(err);
        }
        state.accounts.remove(&id.as_external_id());
        Ok(())
    }
}
