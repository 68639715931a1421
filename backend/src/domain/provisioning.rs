//! Transactional user provisioning across the relational store and the
//! identity provider.
//!
//! The relational transaction stays open while the identity account is
//! created, so a provider failure rolls the rows back. Once the account
//! exists (or may exist after a timeout) a compensating delete is recorded
//! and replayed if the transaction cannot be committed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::compensation::{Compensation, CompensationLog};
use super::error_translation::{Failure, translate};
use super::ports::{
    CreateIdentityRequest, IdentityCredential, IdentityProvider, IdentityProviderError,
    UserProvisioning, UserStore, UserStoreTransaction,
};
use super::{
    ArtistAccount, ArtistProfile, Error, NewArtistProfile, NewUser, ProvisionedUser,
    RegistrationPayload, User, split_registration,
};

/// Operation path stamped on every provisioning error.
pub const USERS_PATH: &str = "/usuarios";

/// Rows written inside the open transaction.
struct Staged {
    user: User,
    profile: Option<ArtistProfile>,
}

impl Staged {
    fn into_provisioned(self, genre: Option<serde_json::Value>) -> ProvisionedUser {
        match self.profile {
            Some(profile) => ProvisionedUser::Artist(ArtistAccount {
                user: self.user,
                profile,
                genre,
            }),
            None => ProvisionedUser::Listener(self.user),
        }
    }
}

/// Provisioning service coordinating both systems of record.
///
/// Store and provider handles are injected at construction; the service
/// holds no other state, so clones share the same adapters.
pub struct UserProvisioningService<S: ?Sized, I: ?Sized> {
    store: Arc<S>,
    identity: Arc<I>,
    identity_timeout: Option<Duration>,
}

impl<S: ?Sized, I: ?Sized> Clone for UserProvisioningService<S, I> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            identity: Arc::clone(&self.identity),
            identity_timeout: self.identity_timeout,
        }
    }
}

impl<S, I> UserProvisioningService<S, I>
where
    S: UserStore + ?Sized,
    I: IdentityProvider + ?Sized,
{
    /// Create a service without a deadline on identity calls.
    pub fn new(store: Arc<S>, identity: Arc<I>) -> Self {
        Self {
            store,
            identity,
            identity_timeout: None,
        }
    }

    /// Bound the identity create call; expiry counts as an unknown outcome.
    #[must_use]
    pub fn with_identity_timeout(mut self, timeout: Duration) -> Self {
        self.identity_timeout = Some(timeout);
        self
    }

    async fn register_identity(
        &self,
        request: &CreateIdentityRequest,
    ) -> Result<IdentityCredential, IdentityProviderError> {
        let call = self.identity.create_user(request);
        match self.identity_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
                Err(IdentityProviderError::timeout(format!(
                    "no response within {} ms",
                    limit.as_millis()
                )))
            }),
            None => call.await,
        }
    }

    async fn stage(
        &self,
        tx: &mut dyn UserStoreTransaction,
        new_user: &NewUser,
        new_profile: Option<NewArtistProfile>,
        compensation: &mut CompensationLog,
    ) -> Result<Staged, Failure> {
        let user = tx.insert_user(new_user).await?;
        let profile = match new_profile {
            Some(profile) => Some(tx.insert_artist_profile(user.id(), &profile).await?),
            None => None,
        };

        let request = CreateIdentityRequest {
            id: user.id(),
            email: user.email().clone(),
            password: new_user.password.clone(),
            display_name: user.display_name().clone(),
        };
        match self.register_identity(&request).await {
            Ok(credential) => {
                compensation.record(Compensation::DeleteIdentity(user.id()));
                debug!(
                    user_id = %user.id(),
                    provider_uid = %credential.provider_uid,
                    "identity registered"
                );
            }
            Err(err) => {
                if err.outcome_unknown() {
                    compensation.record(Compensation::DeleteIdentity(user.id()));
                }
                return Err(err.into());
            }
        }

        Ok(Staged { user, profile })
    }
}

#[async_trait]
impl<S, I> UserProvisioning for UserProvisioningService<S, I>
where
    S: UserStore + ?Sized,
    I: IdentityProvider + ?Sized,
{
    async fn provision(&self, payload: RegistrationPayload) -> Result<ProvisionedUser, Error> {
        let (new_user, new_profile) = split_registration(&payload, payload.is_artist)
            .map_err(|err| Error::from(err).with_path(USERS_PATH))?;

        let mut tx = self
            .store
            .begin()
            .await
            .map_err(|err| translate(err.into(), USERS_PATH))?;

        let mut compensation = CompensationLog::new();
        let staged = self
            .stage(tx.as_mut(), &new_user, new_profile, &mut compensation)
            .await;

        let outcome = match staged {
            Ok(staged) => tx.commit().await.map(|()| staged).map_err(Failure::from),
            Err(failure) => {
                if let Err(err) = tx.rollback().await {
                    warn!(error = %err, "rollback failed; store discards the transaction");
                }
                Err(failure)
            }
        };

        match outcome {
            Ok(staged) => {
                info!(user_id = %staged.user.id(), is_artist = new_user.is_artist, "user provisioned");
                Ok(staged.into_provisioned(payload.genre))
            }
            Err(failure) => {
                compensation.unwind(self.identity.as_ref()).await;
                Err(translate(failure, USERS_PATH))
            }
        }
    }
}
