//! Driven port for the relational system of record.
//!
//! The store exposes an explicit unit of work instead of a closure-taking
//! `run_in_transaction`: callers [`UserStore::begin`] a transaction, issue
//! inserts through the returned handle, then either commit or roll back.
//! Dropping a handle without committing must never persist its writes.

use async_trait::async_trait;

use crate::domain::{ArtistProfile, NewArtistProfile, NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user store adapters.
    pub enum UserStoreError {
        /// Store connection could not be established or was lost.
        Connection { message: String } => "user store connection failed: {message}",
        /// A uniqueness constraint rejected the write; `field` names the
        /// natural key involved (for example `email`).
        UniqueViolation { field: String } => "user store uniqueness violation on {field}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user store query failed: {message}",
    }
}

/// Transaction-scoped handle returned by [`UserStore::begin`].
#[async_trait]
pub trait UserStoreTransaction: Send {
    /// Insert a user row and return it with its assigned key.
    async fn insert_user(&mut self, user: &NewUser) -> Result<User, UserStoreError>;

    /// Insert the artist profile owned by `owner`.
    async fn insert_artist_profile(
        &mut self,
        owner: UserId,
        profile: &NewArtistProfile,
    ) -> Result<ArtistProfile, UserStoreError>;

    /// Make every write issued through this handle durable.
    async fn commit(self: Box<Self>) -> Result<(), UserStoreError>;

    /// Discard every write issued through this handle.
    async fn rollback(self: Box<Self>) -> Result<(), UserStoreError>;
}

/// Port for opening relational units of work.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Open a transaction scope.
    async fn begin(&self) -> Result<Box<dyn UserStoreTransaction>, UserStoreError>;
}
