//! PostgreSQL-backed `UserStore` using Diesel.
//!
//! Each unit of work owns a pooled connection for its whole lifetime and
//! drives the transaction explicitly through `AnsiTransactionManager`. A
//! handle dropped mid-transaction leaves its connection in a transaction,
//! which the pool treats as broken and discards, so nothing is committed.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::{AnsiTransactionManager, AsyncPgConnection, RunQueryDsl, TransactionManager};
use tracing::debug;

use crate::domain::ports::{UserStore, UserStoreError, UserStoreTransaction};
use crate::domain::{
    ArtistProfile, DisplayName, EmailAddress, GenreId, NewArtistProfile, NewUser, User, UserId,
    UserValidationError,
};

use super::models::{ArtistProfileRow, NewArtistProfileRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{artist_profiles, users};

/// Diesel implementation of the [`UserStore`] port.
#[derive(Clone)]
pub struct DieselUserStore {
    pool: DbPool,
}

impl DieselUserStore {
    /// Store drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserStoreError {
    UserStoreError::connection(error.into_message())
}

/// Natural key named by a unique constraint, e.g. `users_email_key` → `email`.
fn unique_field(constraint: Option<&str>) -> String {
    constraint
        .and_then(|name| name.split_once('_').map(|(_, rest)| rest))
        .and_then(|rest| rest.strip_suffix("_key"))
        .filter(|field| !field.is_empty())
        .unwrap_or("record")
        .to_owned()
}

fn map_diesel_error(error: DieselError) -> UserStoreError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            UserStoreError::unique_violation(unique_field(info.constraint_name()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserStoreError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            UserStoreError::query("foreign key violation")
        }
        DieselError::NotFound => UserStoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserStoreError::query("database query error"),
        _ => UserStoreError::query("database error"),
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserStoreError> {
    let corrupt = |err: UserValidationError| {
        UserStoreError::query(format!("stored user {} is invalid: {err}", row.id))
    };
    let id = UserId::new(row.id).map_err(corrupt)?;
    let display_name = DisplayName::new(row.display_name.as_str()).map_err(corrupt)?;
    let email = EmailAddress::new(row.email.as_str()).map_err(corrupt)?;
    Ok(User::new(id, display_name, email, row.is_artist))
}

fn row_to_profile(row: ArtistProfileRow) -> Result<ArtistProfile, UserStoreError> {
    let user_id = UserId::new(row.user_id)
        .map_err(|err| UserStoreError::query(format!("stored profile owner is invalid: {err}")))?;
    let genre_id = row
        .genre_id
        .map(|raw| GenreId::new(i64::from(raw)))
        .transpose()
        .map_err(|err| UserStoreError::query(format!("stored genre is invalid: {err}")))?;
    Ok(ArtistProfile { user_id, genre_id })
}

#[async_trait]
impl UserStore for DieselUserStore {
    async fn begin(&self) -> Result<Box<dyn UserStoreTransaction>, UserStoreError> {
        let mut conn = self.pool.get_owned().await.map_err(map_pool_error)?;
        AnsiTransactionManager::begin_transaction(&mut *conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Box::new(DieselUserStoreTransaction { conn }))
    }
}

/// Open transaction on an owned pooled connection.
struct DieselUserStoreTransaction {
    conn: PooledConnection<'static, AsyncPgConnection>,
}

#[async_trait]
impl UserStoreTransaction for DieselUserStoreTransaction {
    async fn insert_user(&mut self, user: &NewUser) -> Result<User, UserStoreError> {
        let new_row = NewUserRow {
            display_name: user.display_name.as_ref(),
            email: user.email.as_ref(),
            is_artist: user.is_artist,
        };

        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut *self.conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(row)
    }

    async fn insert_artist_profile(
        &mut self,
        owner: UserId,
        profile: &NewArtistProfile,
    ) -> Result<ArtistProfile, UserStoreError> {
        let new_row = NewArtistProfileRow {
            user_id: owner.get(),
            genre_id: profile.genre_id.map(GenreId::get),
        };

        let row: ArtistProfileRow = diesel::insert_into(artist_profiles::table)
            .values(&new_row)
            .returning(ArtistProfileRow::as_returning())
            .get_result(&mut *self.conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_profile(row)
    }

    async fn commit(mut self: Box<Self>) -> Result<(), UserStoreError> {
        AnsiTransactionManager::commit_transaction(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn rollback(mut self: Box<Self>) -> Result<(), UserStoreError> {
        AnsiTransactionManager::rollback_transaction(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }
}
