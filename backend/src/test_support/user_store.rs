//! In-memory [`UserStore`] with transactional staging and failure injection.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::ports::{UserStore, UserStoreError, UserStoreTransaction};
use crate::domain::{ArtistProfile, NewArtistProfile, NewUser, User, UserId};

use super::lock;

#[derive(Debug, Default)]
struct StoreState {
    users: Vec<User>,
    profiles: Vec<ArtistProfile>,
    /// Last assigned key; like a database sequence it survives rollback.
    sequence: i64,
    begin_failure: Option<UserStoreError>,
    profile_failure: Option<UserStoreError>,
    commit_failure: Option<UserStoreError>,
    commits: usize,
    rollbacks: usize,
}

/// Store double holding committed rows in memory.
///
/// Writes are staged per transaction and only become visible on commit;
/// dropping a transaction discards them. Email uniqueness is checked against
/// committed rows on insert and again on commit, so the later of two
/// overlapping transactions staging the same email fails to commit.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryUserStore {
    /// Empty store with no failures armed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a committed user directly, bypassing transactions.
    pub fn seed_user(&self, user: &NewUser) -> User {
        let mut state = lock(&self.state);
        state.sequence += 1;
        let stored = to_user(state.sequence, user);
        state.users.push(stored.clone());
        stored
    }

    /// Make the next `begin` fail.
    pub fn fail_begin(&self, error: UserStoreError) {
        lock(&self.state).begin_failure = Some(error);
    }

    /// Make the next artist profile insert fail.
    pub fn fail_profile_insert(&self, error: UserStoreError) {
        lock(&self.state).profile_failure = Some(error);
    }

    /// Make the next commit fail; staged rows are discarded.
    pub fn fail_commit(&self, error: UserStoreError) {
        lock(&self.state).commit_failure = Some(error);
    }

    /// Committed users in insertion order.
    #[must_use]
    pub fn users(&self) -> Vec<User> {
        lock(&self.state).users.clone()
    }

    /// Committed artist profiles in insertion order.
    #[must_use]
    pub fn profiles(&self) -> Vec<ArtistProfile> {
        lock(&self.state).profiles.clone()
    }

    /// Number of successful commits.
    #[must_use]
    pub fn commits(&self) -> usize {
        lock(&self.state).commits
    }

    /// Number of explicit rollbacks.
    #[must_use]
    pub fn rollbacks(&self) -> usize {
        lock(&self.state).rollbacks
    }
}

fn to_user(raw_id: i64, user: &NewUser) -> User {
    let id = UserId::new(raw_id).unwrap_or_else(|err| panic!("sequence produced {raw_id}: {err}"));
    User::new(
        id,
        user.display_name.clone(),
        user.email.clone(),
        user.is_artist,
    )
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn begin(&self) -> Result<Box<dyn UserStoreTransaction>, UserStoreError> {
        if let Some(err) = lock(&self.state).begin_failure.take() {
            return Err(err);
        }
        Ok(Box::new(InMemoryTransaction {
            state: Arc::clone(&self.state),
            users: Vec::new(),
            profiles: Vec::new(),
        }))
    }
}

struct InMemoryTransaction {
    state: Arc<Mutex<StoreState>>,
    users: Vec<User>,
    profiles: Vec<ArtistProfile>,
}

#[async_trait]
impl UserStoreTransaction for InMemoryTransaction {
    async fn insert_user(&mut self, user: &NewUser) -> Result<User, UserStoreError> {
        let mut state = lock(&self.state);
        let taken = state
            .users
            .iter()
            .chain(self.users.iter())
            .any(|existing| existing.email() == &user.email);
        if taken {
            return Err(UserStoreError::unique_violation("email"));
        }
        state.sequence += 1;
        let stored = to_user(state.sequence, user);
        self.users.push(stored.clone());
        Ok(stored)
    }

    async fn insert_artist_profile(
        &mut self,
        owner: UserId,
        profile: &NewArtistProfile,
    ) -> Result<ArtistProfile, UserStoreError> {
        if let Some(err) = lock(&self.state).profile_failure.take() {
            return Err(err);
        }
        if !self.users.iter().any(|user| user.id() == owner) {
            return Err(UserStoreError::query(format!(
                "artist profile owner {owner} does not exist"
            )));
        }
        let stored = ArtistProfile {
            user_id: owner,
            genre_id: profile.genre_id,
        };
        self.profiles.push(stored);
        Ok(stored)
    }

    async fn commit(self: Box<Self>) -> Result<(), UserStoreError> {
        let Self {
            state: shared,
            users,
            profiles,
        } = *self;
        let mut state = lock(&shared);
        if let Some(err) = state.commit_failure.take() {
            return Err(err);
        }
        let conflict = users
            .iter()
            .any(|staged| state.users.iter().any(|existing| existing.email() == staged.email()));
        if conflict {
            return Err(UserStoreError::unique_violation("email"));
        }
        state.users.extend(users);
        state.profiles.extend(profiles);
        state.commits += 1;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), UserStoreError> {
        lock(&self.state).rollbacks += 1;
        Ok(())
    }
}
