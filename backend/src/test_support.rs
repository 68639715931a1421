//! Test doubles for the provisioning ports.
//!
//! Shared by unit tests in `src/` and integration tests in `tests/`. Compiled
//! for `cfg(test)` and behind the `test-support` feature.

mod identity_provider;
mod user_store;

pub use identity_provider::RecordingIdentityProvider;
pub use user_store::InMemoryUserStore;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a double's state, recovering from a panicked test thread.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
