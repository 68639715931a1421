//! Ordered log of compensating actions for the provisioning saga.
//!
//! Each external side effect records how to undo itself. When the relational
//! side cannot be finalised the log is unwound newest first. Unwinding never
//! fails: errors are logged and the remaining steps still run.

use tracing::{info, warn};

use super::UserId;
use super::ports::{IdentityProvider, IdentityProviderError};

/// A single undo step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compensation {
    /// Remove the credential account keyed by the user id.
    DeleteIdentity(UserId),
}

/// Pending compensations in the order their side effects happened.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompensationLog {
    pending: Vec<Compensation>,
}

impl CompensationLog {
    /// Empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step. Recording the same step twice keeps one entry.
    pub fn record(&mut self, step: Compensation) {
        if !self.pending.contains(&step) {
            self.pending.push(step);
        }
    }

    /// Whether no step has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Steps in recording order.
    #[must_use]
    pub fn steps(&self) -> &[Compensation] {
        &self.pending
    }

    /// Run every step, newest first.
    pub async fn unwind<I>(self, identity: &I)
    where
        I: IdentityProvider + ?Sized,
    {
        for step in self.pending.into_iter().rev() {
            match step {
                Compensation::DeleteIdentity(user_id) => {
                    match identity.delete_user(user_id).await {
                        Ok(()) => info!(%user_id, "removed identity during compensation"),
                        Err(IdentityProviderError::NotFound { .. }) => {
                            info!(%user_id, "identity already absent during compensation");
                        }
                        Err(err) => warn!(
                            %user_id,
                            error = %err,
                            "identity compensation failed; account may be orphaned"
                        ),
                    }
                }
            }
        }
    }
}
