//! User registration service.
//!
//! Provisions listener and artist accounts across the relational store and
//! the external identity provider, compensating identity side effects when a
//! later step fails.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Request tracing middleware, re-exported for server wiring.
pub use middleware::Trace;
