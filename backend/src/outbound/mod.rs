//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL user store using Diesel
//! - **identity**: Identity Toolkit credential accounts over HTTP
//!
//! Adapters translate between domain types and infrastructure
//! representations; they hold no business logic.

pub mod identity;
pub mod persistence;
