//! PostgreSQL persistence adapters using Diesel.
//!
//! - **Thin adapters**: the store only translates between Diesel rows and
//!   domain types; the saga lives in the domain.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Async pooling**: `bb8` pools of `diesel-async` connections.
//!
//! ```ignore
//! use user_service::outbound::persistence::{DbPool, DieselUserStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/users")).await?;
//! let store = DieselUserStore::new(pool);
//! ```

mod diesel_user_store;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_store::DieselUserStore;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
