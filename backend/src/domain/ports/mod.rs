//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod identity_provider;
mod user_provisioning;
mod user_store;

#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{
    CreateIdentityRequest, IdentityCredential, IdentityProvider, IdentityProviderError,
};
#[cfg(test)]
pub use user_provisioning::MockUserProvisioning;
pub use user_provisioning::UserProvisioning;
pub use user_store::{UserStore, UserStoreError, UserStoreTransaction};
