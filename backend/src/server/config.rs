//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use user_service::domain::ports::UserProvisioning;

/// Everything [`super::create_server`] needs to bind and route.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) provisioning: Arc<dyn UserProvisioning>,
}

impl ServerConfig {
    /// Bind `bind_addr` and route registrations to `provisioning`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, provisioning: Arc<dyn UserProvisioning>) -> Self {
        Self {
            bind_addr,
            provisioning,
        }
    }
}
