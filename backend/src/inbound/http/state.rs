//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so tests can swap in doubles without any I/O.

use std::sync::Arc;

use crate::domain::ports::UserProvisioning;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub provisioning: Arc<dyn UserProvisioning>,
}

impl HttpState {
    pub fn new(provisioning: Arc<dyn UserProvisioning>) -> Self {
        Self { provisioning }
    }
}
