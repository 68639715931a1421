//! Account registration handler.
//!
//! ```text
//! POST /api/usuarios {"name":"Ana","email":"a@x.com","password":"s3cret","isArtist":false}
//! ```

use std::sync::Arc;

use actix_web::{HttpResponse, post, web};
use tracing::error;

use crate::domain::{ApiResult, Error, RegistrationPayload, TraceId, USERS_PATH};
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::state::HttpState;

/// Register a listener or artist account.
///
/// Provisioning runs on its own task, so a client that disconnects mid-call
/// cannot cancel it between the identity side effect and the commit or
/// compensation that follows.
#[post("/usuarios")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<RegistrationPayload>,
) -> ApiResult<HttpResponse> {
    let provisioning = Arc::clone(&state.provisioning);
    let payload = payload.into_inner();
    let trace_id = TraceId::current().unwrap_or_else(TraceId::generate);

    let task = tokio::spawn(TraceId::scope(trace_id, async move {
        provisioning.provision(payload).await
    }));
    let provisioned = task.await.map_err(|err| {
        error!(error = %err, "provisioning task did not complete");
        Error::internal("user provisioning did not complete").with_path(USERS_PATH)
    })??;

    Ok(HttpResponse::Created().json(provisioned))
}

/// Register the users routes and their body limits on `cfg`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use user_service::inbound::http::users;
///
/// let app = App::new().service(web::scope("/api").configure(users::configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(create_user);
}

#[cfg(test)]
mod tests;
