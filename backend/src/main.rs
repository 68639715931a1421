//! Service entry-point: loads settings, builds adapters and serves HTTP.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use user_service::domain::UserProvisioningService;
use user_service::inbound::http::health::HealthState;
use user_service::outbound::identity::IdentityToolkitProvider;
use user_service::outbound::persistence::{DbPool, DieselUserStore, run_migrations};
use user_service::settings::AppSettings;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    info!(settings = ?settings, "settings loaded");

    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let pool_config = settings.pool_config().map_err(std::io::Error::other)?;

    if settings.run_migrations {
        let applied = run_migrations(pool_config.database_url())
            .await
            .map_err(std::io::Error::other)?;
        info!(applied, "database migrations applied");
    }

    let pool = DbPool::new(pool_config)
        .await
        .map_err(|e| std::io::Error::other(e.into_message()))?;
    let identity_config = settings.identity_config().map_err(std::io::Error::other)?;
    let identity = IdentityToolkitProvider::new(identity_config).map_err(std::io::Error::other)?;

    let provisioning =
        UserProvisioningService::new(Arc::new(DieselUserStore::new(pool)), Arc::new(identity))
            .with_identity_timeout(settings.identity_timeout());

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(bind_addr, Arc::new(provisioning));
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "user service listening");
    server.await
}
