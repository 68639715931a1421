//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `USER_SERVICE_*` environment variables and
//! configuration files, in OrthoConfig's usual precedence.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use crate::outbound::identity::IdentityToolkitConfig;
use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_IDENTITY_ENDPOINT: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_IDENTITY_TIMEOUT_MS: u64 = 10_000;

/// Errors raised when settings are present but unusable, or missing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required setting {key}")]
    Missing { key: &'static str },
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Runtime settings for the user service.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_SERVICE")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Apply pending migrations before serving.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
    /// Identity Toolkit base URL (or emulator URL).
    pub identity_endpoint: Option<String>,
    /// Project owning the credential accounts.
    pub identity_project_id: Option<String>,
    /// OAuth bearer token for the identity API.
    pub identity_access_token: Option<String>,
    /// Deadline for a single identity call, in milliseconds.
    pub identity_timeout_ms: Option<u64>,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("db_max_connections", &self.db_max_connections)
            .field("run_migrations", &self.run_migrations)
            .field("identity_endpoint", &self.identity_endpoint)
            .field("identity_project_id", &self.identity_project_id)
            .field(
                "identity_access_token",
                &self.identity_access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("identity_timeout_ms", &self.identity_timeout_ms)
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

impl AppSettings {
    /// Bind address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = non_blank(self.bind_addr.as_deref()).unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::Invalid {
            key: "bind_addr",
            message: err.to_string(),
        })
    }

    /// Required PostgreSQL URL.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        non_blank(self.database_url.as_deref()).ok_or(SettingsError::Missing {
            key: "database_url",
        })
    }

    /// Pool size, defaulting to 10.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .filter(|max| *max > 0)
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Identity API base URL, defaulting to the public endpoint.
    pub fn identity_endpoint(&self) -> Result<Url, SettingsError> {
        let raw = non_blank(self.identity_endpoint.as_deref()).unwrap_or(DEFAULT_IDENTITY_ENDPOINT);
        Url::parse(raw).map_err(|err| SettingsError::Invalid {
            key: "identity_endpoint",
            message: err.to_string(),
        })
    }

    /// Required identity project id.
    pub fn identity_project_id(&self) -> Result<&str, SettingsError> {
        non_blank(self.identity_project_id.as_deref()).ok_or(SettingsError::Missing {
            key: "identity_project_id",
        })
    }

    /// Bearer token, wiped from memory when the adapter drops it.
    pub fn identity_access_token(&self) -> Option<Zeroizing<String>> {
        non_blank(self.identity_access_token.as_deref()).map(|token| Zeroizing::new(token.to_owned()))
    }

    /// Identity call deadline, defaulting to ten seconds.
    pub fn identity_timeout(&self) -> Duration {
        Duration::from_millis(
            self.identity_timeout_ms
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_IDENTITY_TIMEOUT_MS),
        )
    }

    /// Pool settings for the persistence adapter.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        Ok(PoolConfig::new(self.database_url()?).with_max_size(self.db_max_connections()))
    }

    /// Connection settings for the identity adapter.
    pub fn identity_config(&self) -> Result<IdentityToolkitConfig, SettingsError> {
        Ok(IdentityToolkitConfig {
            endpoint: self.identity_endpoint()?,
            project_id: self.identity_project_id()?.to_owned(),
            access_token: self.identity_access_token(),
            timeout: self.identity_timeout(),
        })
    }
}
