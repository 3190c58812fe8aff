//! Server construction and middleware wiring.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use chrono::Duration;
use tracing::warn;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;
use zeroize::Zeroizing;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{
    AccountsService, DonationsService, EmailAddress, NgosService, TasksService, TokenSigner,
};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::{HttpState, configure_api};
use crate::middleware::Trace;
use crate::outbound::persistence::MemoryStore;

/// Administrative account seeded at startup.
pub struct AdminBootstrap {
    /// Administrator login email.
    pub email: EmailAddress,
    /// Administrator password.
    pub password: Zeroizing<String>,
}

/// Configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) jwt_secret: Zeroizing<Vec<u8>>,
    pub(crate) token_ttl: Duration,
    pub(crate) admin: Option<AdminBootstrap>,
}

impl ServerConfig {
    /// Construct a server configuration from explicit values.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, jwt_secret: &[u8], token_ttl: Duration) -> Self {
        Self {
            bind_addr,
            jwt_secret: Zeroizing::new(jwt_secret.to_vec()),
            token_ttl,
            admin: None,
        }
    }

    /// Attach an administrative account to seed at startup.
    #[must_use]
    pub fn with_admin(mut self, admin: AdminBootstrap) -> Self {
        self.admin = Some(admin);
        self
    }

    /// Read the configuration from the environment.
    ///
    /// `BIND_ADDR` defaults to `0.0.0.0:8080` and `TOKEN_TTL_SECS` to one
    /// day. `JWT_SECRET` is required in release builds; debug builds (or
    /// `JWT_ALLOW_EPHEMERAL=1`) fall back to a random per-process secret
    /// so tokens do not survive a restart. `ADMIN_EMAIL` and
    /// `ADMIN_PASSWORD` together seed the administrator account.
    ///
    /// # Errors
    /// Returns [`std::io::Error`] when an address, secret, or admin
    /// setting is missing or unparseable.
    pub fn from_env() -> std::io::Result<Self> {
        let bind_addr: SocketAddr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".into())
            .parse()
            .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => Zeroizing::new(secret.into_bytes()),
            _ => {
                let allow_dev = env::var("JWT_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
                if cfg!(debug_assertions) || allow_dev {
                    warn!("using ephemeral JWT secret (dev only); tokens expire on restart");
                    Zeroizing::new(uuid::Uuid::new_v4().as_bytes().to_vec())
                } else {
                    return Err(std::io::Error::other("JWT_SECRET must be set"));
                }
            }
        };

        let token_ttl_secs: i64 = match env::var("TOKEN_TTL_SECS") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| std::io::Error::other(format!("invalid TOKEN_TTL_SECS: {e}")))?,
            Err(_) => 86_400,
        };

        let admin = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => {
                let email = EmailAddress::new(&email)
                    .map_err(|e| std::io::Error::other(format!("invalid ADMIN_EMAIL: {e}")))?;
                Some(AdminBootstrap {
                    email,
                    password: Zeroizing::new(password),
                })
            }
            (Ok(_), Err(_)) | (Err(_), Ok(_)) => {
                return Err(std::io::Error::other(
                    "ADMIN_EMAIL and ADMIN_PASSWORD must be set together",
                ));
            }
            (Err(_), Err(_)) => None,
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            token_ttl: Duration::seconds(token_ttl_secs),
            admin,
        })
    }
}

/// Wire the in-memory store, domain services, and token signer.
#[must_use]
pub fn build_state(config: &ServerConfig) -> HttpState {
    let store = Arc::new(MemoryStore::new());
    let signer = Arc::new(TokenSigner::new(&config.jwt_secret, config.token_ttl));

    let accounts = Arc::new(AccountsService::new(store.clone(), signer.clone()));
    let donations = Arc::new(DonationsService::new(
        store.clone(),
        store.clone(),
        store.clone(),
    ));
    let ngos = Arc::new(NgosService::new(store.clone(), store.clone()));
    let tasks = Arc::new(TasksService::new(store));

    HttpState {
        accounts,
        donations,
        ngos,
        tasks,
        signer,
    }
}

/// Seed the administrative account named by the configuration, if any.
///
/// # Errors
/// Returns [`std::io::Error`] when the account cannot be created.
pub async fn seed_admin(state: &HttpState, config: &ServerConfig) -> std::io::Result<()> {
    if let Some(admin) = &config.admin {
        state
            .accounts
            .ensure_admin(admin.email.clone(), &admin.password)
            .await
            .map_err(|e| std::io::Error::other(format!("admin bootstrap failed: {e}")))?;
    }
    Ok(())
}

/// Construct an Actix HTTP server over the provided state.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    state: HttpState,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(health_state.clone())
            .app_data(web::Data::new(state.clone()))
            .wrap(Trace)
            .configure(configure_api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(config.bind_addr)?;

    Ok(server.run())
}
