//! ToolRent console server

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use toolrent_console::{
    api,
    auth::{load_realm_key, KeycloakClient, SessionResolver},
    config::{AppConfig, TokenSigning},
    gateway::HttpTransport,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("toolrent_console={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting ToolRent console v{}", env!("CARGO_PKG_VERSION"));

    let keycloak = Arc::new(KeycloakClient::new(config.keycloak.clone())?);

    let sessions = match (config.keycloak.signing, &config.keycloak.shared_secret) {
        (TokenSigning::SharedSecret, Some(secret)) => Arc::new(SessionResolver::with_shared_secret(
            config.keycloak.client_id.clone(),
            secret.as_bytes(),
        )),
        (TokenSigning::SharedSecret, None) => {
            anyhow::bail!("keycloak.shared_secret is required when signing = \"shared_secret\"")
        }
        (TokenSigning::RealmKey, _) => {
            let resolver = Arc::new(SessionResolver::pending(config.keycloak.client_id.clone()));
            spawn_realm_key_loader(keycloak.clone(), resolver.clone());
            resolver
        }
    };

    let transport = Arc::new(HttpTransport::new(&config.backend)?);
    tracing::info!("Backend at {}", config.backend.base_url);

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState {
        config: Arc::new(config),
        sessions,
        transport,
        refresher: keycloak,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Fetch the realm key in the background; until it lands every guarded page
/// answers with the loading state.
fn spawn_realm_key_loader(keycloak: Arc<KeycloakClient>, resolver: Arc<SessionResolver>) {
    tokio::spawn(async move {
        load_realm_key(
            &resolver,
            || keycloak.fetch_realm_key(),
            Duration::from_secs(1),
            Duration::from_secs(30),
        )
        .await;
    });
}
