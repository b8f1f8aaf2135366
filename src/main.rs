use std::sync::Arc;

use campus_portal::{
    AppState, FileTokenStore, HttpAuthService, Navigator, SessionContext,
    config::{AppConfig, Env},
    create_route_table, default_guard,
    router::NavigationOutcome,
    storage::TokenStoreState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// The asynchronous entry point for the portal shell, responsible for
/// initializing all core components in the one order that matters: the
/// session context is restored **before** the route table exists, so that a
/// persisted token is already installed when the first guarded navigation
/// resolves.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    // Loads .env file settings before configuration can be read.
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // Sets the default log level. It prioritizes the RUST_LOG environment
    // variable, falling back to sensible defaults for local development.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "campus_portal=debug,reqwest=info".into());

    // 3. Initialize Logging based on Environment
    // The structured logging format is dynamically selected based on APP_ENV.
    match config.env {
        Env::Local => {
            // LOCAL: Pretty print output for human readability during debugging.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // PROD: JSON format output for ingestion by centralized log aggregators.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Portal starting in {:?} mode", config.env);

    // 4. Session Initialization (Before the Router)
    // Token storage and the auth service are explicit dependencies of the
    // session context; nothing here is a module-level global.
    let tokens = Arc::new(FileTokenStore::new(&config.session_file)) as TokenStoreState;
    let auth = Arc::new(HttpAuthService::new(&config.api_base_url));
    let session = SessionContext::new(tokens, auth);

    // Warm start: a previously persisted token becomes the outgoing credential
    // for every subsequent API call. No network is touched here.
    session.restore();

    let state = AppState {
        session: session.clone(),
        config,
    };

    // 5. Route Table & Guard Assembly
    let table = Arc::new(create_route_table().expect("FATAL: invalid route table"));
    tracing::info!(routes = table.len(), "route table ready");

    let navigator = Navigator::new(table, default_guard(), state.session.clone());

    // 6. Initial Navigation
    // Resolve the entry path (first CLI argument, defaulting to the login
    // screen) exactly the way the shell would on page load.
    let entry = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());

    match navigator.navigate(&entry).await {
        Ok(NavigationOutcome::Rendered { path, view, .. }) => {
            tracing::info!(%path, view = view.name, "entry navigation rendered");
        }
        Ok(NavigationOutcome::Redirected { to }) => {
            tracing::info!(%to, "entry navigation redirected");
        }
        Ok(NavigationOutcome::NotFound { path }) => {
            tracing::warn!(%path, "entry navigation matched no route");
        }
        Err(error) => {
            tracing::error!(%error, "entry navigation failed to load its view");
        }
    }
}
