use std::{env, path::PathBuf};

/// AppConfig
///
/// Holds the portal's entire configuration state. This struct is designed to be
/// immutable once loaded, ensuring consistency across all components that consume
/// it (Session Context, Auth Service, API Client). It is assembled once at startup
/// and then shared by value, embodying the "immutable AppConfig" part of the
/// Unified State Pattern.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Base URL of the school-management REST API that every screen talks to.
    // The login endpoint lives at {api_base_url}/api/login.
    pub api_base_url: String,
    // Location of the single-key session document that survives process restarts.
    // This is the client-side analogue of origin-scoped browser storage.
    pub session_file: PathBuf,
    // Runtime environment marker. Controls log format and required variables.
    pub env: Env,
}

/// Env
///
/// Defines the runtime context, used to switch between development conveniences
/// (default local API URL, pretty logs) and production-grade behavior
/// (mandatory configuration, JSON logs).
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-panicking AppConfig instance primarily used for test setup.
    /// This allows us to instantiate the configuration without needing to set environment
    /// variables for lightweight unit or integration testing state scaffolding.
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            session_file: env::temp_dir().join("campus-portal-test").join("session.json"),
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing the application configuration at startup.
    /// It reads all parameters from environment variables and implements the **fail-fast**
    /// principle.
    ///
    /// # Panics
    /// Panics if a critical environment variable required for the current runtime
    /// environment (especially Production) is not found. This prevents the portal from
    /// starting with an incomplete configuration and silently talking to the wrong API.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        // The session document location may be overridden in any environment,
        // falling back to a per-user data directory.
        let session_file = env::var("PORTAL_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_file());

        match env {
            Env::Local => Self {
                env: Env::Local,
                // Local development talks to the API dev server on its default port.
                api_base_url: env::var("PORTAL_API_URL")
                    .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()),
                session_file,
            },
            Env::Production => Self {
                env: Env::Production,
                // Production demands an explicit API endpoint.
                api_base_url: env::var("PORTAL_API_URL")
                    .expect("FATAL: PORTAL_API_URL required in production"),
                session_file,
            },
        }
    }
}

/// default_session_file
///
/// Resolves the per-user location of the persisted session document.
/// Uses the platform's local data directory, falling back to the temp
/// directory on minimal environments (containers, CI).
fn default_session_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(env::temp_dir)
        .join("campus-portal")
        .join("session.json")
}
