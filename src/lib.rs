use std::sync::Arc;

// --- Module Structure ---

// Core application services and components.
pub mod api;
pub mod config;
pub mod guard;
pub mod models;
pub mod router;
pub mod session;
pub mod storage;

// Module for route declaration segregation (Public, Admin, Student).
pub mod routes;
use routes::{admin, public, student};

// --- Public Re-exports ---

// Makes core state types easily accessible to the application entry point (main.rs).
pub use api::{ApiClient, AuthState, HttpAuthService};
pub use config::AppConfig;
pub use guard::PolicyGuard;
pub use router::{Navigator, RouteTable, RouteTableError};
pub use session::{LoginOutcome, SessionContext};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStoreState};

/// AppState
///
/// Implements the **Unified State Pattern**: the single container holding the
/// session context and the immutable configuration, assembled once at startup
/// and cloned by whoever needs a handle. There is deliberately no global
/// behind it; tests build as many isolated states as they like.
#[derive(Clone)]
pub struct AppState {
    /// Session Layer: the single source of truth for "who is logged in".
    pub session: SessionContext,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

/// create_route_table
///
/// Assembles the portal's entire static route tree from the access-segregated
/// declaration modules and validates it. Construction happens exactly once at
/// startup; the table is immutable afterwards.
pub fn create_route_table() -> Result<RouteTable, RouteTableError> {
    RouteTable::build(vec![
        // Public entry: the login screen.
        public::public_routes(),
        // Admin layout root: CRUD screens for the whole school.
        admin::admin_routes(),
        // Student layout root: the read-mostly student portal.
        student::student_routes(),
    ])
}

/// default_guard
///
/// The portal's stock navigation guard: unauthenticated access to protected
/// routes redirects to the login screen, and the two layout subtrees are
/// reserved for their respective roles. Embedders wanting a different policy
/// construct their own `NavigationGuard` and hand it to the `Navigator`.
pub fn default_guard() -> Arc<PolicyGuard> {
    Arc::new(
        PolicyGuard::new("/")
            .allow("/admin", &["admin"])
            .allow("/student", &["student"]),
    )
}
