use async_trait::async_trait;
use campus_portal::{
    SessionContext, create_route_table, default_guard,
    api::{ApiError, AuthService},
    guard::{GuardDecision, NavigationGuard, PolicyGuard},
    models::{LoginResponse, UserProfile},
    router::{NavigationOutcome, Navigator, RouteMatch, RouteTable},
    session::SessionSnapshot,
    storage::MemoryTokenStore,
};
use std::sync::Arc;
use uuid::Uuid;

// --- Helper Functions ---

fn table() -> RouteTable {
    create_route_table().unwrap()
}

fn anonymous() -> SessionSnapshot {
    SessionSnapshot::default()
}

/// A warm-started session: token restored, profile not yet fetched.
fn restored() -> SessionSnapshot {
    SessionSnapshot {
        token: Some("tok-restored".to_string()),
        user: None,
    }
}

fn logged_in(role: &str) -> SessionSnapshot {
    SessionSnapshot {
        token: Some("tok-live".to_string()),
        user: Some(UserProfile {
            id: Uuid::from_u128(11),
            name: "Test User".to_string(),
            email: format!("{role}@school.edu"),
            role: role.to_string(),
            created_at: None,
        }),
    }
}

fn check(path: &str, session: &SessionSnapshot) -> GuardDecision {
    let table = table();
    let matched = table.resolve(path).expect("route registered");
    default_guard().check(&matched, session)
}

// --- Authentication ---

#[test]
fn test_protected_route_redirects_anonymous_to_login() {
    assert_eq!(
        check("/admin/dashboard", &anonymous()),
        GuardDecision::Redirect("/".to_string())
    );
}

#[test]
fn test_login_route_is_open_to_anonymous() {
    assert_eq!(check("/", &anonymous()), GuardDecision::Proceed);
}

#[test]
fn test_restored_token_passes_protected_routes() {
    // A restored session has no profile yet; authentication alone must be
    // enough to reach the screens, or every warm start would bounce to login.
    assert_eq!(check("/admin/dashboard", &restored()), GuardDecision::Proceed);
    assert_eq!(check("/student/dashboard", &restored()), GuardDecision::Proceed);
}

// --- Role Policy ---

#[test]
fn test_roles_are_confined_to_their_layout_subtrees() {
    assert_eq!(check("/admin/dashboard", &logged_in("admin")), GuardDecision::Proceed);
    assert_eq!(check("/student/fees", &logged_in("student")), GuardDecision::Proceed);

    // Cross-area access redirects rather than rendering.
    assert_eq!(
        check("/admin/dashboard", &logged_in("student")),
        GuardDecision::Redirect("/".to_string())
    );
    assert_eq!(
        check("/student/fees", &logged_in("admin")),
        GuardDecision::Redirect("/".to_string())
    );
}

#[test]
fn test_role_metadata_follows_absolute_path_escapes() {
    // The print screen lives outside /admin, so the prefix rule cannot see
    // it; the inherited route metadata still confines it to admins.
    assert_eq!(
        check("/attendance/print-report", &logged_in("admin")),
        GuardDecision::Proceed
    );
    assert_eq!(
        check("/attendance/print-report", &logged_in("student")),
        GuardDecision::Redirect("/".to_string())
    );
}

#[test]
fn test_custom_prefix_rules_are_explicit_configuration() {
    let table = table();
    let matched = table.resolve("/admin/hr/staff").unwrap();

    // A stricter deployment reserves HR screens for a dedicated role.
    let strict = PolicyGuard::new("/")
        .allow("/admin/hr", &["hr-manager"])
        .allow("/admin", &["admin", "hr-manager"]);

    assert_eq!(
        strict.check(&matched, &logged_in("admin")),
        GuardDecision::Redirect("/".to_string())
    );
    assert_eq!(strict.check(&matched, &logged_in("hr-manager")), GuardDecision::Proceed);
}

// --- Pluggability via the Navigator ---

/// A guard that waves everything through, standing in for an embedder's
/// custom policy.
struct PermissiveGuard;

impl NavigationGuard for PermissiveGuard {
    fn check(&self, _matched: &RouteMatch<'_>, _session: &SessionSnapshot) -> GuardDecision {
        GuardDecision::Proceed
    }
}

struct NoAuth;

#[async_trait]
impl AuthService for NoAuth {
    async fn login(&self, _email: &str, _password: &str) -> Result<LoginResponse, ApiError> {
        Err(ApiError::Endpoint("unused".to_string()))
    }
}

#[tokio::test]
async fn test_navigator_consults_the_injected_guard() {
    let session = SessionContext::new(Arc::new(MemoryTokenStore::new()), Arc::new(NoAuth));
    let table = Arc::new(table());

    // Stock guard: anonymous admin navigation redirects to login.
    let guarded = Navigator::new(table.clone(), default_guard(), session.clone());
    let outcome = guarded.navigate("/admin/dashboard").await.unwrap();
    assert!(matches!(outcome, NavigationOutcome::Redirected { to } if to == "/"));

    // Swapped guard: the same navigation renders.
    let open = Navigator::new(table, Arc::new(PermissiveGuard), session);
    let outcome = open.navigate("/admin/dashboard").await.unwrap();
    match outcome {
        NavigationOutcome::Rendered { view, .. } => assert_eq!(view.name, "DashboardView"),
        other => panic!("expected rendered outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn test_navigator_reports_unregistered_paths() {
    let session = SessionContext::new(Arc::new(MemoryTokenStore::new()), Arc::new(NoAuth));
    let navigator = Navigator::new(Arc::new(table()), default_guard(), session);

    let outcome = navigator.navigate("/no/such/screen").await.unwrap();
    assert!(matches!(outcome, NavigationOutcome::NotFound { path } if path == "/no/such/screen"));
}
