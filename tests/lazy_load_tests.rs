use async_trait::async_trait;
use campus_portal::{
    SessionContext,
    api::{ApiError, AuthService},
    guard::{GuardDecision, NavigationGuard},
    models::LoginResponse,
    router::{
        Component, NavigationOutcome, Navigator, RouteDescriptor, RouteMatch, RouteTable, View,
        ViewLoadError,
    },
    session::SessionSnapshot,
    storage::MemoryTokenStore,
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

// --- Helpers ---

struct NoAuth;

#[async_trait]
impl AuthService for NoAuth {
    async fn login(&self, _email: &str, _password: &str) -> Result<LoginResponse, ApiError> {
        Err(ApiError::Endpoint("unused".to_string()))
    }
}

struct OpenGuard;

impl NavigationGuard for OpenGuard {
    fn check(&self, _matched: &RouteMatch<'_>, _session: &SessionSnapshot) -> GuardDecision {
        GuardDecision::Proceed
    }
}

fn navigator(table: RouteTable) -> Navigator {
    let session = SessionContext::new(Arc::new(MemoryTokenStore::new()), Arc::new(NoAuth));
    Navigator::new(Arc::new(table), Arc::new(OpenGuard), session)
}

/// A lazy route whose fetch count is observable and whose fetch takes long
/// enough for concurrent navigations to overlap.
fn counting_lazy_route(fetches: Arc<AtomicUsize>) -> RouteDescriptor {
    RouteDescriptor::view(
        "/reports/annual",
        Component::lazy(move || {
            let fetches = fetches.clone();
            async move {
                fetches.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(View::new("AnnualReportView"))
            }
        }),
    )
}

// --- Caching ---

#[tokio::test]
async fn test_lazy_view_fetched_once_and_cached_for_process_lifetime() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let table = RouteTable::build(vec![counting_lazy_route(fetches.clone())]).unwrap();

    assert!(!table.resolve("/reports/annual").unwrap().record.is_view_loaded());

    let navigator = navigator(table);

    for _ in 0..3 {
        let outcome = navigator.navigate("/reports/annual").await.unwrap();
        match outcome {
            NavigationOutcome::Rendered { view, .. } => assert_eq!(view.name, "AnnualReportView"),
            other => panic!("expected rendered outcome, got {other:?}"),
        }
    }

    // First navigation fetched; the rest were cache hits.
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_first_navigations_share_one_fetch() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let table = RouteTable::build(vec![counting_lazy_route(fetches.clone())]).unwrap();
    let navigator = Arc::new(navigator(table));

    // Two navigators race to the same cold route; the cache cell must admit
    // a single in-flight fetch shared by both.
    let (first, second) = tokio::join!(
        navigator.navigate("/reports/annual"),
        navigator.navigate("/reports/annual"),
    );

    assert!(matches!(first.unwrap(), NavigationOutcome::Rendered { .. }));
    assert!(matches!(second.unwrap(), NavigationOutcome::Rendered { .. }));
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let route = RouteDescriptor::view(
        "/reports/annual",
        Component::lazy({
            let attempts = attempts.clone();
            move || {
                let attempts = attempts.clone();
                async move {
                    // First fetch drops the connection; the retry succeeds.
                    if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(ViewLoadError {
                            view: "AnnualReportView".to_string(),
                            reason: "chunk fetch interrupted".to_string(),
                        })
                    } else {
                        Ok(View::new("AnnualReportView"))
                    }
                }
            }
        }),
    );
    let table = RouteTable::build(vec![route]).unwrap();
    let navigator = navigator(table);

    let first = navigator.navigate("/reports/annual").await;
    assert!(first.is_err());

    let second = navigator.navigate("/reports/annual").await.unwrap();
    assert!(matches!(second, NavigationOutcome::Rendered { .. }));
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

// --- Eager Routes ---

#[tokio::test]
async fn test_eager_views_are_available_at_construction() {
    let table = RouteTable::build(vec![
        RouteDescriptor::view("/now", Component::eager(View::new("InstantView"))),
    ])
    .unwrap();

    assert!(table.resolve("/now").unwrap().record.is_view_loaded());

    let view = table.resolve("/now").unwrap().record.resolve_view().await.unwrap();
    assert_eq!(view.name, "InstantView");
}

#[tokio::test]
async fn test_unauthorized_navigation_never_triggers_a_fetch() {
    use campus_portal::guard::PolicyGuard;

    let fetches = Arc::new(AtomicUsize::new(0));
    let route = counting_lazy_route(fetches.clone()).requires_auth();
    let table = RouteTable::build(vec![route]).unwrap();

    let session = SessionContext::new(Arc::new(MemoryTokenStore::new()), Arc::new(NoAuth));
    let navigator = Navigator::new(
        Arc::new(table),
        Arc::new(PolicyGuard::new("/login")),
        session,
    );

    let outcome = navigator.navigate("/reports/annual").await.unwrap();
    assert!(matches!(outcome, NavigationOutcome::Redirected { to } if to == "/login"));

    // The guard ran before loading, so the chunk was never fetched.
    assert_eq!(fetches.load(Ordering::SeqCst), 0);
}
