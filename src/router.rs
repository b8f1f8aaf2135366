use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::OnceCell;

use crate::guard::{GuardDecision, NavigationGuard};
use crate::session::SessionContext;

// --- Views and Loading Strategies ---

/// View
///
/// An opaque handle to a screen. Rendering is outside this core's scope; the
/// router's job ends when it can hand a resolved view to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub name: &'static str,
}

impl View {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

/// ViewLoadError
///
/// Raised when a lazily loaded view's fetch fails. A failed fetch is not
/// cached: the next navigation to the same route retries the loader.
#[derive(Debug, Error)]
#[error("failed to load view '{view}': {reason}")]
pub struct ViewLoadError {
    pub view: String,
    pub reason: String,
}

/// Boxed future produced by a lazy view's loader.
pub type ViewFuture = Pin<Box<dyn Future<Output = Result<Arc<View>, ViewLoadError>> + Send>>;
/// Shareable factory for a lazy view's fetch.
pub type ViewLoader = Arc<dyn Fn() -> ViewFuture + Send + Sync>;

/// Component
///
/// The two loading strategies a route descriptor can carry:
/// - **Eager**: the view exists from table construction onward.
/// - **Lazy**: the view is fetched on first navigation and cached for the
///   lifetime of the process. The cache cell guarantees a single in-flight
///   fetch shared by concurrent navigators: whoever arrives first runs the
///   loader, everyone else awaits the same initialization.
pub enum Component {
    Eager(Arc<View>),
    Lazy {
        loader: ViewLoader,
        cache: OnceCell<Arc<View>>,
    },
}

impl Component {
    pub fn eager(view: View) -> Self {
        Component::Eager(Arc::new(view))
    }

    /// lazy
    ///
    /// Wraps an arbitrary async loader. Used directly by tests that need to
    /// observe fetch counts or stall the fetch; route declarations use the
    /// `lazy_view` sugar below.
    pub fn lazy<F, Fut>(loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<View, ViewLoadError>> + Send + 'static,
    {
        let loader: ViewLoader = Arc::new(move || {
            let fut = loader();
            let boxed: ViewFuture = Box::pin(async move { fut.await.map(Arc::new) });
            boxed
        });
        Component::Lazy {
            loader,
            cache: OnceCell::new(),
        }
    }

    /// lazy_view
    ///
    /// Declares a deferred view by name: the loader resolves off the critical
    /// path of table construction, on first navigation only.
    pub fn lazy_view(name: &'static str) -> Self {
        Self::lazy(move || async move {
            tokio::task::yield_now().await;
            Ok(View::new(name))
        })
    }

    /// resolve
    ///
    /// Returns the view, running the lazy loader on first access. Only the
    /// navigation that triggers a fetch suspends on it; concurrent first
    /// navigations share the one in-flight fetch via the cache cell.
    pub async fn resolve(&self) -> Result<Arc<View>, ViewLoadError> {
        match self {
            Component::Eager(view) => Ok(view.clone()),
            Component::Lazy { loader, cache } => {
                cache.get_or_try_init(|| loader()).await.map(Arc::clone)
            }
        }
    }

    /// is_loaded
    ///
    /// True when the view is already materialized (eager, or lazy with a
    /// populated cache).
    pub fn is_loaded(&self) -> bool {
        match self {
            Component::Eager(_) => true,
            Component::Lazy { cache, .. } => cache.initialized(),
        }
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Component::Eager(view) => f.debug_tuple("Eager").field(view).finish(),
            Component::Lazy { cache, .. } => f
                .debug_struct("Lazy")
                .field("loader", &"<loader>")
                .field("cache", cache)
                .finish(),
        }
    }
}

// --- Route Declarations ---

/// RouteMeta
///
/// Per-route access metadata consumed by the navigation guard. `requires_auth`
/// and `role` propagate from a layout root to its children during table
/// construction, so protecting the root protects the whole subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub role: Option<String>,
    pub title: Option<String>,
}

/// RouteDescriptor
///
/// One declared route: a path (relative to the parent, or absolute when it
/// starts with '/'), an optional unique name, a component with its loading
/// strategy, access metadata, and nested children. Descriptors are declaration
/// data only; `RouteTable::build` turns the tree into the resolvable table.
pub struct RouteDescriptor {
    pub path: String,
    pub name: Option<&'static str>,
    pub component: Component,
    pub meta: RouteMeta,
    pub children: Vec<RouteDescriptor>,
}

impl RouteDescriptor {
    pub fn view(path: &str, component: Component) -> Self {
        Self {
            path: path.to_string(),
            name: None,
            component,
            meta: RouteMeta::default(),
            children: Vec::new(),
        }
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    pub fn requires_auth(mut self) -> Self {
        self.meta.requires_auth = true;
        self
    }

    pub fn role(mut self, role: &str) -> Self {
        self.meta.role = Some(role.to_string());
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.meta.title = Some(title.to_string());
        self
    }

    pub fn children(mut self, children: Vec<RouteDescriptor>) -> Self {
        self.children = children;
        self
    }
}

// --- The Route Table ---

/// Path segment after concatenation. A leading ':' in a declared segment makes
/// it a parameter capture.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// RouteRecord
///
/// One flattened, resolvable route: the effective absolute path (ancestor
/// segments concatenated), the inherited metadata, and the component. Records
/// are immutable for the lifetime of the table.
#[derive(Debug)]
pub struct RouteRecord {
    pub path: String,
    pub name: Option<&'static str>,
    pub meta: RouteMeta,
    component: Component,
    segments: Vec<Segment>,
}

impl RouteRecord {
    /// resolve_view
    ///
    /// Materializes this route's view, fetching and caching it if lazy.
    pub async fn resolve_view(&self) -> Result<Arc<View>, ViewLoadError> {
        self.component.resolve().await
    }

    pub fn is_view_loaded(&self) -> bool {
        self.component.is_loaded()
    }
}

/// RouteTableError
///
/// Construction-time validation failures. The table is built once at startup
/// from static declarations, so these are programming errors surfaced
/// fail-fast rather than runtime conditions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteTableError {
    /// Two routes concatenate to the same effective path shape under a root.
    #[error("duplicate route path '{path}'")]
    DuplicatePath { path: String },
    /// Route names must be unique across the whole table.
    #[error("duplicate route name '{name}'")]
    DuplicateName { name: String },
    /// A non-root descriptor declared an empty path.
    #[error("empty route path under '{parent}'")]
    EmptyPath { parent: String },
}

/// RouteMatch
///
/// The result of resolving a concrete path: the matched record, the captured
/// parameters (`:id` and friends), and the normalized requested path.
pub struct RouteMatch<'a> {
    pub record: &'a RouteRecord,
    pub params: HashMap<String, String>,
    pub path: String,
}

/// RouteTable
///
/// The static, hierarchical mapping from URL path to screen. Constructed once
/// from the declarations under the layout roots and immutable thereafter:
/// there is no runtime route registration.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<RouteRecord>,
}

impl RouteTable {
    /// build
    ///
    /// Flattens the declaration trees into resolvable records, concatenating
    /// ancestor path segments (a child path with a leading '/' opts out and is
    /// used verbatim), propagating `requires_auth`/`role` metadata downward,
    /// and validating effective-path and name uniqueness.
    pub fn build(roots: Vec<RouteDescriptor>) -> Result<Self, RouteTableError> {
        let mut routes = Vec::new();
        let mut seen_paths = HashSet::new();
        let mut seen_names = HashSet::new();

        for root in roots {
            flatten(root, "", &RouteMeta::default(), &mut routes)?;
        }

        for record in &routes {
            // Parameter names do not disambiguate: 'students/:id' and
            // 'students/:code' occupy the same slot.
            let shape = shape_key(&record.segments);
            if !seen_paths.insert(shape) {
                return Err(RouteTableError::DuplicatePath {
                    path: record.path.clone(),
                });
            }
            if let Some(name) = record.name {
                if !seen_names.insert(name) {
                    return Err(RouteTableError::DuplicateName {
                        name: name.to_string(),
                    });
                }
            }
        }

        tracing::debug!(routes = routes.len(), "route table constructed");
        Ok(Self { routes })
    }

    /// resolve
    ///
    /// Deterministic most-specific match: among records whose segment pattern
    /// matches the requested path, static segments outrank parameter segments
    /// position by position from the left. Returns `None` for unregistered
    /// paths; exactly one record otherwise.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        let normalized = normalize_path(path);
        let request: Vec<&str> = split_segments(&normalized);

        let mut best: Option<(&RouteRecord, HashMap<String, String>, Vec<u8>)> = None;

        for record in &self.routes {
            if record.segments.len() != request.len() {
                continue;
            }

            let mut params = HashMap::new();
            let mut rank = Vec::with_capacity(record.segments.len());
            let mut matched = true;

            for (segment, requested) in record.segments.iter().zip(&request) {
                match segment {
                    Segment::Static(expected) if expected == requested => rank.push(1),
                    Segment::Static(_) => {
                        matched = false;
                        break;
                    }
                    Segment::Param(name) => {
                        params.insert(name.clone(), (*requested).to_string());
                        rank.push(0);
                    }
                }
            }

            if matched && best.as_ref().is_none_or(|(_, _, r)| rank > *r) {
                best = Some((record, params, rank));
            }
        }

        best.map(|(record, params, _)| RouteMatch {
            record,
            params,
            path: normalized,
        })
    }

    /// resolve_name
    ///
    /// Lookup by the optional unique route name, for programmatic navigation.
    pub fn resolve_name(&self, name: &str) -> Option<&RouteRecord> {
        self.routes.iter().find(|record| record.name == Some(name))
    }

    pub fn records(&self) -> impl Iterator<Item = &RouteRecord> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// flatten
///
/// Recursive worker for `build`: computes each descriptor's effective path and
/// inherited metadata, then records it and descends.
fn flatten(
    descriptor: RouteDescriptor,
    parent_path: &str,
    parent_meta: &RouteMeta,
    out: &mut Vec<RouteRecord>,
) -> Result<(), RouteTableError> {
    let declared = descriptor.path.trim();
    if declared.is_empty() {
        let parent = if parent_path.is_empty() { "/" } else { parent_path };
        return Err(RouteTableError::EmptyPath {
            parent: parent.to_string(),
        });
    }

    // Absolute child paths opt out of concatenation, exactly like the few
    // print/report screens that live outside their layout prefix.
    let effective = if declared.starts_with('/') {
        normalize_path(declared)
    } else {
        normalize_path(&format!("{parent_path}/{declared}"))
    };

    let meta = RouteMeta {
        requires_auth: parent_meta.requires_auth || descriptor.meta.requires_auth,
        role: descriptor.meta.role.clone().or_else(|| parent_meta.role.clone()),
        title: descriptor.meta.title.clone(),
    };

    let segments = split_segments(&effective)
        .into_iter()
        .map(|segment| match segment.strip_prefix(':') {
            Some(param) => Segment::Param(param.to_string()),
            None => Segment::Static(segment.to_string()),
        })
        .collect();

    out.push(RouteRecord {
        path: effective.clone(),
        name: descriptor.name,
        meta: meta.clone(),
        component: descriptor.component,
        segments,
    });

    for child in descriptor.children {
        flatten(child, &effective, &meta, out)?;
    }

    Ok(())
}

fn normalize_path(path: &str) -> String {
    let joined = split_segments(path).join("/");
    format!("/{joined}")
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// shape_key
///
/// Canonical uniqueness key for a segment pattern, with parameter names
/// wildcarded so that colliding captures are caught at build time.
fn shape_key(segments: &[Segment]) -> String {
    let shape: Vec<&str> = segments
        .iter()
        .map(|segment| match segment {
            Segment::Static(value) => value.as_str(),
            Segment::Param(_) => ":param",
        })
        .collect();
    format!("/{}", shape.join("/"))
}

// --- The Navigator ---

/// NavigationOutcome
///
/// What a navigation attempt produced: a rendered view, a guard-ordered
/// redirect, or no matching route.
#[derive(Debug)]
pub enum NavigationOutcome {
    Rendered {
        path: String,
        view: Arc<View>,
        params: HashMap<String, String>,
    },
    Redirected {
        to: String,
    },
    NotFound {
        path: String,
    },
}

/// Navigator
///
/// Ties the three collaborators together for a single transition:
/// resolve against the table, consult the guard with a session snapshot,
/// then materialize the view (suspending only this navigation on a lazy
/// fetch). An in-flight fetch is not cancelled by navigating elsewhere; it
/// completes and populates the cache for the next visit.
pub struct Navigator {
    table: Arc<RouteTable>,
    guard: Arc<dyn NavigationGuard>,
    session: SessionContext,
}

impl Navigator {
    pub fn new(table: Arc<RouteTable>, guard: Arc<dyn NavigationGuard>, session: SessionContext) -> Self {
        Self { table, guard, session }
    }

    /// navigate
    ///
    /// Performs one route transition. Guard consultation happens before any
    /// view loading, so an unauthorized navigation never triggers a fetch.
    pub async fn navigate(&self, path: &str) -> Result<NavigationOutcome, ViewLoadError> {
        let Some(matched) = self.table.resolve(path) else {
            tracing::warn!(path, "navigation to unregistered path");
            return Ok(NavigationOutcome::NotFound {
                path: normalize_path(path),
            });
        };

        let snapshot = self.session.snapshot();
        match self.guard.check(&matched, &snapshot) {
            GuardDecision::Redirect(to) => {
                tracing::info!(from = %matched.path, %to, "navigation redirected by guard");
                Ok(NavigationOutcome::Redirected { to })
            }
            GuardDecision::Proceed => {
                let view = matched.record.resolve_view().await?;
                tracing::debug!(path = %matched.path, view = view.name, "navigation rendered");
                Ok(NavigationOutcome::Rendered {
                    path: matched.path,
                    view,
                    params: matched.params,
                })
            }
        }
    }
}
