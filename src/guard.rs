use crate::router::RouteMatch;
use crate::session::SessionSnapshot;

/// GuardDecision
///
/// The guard's verdict on a single transition: let it complete, or redirect
/// (in practice, to the login screen) instead of completing navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(String),
}

/// NavigationGuard
///
/// The access-control collaborator consulted by the navigator before every
/// transition. It sees the matched route's metadata and a session snapshot,
/// never the live session, so a slow guard cannot hold the state lock.
///
/// The trait keeps the policy pluggable: the portal ships `PolicyGuard`, and
/// embedders can substitute any other implementation wholesale.
pub trait NavigationGuard: Send + Sync {
    fn check(&self, matched: &RouteMatch<'_>, session: &SessionSnapshot) -> GuardDecision;
}

/// RoleRule
///
/// One entry of the explicit role policy: every route whose effective path
/// falls under `prefix` requires the session user's role to be listed in
/// `allowed_roles`.
#[derive(Debug, Clone)]
pub struct RoleRule {
    pub prefix: String,
    pub allowed_roles: Vec<String>,
}

/// PolicyGuard
///
/// The default guard implementation, layered like the access checks on the
/// server side: authenticate first, then authorize.
///
/// 1. A route marked `requires_auth` with no session token redirects to the
///    login path instead of completing navigation.
/// 2. A route carrying an explicit `meta.role` requires the logged-in user's
///    role to equal it.
/// 3. The configured prefix rules apply on top, so whole layout subtrees can
///    be reserved for a role without tagging every descriptor.
pub struct PolicyGuard {
    login_path: String,
    rules: Vec<RoleRule>,
}

impl PolicyGuard {
    pub fn new(login_path: &str) -> Self {
        Self {
            login_path: login_path.to_string(),
            rules: Vec::new(),
        }
    }

    /// allow
    ///
    /// Adds a prefix rule. Chainable, mirroring how the route declarations read.
    pub fn allow(mut self, prefix: &str, roles: &[&str]) -> Self {
        self.rules.push(RoleRule {
            prefix: prefix.to_string(),
            allowed_roles: roles.iter().map(|role| role.to_string()).collect(),
        });
        self
    }

    fn redirect(&self) -> GuardDecision {
        GuardDecision::Redirect(self.login_path.clone())
    }
}

impl NavigationGuard for PolicyGuard {
    fn check(&self, matched: &RouteMatch<'_>, session: &SessionSnapshot) -> GuardDecision {
        let meta = &matched.record.meta;

        // 1. Authentication: a protected route needs a token, restored or fresh.
        if meta.requires_auth && session.token.is_none() {
            tracing::debug!(path = %matched.path, "unauthenticated access to protected route");
            return self.redirect();
        }

        // A restored session carries a token but no profile until the next API
        // interaction supplies one, so role checks bind only once the profile
        // is known. Authentication has already been enforced above.
        let Some(session_role) = session.user.as_ref().map(|user| user.role.as_str()) else {
            return GuardDecision::Proceed;
        };

        // 2. Route-level role requirement.
        if let Some(required) = meta.role.as_deref() {
            if session_role != required {
                tracing::debug!(path = %matched.path, required, "role requirement not met");
                return self.redirect();
            }
        }

        // 3. Prefix rules for whole layout subtrees.
        for rule in &self.rules {
            if path_has_prefix(&matched.path, &rule.prefix)
                && !rule.allowed_roles.iter().any(|allowed| allowed == session_role)
            {
                tracing::debug!(path = %matched.path, prefix = %rule.prefix,
                    "prefix rule denied access");
                return self.redirect();
            }
        }

        GuardDecision::Proceed
    }
}

/// path_has_prefix
///
/// Segment-aware prefix test: '/admin' covers '/admin' and '/admin/...' but
/// not '/administration'.
fn path_has_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() || prefix == "/" {
        return true;
    }
    path == prefix || path.starts_with(&format!("{prefix}/"))
}
