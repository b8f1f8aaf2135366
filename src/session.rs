use std::sync::{Arc, RwLock};

use crate::api::{ApiError, AuthState};
use crate::models::UserProfile;
use crate::storage::TokenStoreState;

/// SessionState
///
/// The sole stateful entity of the portal core: the current bearer token and
/// user profile. The invariant linking the two halves of the lifecycle is that
/// `token` is present exactly when a successful login has occurred (and no
/// logout since), or a prior session was restored from persisted storage.
#[derive(Debug, Clone, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<UserProfile>,
}

/// SessionSnapshot
///
/// A read-only copy of the session state handed to collaborators (the
/// navigation guard, tests) so they never hold the live lock while deciding.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

/// LoginOutcome
///
/// The success indicator returned to the login screen. `Rejected` is the
/// endpoint's explicit failure flag (wrong credentials); transport failures
/// never produce an outcome, they propagate as `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Accepted,
    Rejected,
}

/// SessionContext
///
/// Single source of truth for "who is logged in". Explicitly constructed and
/// passed by handle to whatever needs it (navigation guard, API client
/// factory) instead of living as module-level global state, so lifetime and
/// test isolation stay explicit.
///
/// The handle is cheap to clone; all clones share one state cell. Mutations
/// are discrete reactions to user input or network completion, so the inner
/// lock is only ever held for the few instructions of a field swap and never
/// across an await point.
#[derive(Clone)]
pub struct SessionContext {
    state: Arc<RwLock<SessionState>>,
    tokens: TokenStoreState,
    auth: AuthState,
}

impl SessionContext {
    /// new
    ///
    /// Builds a logged-out context over the injected storage and auth
    /// collaborators. Call `restore()` before the router is constructed to
    /// pick up a persisted session.
    pub fn new(tokens: TokenStoreState, auth: AuthState) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            tokens,
            auth,
        }
    }

    /// restore
    ///
    /// Reads the persisted token from storage and, if present, installs it as
    /// the in-memory session token (and therefore as the outgoing credential,
    /// which is derived from it). No network call is made: the persisted token
    /// is trusted until the API says otherwise. Never fails; an absent token
    /// is the normal logged-out steady state.
    pub fn restore(&self) {
        match self.tokens.load_token() {
            Some(token) => {
                let mut state = self.state.write().expect("session state lock poisoned");
                state.token = Some(token);
                tracing::info!("restored persisted session");
            }
            None => {
                tracing::debug!("no persisted session found; starting logged out");
            }
        }
    }

    /// login
    ///
    /// Sends the credentials to the authentication endpoint and, on acceptance,
    /// installs the returned token and profile and persists the token.
    ///
    /// Failure semantics, in order:
    /// - Transport/protocol failure: propagated unchanged via `?`, no state
    ///   mutation, no retry.
    /// - Explicit rejection (`status == false`): returns
    ///   `Ok(LoginOutcome::Rejected)`, no state mutation, nothing persisted.
    /// - Acceptance without a token is a protocol violation and surfaces as an
    ///   endpoint failure, again without mutating state.
    ///
    /// Navigation is the caller's concern; this method never redirects.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        let response = self.auth.login(email, password).await?;

        if !response.status {
            tracing::info!(email, "login rejected by the authentication endpoint");
            return Ok(LoginOutcome::Rejected);
        }

        let token = response.token.ok_or_else(|| {
            ApiError::Endpoint("login accepted but the response carried no token".to_string())
        })?;

        {
            let mut state = self.state.write().expect("session state lock poisoned");
            state.token = Some(token.clone());
            state.user = response.user;
        }

        // Persist so a reload keeps the user logged in. A write failure keeps
        // the in-memory session valid; the user just logs in again next run.
        if let Err(error) = self.tokens.save_token(&token) {
            tracing::warn!(%error, "failed to persist session token");
        }

        tracing::info!(email, "login accepted; session established");
        Ok(LoginOutcome::Accepted)
    }

    /// logout
    ///
    /// Clears the token and profile in memory and removes the persisted token.
    /// Because the outgoing credential is derived from session state, this also
    /// clears the credential for every subsequent request. Idempotent: calling
    /// it while logged out is a no-op with the same post-condition.
    pub fn logout(&self) {
        {
            let mut state = self.state.write().expect("session state lock poisoned");
            if state.token.is_none() && state.user.is_none() {
                tracing::debug!("logout with no active session; nothing to clear");
            }
            state.token = None;
            state.user = None;
        }

        if let Err(error) = self.tokens.clear_token() {
            tracing::warn!(%error, "failed to remove persisted session token");
        }

        tracing::info!("session cleared");
    }

    /// credential
    ///
    /// The current outgoing request credential, `Bearer <token>`, or `None`
    /// while logged out. The API client reads this at call time for every
    /// request, which is what keeps the credential and the session state in
    /// lockstep through logins and logouts.
    pub fn credential(&self) -> Option<String> {
        self.state
            .read()
            .expect("session state lock poisoned")
            .token
            .as_ref()
            .map(|token| format!("Bearer {token}"))
    }

    /// token
    ///
    /// The raw bearer token, if a session is active.
    pub fn token(&self) -> Option<String> {
        self.state
            .read()
            .expect("session state lock poisoned")
            .token
            .clone()
    }

    /// user
    ///
    /// The profile of the logged-in user, if known. A restored session has a
    /// token but no profile until the next API interaction supplies one.
    pub fn user(&self) -> Option<UserProfile> {
        self.state
            .read()
            .expect("session state lock poisoned")
            .user
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .expect("session state lock poisoned")
            .token
            .is_some()
    }

    /// snapshot
    ///
    /// A point-in-time copy of the session for the navigation guard.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().expect("session state lock poisoned");
        SessionSnapshot {
            token: state.token.clone(),
            user: state.user.clone(),
        }
    }
}
