use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Core Session Schemas (Mapped to the Auth Endpoint Wire Format) ---

/// UserProfile
///
/// Represents the authenticated user's profile record, as returned inside the
/// login response payload. This is the minimal identity data the portal keeps
/// in memory for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserProfile {
    // Canonical user identifier from the API's user table.
    pub id: Uuid,
    // Display name shown in the layout shell header.
    pub name: String,
    // The user's primary identifier for login.
    pub email: String,
    // The RBAC field: 'admin' or 'student'. Consulted by the navigation guard.
    pub role: String,
    // Account creation timestamp; optional because older API versions omit it.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Input payload for the authentication endpoint (POST /api/login).
/// Field names are fixed by the API contract.
///
/// Note: The password is only ever sent to the authentication endpoint and is
/// never persisted or logged by this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// --- Response Payloads (Output Schemas) ---

/// LoginResponse
///
/// The authentication endpoint's response payload. `status` is the endpoint's
/// explicit success flag: credential rejection arrives as a well-formed 2xx
/// response with `status == false`, which is distinct from a transport failure.
/// `token` and `user` are therefore optional at the wire level and only
/// expected when `status` is true.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoginResponse {
    pub status: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}
