use async_trait::async_trait;
use reqwest::{Method, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{LoginRequest, LoginResponse};
use crate::session::SessionContext;

/// ApiError
///
/// The single failure surface of every remote call this crate makes. The
/// session context performs no retry and no error translation: whatever
/// happens on the wire is handed to the caller exactly once, unchanged.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport/protocol failure: network unreachable, a non-2xx status, or a
    /// response body that did not decode.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    /// A failure raised without a live socket, e.g. a protocol violation
    /// detected locally or a simulated outage from a test double.
    #[error("endpoint failure: {0}")]
    Endpoint(String),
}

// 1. AuthService Contract

/// AuthService
///
/// Defines the abstract contract for the remote authentication endpoint. The
/// session context depends only on this trait, allowing the real HTTP client
/// (HttpAuthService) to be swapped for an in-test double exactly the way the
/// token store is.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn AuthService>`) safely shareable across async task boundaries.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchanges credentials for a bearer token and profile. A well-formed
    /// response with `status == false` is credential rejection, not an error;
    /// only transport/protocol problems surface as `Err`.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError>;
}

// 2. The Real Implementation (HTTP)

/// HttpAuthService
///
/// The concrete implementation calling POST {base_url}/api/login over HTTP.
/// No timeout and no retry are configured: an unresponsive endpoint suspends
/// the login attempt until the transport itself gives up.
#[derive(Clone)]
pub struct HttpAuthService {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthService {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// with_client
    ///
    /// Constructs the service around an externally owned `reqwest::Client`, so
    /// the whole portal shares one connection pool.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let url = format!("{}/api/login", self.base_url);

        let response = self
            .http
            .post(url)
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?
            // Non-2xx statuses are transport-class failures; the explicit
            // rejection path is the in-band `status` flag on a 2xx body.
            .error_for_status()?;

        let payload = response.json::<LoginResponse>().await?;
        Ok(payload)
    }
}

/// AuthState
///
/// The concrete type used to share the authentication service across the application.
pub type AuthState = Arc<dyn AuthService>;

// 3. Credential-Bearing API Client

/// ApiClient
///
/// The outgoing-request factory handed to every CRUD screen. Instead of a
/// process-wide default header mutated as a side effect of login, the client
/// holds a `SessionContext` handle and reads `credential()` **at call time**,
/// so a logout is reflected on the very next request with no stale header
/// left behind.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(base_url: &str, session: SessionContext) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, session)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str, session: SessionContext) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    /// request
    ///
    /// Builds a request against the API, attaching the current session
    /// credential if one exists. This is the single point where session state
    /// turns into an outgoing `Authorization: Bearer <token>` header.
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.http.request(method, url);
        if let Some(credential) = self.session.credential() {
            builder = builder.header(header::AUTHORIZATION, credential);
        }
        builder
    }

    /// get
    ///
    /// Fetches `path` and decodes the JSON body. Used by list/detail screens.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .request(Method::GET, path)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    /// post
    ///
    /// Submits `body` as JSON to `path` and decodes the JSON response. Used by
    /// the create/update forms.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, path)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}
