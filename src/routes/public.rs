use crate::router::{Component, RouteDescriptor, View};

/// Public Route Module
///
/// The single unauthenticated entry point. Everything else in the portal sits
/// behind a layout root whose subtree the guard protects; the login screen is
/// where those guards redirect to.
pub fn public_routes() -> RouteDescriptor {
    // GET /
    // The login screen. Eager: it must render even on a cold cache, because
    // every guarded navigation may land here.
    RouteDescriptor::view("/", Component::eager(View::new("LoginView")))
        .named("login")
        .title("Sign In")
}
