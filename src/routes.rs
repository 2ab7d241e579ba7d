//! Client-Side Routes
//!
//! The four views, the navigation seam the views redirect through, and the
//! process-wide route list exposed to an embedding host.

use std::fmt;
use std::sync::{Mutex, OnceLock};

/// Registered route paths, in registration order
pub const ROUTE_PATHS: [&str; 4] = ["/", "/register", "/login", "/profile"];

static REGISTERED_ROUTES: OnceLock<Vec<&'static str>> = OnceLock::new();

/// A client-side route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Group chat
    Home,
    Register,
    Login,
    Profile,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Home, Route::Register, Route::Login, Route::Profile];

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Register => "/register",
            Route::Login => "/login",
            Route::Profile => "/profile",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|route| route.path() == path)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Publish the route list for the embedding host
///
/// Populated once per process; later calls return `false` and change nothing.
pub fn register_routes() -> bool {
    let registered = REGISTERED_ROUTES.set(ROUTE_PATHS.to_vec()).is_ok();
    if registered {
        tracing::debug!(routes = ?ROUTE_PATHS, "Routes registered");
    }
    registered
}

/// Host-facing hook: the registered route list, once [`register_routes`] ran
pub fn registered_routes() -> Option<&'static [&'static str]> {
    REGISTERED_ROUTES.get().map(Vec::as_slice)
}

/// Navigation seam used by the views for redirects
pub trait Navigator: Send + Sync {
    /// Go to `route`; `replace` overwrites the current entry instead of pushing
    fn navigate(&self, route: Route, replace: bool);

    fn current(&self) -> Route;
}

/// In-process navigation history
#[derive(Debug)]
pub struct History {
    entries: Mutex<Vec<Route>>,
}

impl History {
    pub fn new(initial: Route) -> Self {
        Self {
            entries: Mutex::new(vec![initial]),
        }
    }

    pub fn entries(&self) -> Vec<Route> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Navigator for History {
    fn navigate(&self, route: Route, replace: bool) {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if replace {
            entries.pop();
        }
        entries.push(route);
        tracing::debug!(%route, replace, "Navigated");
    }

    fn current(&self) -> Route {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .last()
            .copied()
            .unwrap_or(Route::Home)
    }
}
