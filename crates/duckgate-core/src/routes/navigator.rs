use tracing::{debug, warn};

use super::guard::{self, GuardDecision};
use super::Route;

/// A guard can redirect once; a second hop is allowed for headroom.
const MAX_REDIRECTS: usize = 2;

/// Result of one navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    pub redirected: bool,
}

/// Tracks the rendered route and the intent attached to it.
///
/// The intent only survives on the location a redirect produced; any
/// fresh navigation starts without one.
#[derive(Debug, Default)]
pub struct Navigator {
    current: Option<Route>,
    intent: Option<Route>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigate to `path` as a fresh request (no intent attached)
    pub fn navigate(&mut self, path: &str, is_authenticated: bool) -> Navigation {
        self.resolve(path, None, is_authenticated)
    }

    /// Re-run the guard for the current location, e.g. after the auth
    /// state changed underneath it.
    pub fn refresh(&mut self, is_authenticated: bool) -> Option<Navigation> {
        let current = self.current?;
        let intent = self.intent.take();
        Some(self.resolve(current.path(), intent, is_authenticated))
    }

    pub fn current(&self) -> Option<Route> {
        self.current
    }

    pub fn intent(&self) -> Option<Route> {
        self.intent
    }

    /// Hand the intent to the login flow. It is discarded afterwards.
    pub fn take_intent(&mut self) -> Option<Route> {
        self.intent.take()
    }

    fn resolve(
        &mut self,
        path: &str,
        intent: Option<Route>,
        is_authenticated: bool,
    ) -> Navigation {
        let mut path = path.to_string();
        let mut intent = intent;
        let mut redirected = false;

        for _ in 0..=MAX_REDIRECTS {
            match guard::evaluate(&path, is_authenticated, intent) {
                GuardDecision::Render(route) => {
                    debug!(route = %route, ?intent, redirected, "Rendering route");
                    self.current = Some(route);
                    self.intent = intent;
                    return Navigation { route, redirected };
                }
                GuardDecision::Redirect { to, intent: next } => {
                    debug!(from = %path, to = %to, intent = ?next, "Redirecting");
                    path = to.path().to_string();
                    intent = next;
                    redirected = true;
                }
            }
        }

        let route = if is_authenticated {
            Route::LANDING
        } else {
            Route::Login
        };
        warn!(path = %path, route = %route, "Redirect limit reached, falling back");
        self.current = Some(route);
        self.intent = None;
        Navigation {
            route,
            redirected: true,
        }
    }
}
