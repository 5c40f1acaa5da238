//! Route guard policy.
//!
//! A pure function of the auth state, the requested path and the intent
//! carried by the request. Every redirect target is a known route that
//! renders under the same auth state, so a guard decision never loops.

use super::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render(Route),
    Redirect {
        to: Route,
        /// Intent to attach to the redirected request
        intent: Option<Route>,
    },
}

/// Decide what to show for `path`.
///
/// `intent` is the navigation intent attached to this request, only
/// meaningful when the request is for an anonymous-only route.
pub fn evaluate(path: &str, is_authenticated: bool, intent: Option<Route>) -> GuardDecision {
    let Some(route) = Route::parse(path) else {
        let to = if is_authenticated {
            Route::LANDING
        } else {
            Route::Login
        };
        return GuardDecision::Redirect { to, intent: None };
    };

    match (is_authenticated, route.is_anonymous_only()) {
        (true, true) => GuardDecision::Redirect {
            to: post_login_destination(intent),
            intent: None,
        },
        (false, false) => GuardDecision::Redirect {
            to: Route::Login,
            intent: Some(route),
        },
        (false, true) | (true, false) => GuardDecision::Render(route),
    }
}

/// Where a signed-in user goes next: the intent if it names a protected
/// view, otherwise the landing view.
pub fn post_login_destination(intent: Option<Route>) -> Route {
    intent
        .filter(Route::is_protected)
        .unwrap_or(Route::LANDING)
}
