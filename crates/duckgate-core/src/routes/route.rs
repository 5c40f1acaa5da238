use std::fmt;

use serde::{Deserialize, Serialize};

/// A view the client knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum Route {
    Ducks,
    MyProfile,
    Login,
    Register,
}

impl Route {
    /// Where authenticated users land by default
    pub const LANDING: Route = Route::Ducks;

    pub const ALL: [Route; 4] = [Route::Ducks, Route::MyProfile, Route::Login, Route::Register];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Ducks => "/ducks",
            Route::MyProfile => "/my-profile",
            Route::Login => "/login",
            Route::Register => "/register",
        }
    }

    /// Match a path against the route table. `None` means the catch-all.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim();
        let path = match path.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => path,
        };
        Self::ALL.into_iter().find(|r| r.path() == path)
    }

    /// Login and register are only reachable while signed out
    pub fn is_anonymous_only(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }

    pub fn is_protected(&self) -> bool {
        !self.is_anonymous_only()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_paths() {
        for route in Route::ALL {
            assert_eq!(Route::parse(route.path()), Some(route));
        }
    }

    #[test]
    fn test_parse_trailing_slash() {
        assert_eq!(Route::parse("/ducks/"), Some(Route::Ducks));
        assert_eq!(Route::parse(" /login "), Some(Route::Login));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Route::parse("/"), None);
        assert_eq!(Route::parse(""), None);
        assert_eq!(Route::parse("/geese"), None);
        assert_eq!(Route::parse("/ducks/42"), None);
        assert_eq!(Route::parse("ducks"), None);
    }

    #[test]
    fn test_access_rules() {
        assert!(Route::Login.is_anonymous_only());
        assert!(Route::Register.is_anonymous_only());
        assert!(Route::Ducks.is_protected());
        assert!(Route::MyProfile.is_protected());
        assert!(Route::LANDING.is_protected());
    }
}
