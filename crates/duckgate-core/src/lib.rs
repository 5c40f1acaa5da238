//! Core library for duckgate.
//!
//! Session state, login/registration flows and the client-side route
//! guard for the ducks API, independent of any UI.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod routes;
pub mod scope;

pub use api::{ApiClient, ApiError, AuthApi};
pub use auth::{
    AuthError, LoginOutcome, RegisterOutcome, Registration, Session, SessionContext, SessionStore,
    TokenStore,
};
pub use config::Config;
pub use models::User;
pub use routes::{GuardDecision, Navigation, Navigator, Route};
pub use scope::ViewScope;
