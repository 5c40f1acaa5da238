//! Data models exchanged with the ducks API.
//!
//! - `User`: the authenticated user's profile
//! - `RegisterRequest`, `AuthorizeRequest`: request bodies
//! - `AuthorizeResponse`: login response carrying the JWT

pub mod user;

pub use user::{AuthorizeRequest, AuthorizeResponse, RegisterRequest, User};
