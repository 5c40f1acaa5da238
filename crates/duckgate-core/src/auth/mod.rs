//! Authentication and session management.
//!
//! This module provides:
//! - `Session` / `SessionContext`: the signed-in state, shared by handle
//! - `SessionStore`: restore on startup, login and logout
//! - `Registration`: account creation
//! - `TokenStore`: persisted bearer token (file, OS keychain or memory)
//!
//! Operations return outcome values; callers decide where to navigate.

pub mod credentials;
pub mod error;
pub mod register;
pub mod session;
pub mod store;
pub mod token_store;

pub use credentials::KeyringTokenStore;
pub use error::AuthError;
pub use register::{RegisterOutcome, Registration};
pub use session::{Session, SessionContext};
pub use store::{LoginOutcome, SessionStore};
pub use token_store::{FileTokenStore, MemoryTokenStore, PersistedToken, TokenStore};
