//! Client-side routing.
//!
//! - `Route`: the known views and their access rules
//! - `guard`: the pure render-or-redirect policy
//! - `Navigator`: current location plus the transient navigation intent

pub mod guard;
pub mod navigator;
pub mod route;

pub use guard::{evaluate, post_login_destination, GuardDecision};
pub use navigator::{Navigation, Navigator};
pub use route::Route;
