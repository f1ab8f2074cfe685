//! `users-auth` — static bearer-token authentication.
//!
//! This crate is intentionally decoupled from HTTP and configuration loading.

pub mod identity;
pub mod token;

pub use identity::CallerIdentity;
pub use token::{AuthError, DEFAULT_DEV_TOKEN, TokenAllowList, parse_bearer};
