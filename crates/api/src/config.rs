//! Runtime configuration for the API process.

use std::net::SocketAddr;

use anyhow::Context;

use users_auth::TokenAllowList;

pub const TOKENS_ENV: &str = "USERS_API_TOKENS";
pub const DEV_MODE_ENV: &str = "USERS_API_DEV_MODE";
pub const BIND_ENV: &str = "USERS_API_BIND";
pub const SEED_ENV: &str = "USERS_API_SEED";

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Path prefixes that skip authentication, in development mode only.
pub const DEV_EXEMPT_PREFIXES: &[&str] = &["/health", "/docs", "/swagger", "/openapi"];

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub tokens: TokenAllowList,
    pub dev_mode: bool,
    pub bind_addr: SocketAddr,
    /// Seed a couple of demo users at startup.
    pub seed: bool,
}

impl ApiConfig {
    /// Config for tests and embedding: the given tokens, production mode, no seed.
    pub fn with_tokens(tokens: TokenAllowList) -> Self {
        Self {
            tokens,
            dev_mode: false,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            seed: false,
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in `from_env`).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let tokens = match lookup(TOKENS_ENV).map(|raw| TokenAllowList::parse(&raw)) {
            Some(list) if !list.is_empty() => list,
            _ => {
                tracing::warn!("{TOKENS_ENV} not set; accepting only the insecure dev token");
                TokenAllowList::development()
            }
        };

        let bind = lookup(BIND_ENV).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind
            .trim()
            .parse()
            .with_context(|| format!("{BIND_ENV} is not a socket address: {bind}"))?;

        Ok(Self {
            tokens,
            dev_mode: lookup(DEV_MODE_ENV).is_some_and(|v| parse_flag(&v)),
            bind_addr,
            seed: lookup(SEED_ENV).is_some_and(|v| parse_flag(&v)),
        })
    }

    /// Whether `path` may skip authentication under this config.
    pub fn is_exempt(&self, path: &str) -> bool {
        self.dev_mode && DEV_EXEMPT_PREFIXES.iter().any(|p| is_under(path, p))
    }
}

/// `path` is `prefix` itself or a path below it (`prefix/...`).
fn is_under(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
