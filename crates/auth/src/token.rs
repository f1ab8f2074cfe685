use std::collections::HashSet;

use thiserror::Error;

use crate::CallerIdentity;

/// Token accepted when no allow-list is configured. Development only.
pub const DEFAULT_DEV_TOKEN: &str = "dev-token";

/// Why a request failed authentication.
///
/// Callers see one uniform message; the variant is for server-side logs.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("authorization header missing")]
    MissingHeader,

    #[error("authorization header is not a bearer token")]
    Malformed,

    #[error("token not in allow-list")]
    UnknownToken,
}

/// Set of pre-shared bearer tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAllowList {
    tokens: HashSet<String>,
}

impl TokenAllowList {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|t| Into::<String>::into(t).trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Parse a comma-separated list. Blank entries are dropped.
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    /// The single development token.
    pub fn development() -> Self {
        Self::new([DEFAULT_DEV_TOKEN])
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Check an `Authorization` header value against the list.
    pub fn authenticate(&self, header: Option<&str>) -> Result<CallerIdentity, AuthError> {
        let token = parse_bearer(header.ok_or(AuthError::MissingHeader)?)?;
        if !self.contains(token) {
            return Err(AuthError::UnknownToken);
        }
        Ok(CallerIdentity::new(token))
    }
}

/// Extract the token from a `Bearer <token>` header value.
///
/// The scheme is matched case-insensitively.
pub fn parse_bearer(header: &str) -> Result<&str, AuthError> {
    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or(AuthError::Malformed)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::Malformed);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::Malformed);
    }

    Ok(token)
}
