/// An authenticated caller, identified by the token it presented.
///
/// `Debug` and `Display` never print the full token.
#[derive(Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    token: String,
}

impl CallerIdentity {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Last four characters of the token, for audit logs.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.token.chars().collect();
        let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
        format!("***{tail}")
    }

    /// Masked identity of an optional caller; `anonymous` when unauthenticated.
    pub fn masked_or_anonymous(caller: Option<&CallerIdentity>) -> String {
        caller.map_or_else(|| "anonymous".to_string(), CallerIdentity::masked)
    }
}

impl core::fmt::Debug for CallerIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CallerIdentity")
            .field("token", &self.masked())
            .finish()
    }
}

impl core::fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.masked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_all_but_last_four() {
        let caller = CallerIdentity::new("super-secret-1234");
        assert_eq!(caller.masked(), "***1234");
        assert_eq!(caller.to_string(), "***1234");
        assert!(!format!("{caller:?}").contains("super-secret"));
    }

    #[test]
    fn short_tokens_are_not_padded() {
        assert_eq!(CallerIdentity::new("ab").masked(), "***ab");
    }

    #[test]
    fn anonymous_when_missing() {
        assert_eq!(CallerIdentity::masked_or_anonymous(None), "anonymous");
        let caller = CallerIdentity::new("dev-token");
        assert_eq!(CallerIdentity::masked_or_anonymous(Some(&caller)), "***oken");
    }
}
