use std::sync::{Arc, OnceLock};

use users_auth::CallerIdentity;

/// Authenticated caller for a request.
///
/// Inserted into request extensions by the auth stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    caller: CallerIdentity,
}

impl CallerContext {
    pub fn new(caller: CallerIdentity) -> Self {
        Self { caller }
    }

    pub fn caller(&self) -> &CallerIdentity {
        &self.caller
    }

    pub fn masked(&self) -> String {
        self.caller.masked()
    }
}

/// Write-once slot an outer stage places on the request so it can learn the
/// caller once inner stages finish, including when they unwind.
#[derive(Debug, Clone, Default)]
pub struct CallerSlot(Arc<OnceLock<CallerContext>>);

impl CallerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the caller. Later calls keep the first value.
    pub fn fill(&self, context: CallerContext) {
        let _ = self.0.set(context);
    }

    pub fn get(&self) -> Option<&CallerContext> {
        self.0.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_is_shared_between_clones_and_keeps_first_value() {
        let slot = CallerSlot::new();
        let inner = slot.clone();
        assert!(slot.get().is_none());

        inner.fill(CallerContext::new(CallerIdentity::new("first-1111")));
        inner.fill(CallerContext::new(CallerIdentity::new("second-2222")));

        assert_eq!(slot.get().map(CallerContext::masked).as_deref(), Some("***1111"));
    }
}
