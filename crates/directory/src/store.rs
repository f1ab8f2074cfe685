use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use users_core::UserId;

use crate::user::User;

/// Storage failure. Always a server-side fault, never the caller's.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A writer panicked while holding the lock; the map can no longer be trusted.
    #[error("user store lock poisoned")]
    Poisoned,
}

/// Concurrent user storage.
///
/// Implementations must be safe to call from many request tasks at once
/// without any locking by the caller.
pub trait UserStore: Send + Sync {
    /// Insert only if `user.id` is not present yet. Returns `false` on collision.
    fn insert_if_absent(&self, user: User) -> Result<bool, StoreError>;
    fn get(&self, id: &UserId) -> Result<Option<User>, StoreError>;
    /// Unconditionally write `user` under its own id.
    fn put(&self, user: User) -> Result<(), StoreError>;
    fn remove(&self, id: &UserId) -> Result<Option<User>, StoreError>;
    /// Point-in-time copy of every record. Later writes do not affect it.
    fn snapshot(&self) -> Result<Vec<User>, StoreError>;
}

impl<S> UserStore for Arc<S>
where
    S: UserStore + ?Sized,
{
    fn insert_if_absent(&self, user: User) -> Result<bool, StoreError> {
        (**self).insert_if_absent(user)
    }

    fn get(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        (**self).get(id)
    }

    fn put(&self, user: User) -> Result<(), StoreError> {
        (**self).put(user)
    }

    fn remove(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        (**self).remove(id)
    }

    fn snapshot(&self) -> Result<Vec<User>, StoreError> {
        (**self).snapshot()
    }
}

/// In-memory store. Contents are lost when the process exits.
#[derive(Debug)]
pub struct InMemoryUserStore {
    inner: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for InMemoryUserStore {
    fn insert_if_absent(&self, user: User) -> Result<bool, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        if map.contains_key(&user.id) {
            return Ok(false);
        }
        map.insert(user.id, user);
        Ok(true)
    }

    fn get(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(id).cloned())
    }

    fn put(&self, user: User) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        map.insert(user.id, user);
        Ok(())
    }

    fn remove(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(map.remove(id))
    }

    fn snapshot(&self) -> Result<Vec<User>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.values().cloned().collect())
    }
}
