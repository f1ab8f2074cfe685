//! User operations composed from validation and the store.

use std::sync::Arc;

use anyhow::anyhow;
use chrono::Utc;
use tracing::{debug, info};

use users_core::UserId;
use users_directory::{
    CreateUserRequest, InMemoryUserStore, ListQuery, Page, UpdateUserRequest, User, UserStore,
    paginate, validate_create, validate_update,
};

use crate::app::errors::ApiError;

/// Application services shared by every handler.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn UserStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Services over a fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryUserStore::new()))
    }

    pub fn list(&self, query: &ListQuery) -> Result<Page<User>, ApiError> {
        let snapshot = self.store.snapshot()?;
        Ok(paginate(snapshot, query))
    }

    pub fn get(&self, id: UserId) -> Result<User, ApiError> {
        self.store.get(&id)?.ok_or(ApiError::NotFound)
    }

    pub fn create(&self, request: Option<CreateUserRequest>) -> Result<User, ApiError> {
        let snapshot = self.store.snapshot()?;
        validate_create(request.as_ref(), &snapshot)?;
        let request = request.unwrap_or_default();

        let user = User::create(UserId::new(), &request, Utc::now());
        if !self.store.insert_if_absent(user.clone())? {
            return Err(ApiError::internal(anyhow!("user id collision: {}", user.id)));
        }

        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    /// Apply a partial update. Existence is checked before the request is validated.
    pub fn update(
        &self,
        id: UserId,
        request: Option<UpdateUserRequest>,
    ) -> Result<User, ApiError> {
        let existing = self.store.get(&id)?.ok_or(ApiError::NotFound)?;

        let snapshot = self.store.snapshot()?;
        validate_update(request.as_ref(), &snapshot, id)?;
        let request = request.unwrap_or_default();

        let updated = existing.with_changes(&request);
        self.store.put(updated.clone())?;

        debug!(user_id = %id, "user updated");
        Ok(updated)
    }

    pub fn delete(&self, id: UserId) -> Result<(), ApiError> {
        match self.store.remove(&id)? {
            Some(_) => {
                info!(user_id = %id, "user deleted");
                Ok(())
            }
            None => Err(ApiError::NotFound),
        }
    }

    /// Insert the demo users through the normal create path.
    pub fn seed_demo(&self) -> Result<usize, ApiError> {
        let demo = [
            ("Alice", "Smith", "alice@example.com"),
            ("Bob", "Jones", "bob.jones@example.com"),
        ];

        for (first, last, email) in demo {
            self.create(Some(CreateUserRequest {
                first_name: Some(first.to_string()),
                last_name: Some(last.to_string()),
                email: Some(email.to_string()),
            }))?;
        }

        Ok(demo.len())
    }
}
