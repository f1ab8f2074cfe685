//! User directory domain module.
//!
//! Business rules for user records: the record shape, request validation,
//! listing/pagination and the storage seam. No HTTP, no process wiring.

pub mod listing;
pub mod store;
pub mod user;
pub mod validation;

pub use listing::{ListQuery, Page, paginate};
pub use store::{InMemoryUserStore, StoreError, UserStore};
pub use user::{CreateUserRequest, UpdateUserRequest, User};
pub use validation::{MAX_NAME_LENGTH, validate_create, validate_update};
