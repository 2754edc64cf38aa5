//! User repository trait defining the interface for user lookups.
//!
//! The settlement engine only reads users: to find the owner to notify and
//! to select active users for a settle-all run.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::User;
use crate::errors::DomainError;

/// Repository trait for User entity read operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with this ID
    /// * `Err(DomainError)` - Storage error
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// List all users with `active` status, oldest first
    async fn find_active(&self) -> Result<Vec<User>, DomainError>;
}
