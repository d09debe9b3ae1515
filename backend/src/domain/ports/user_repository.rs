//! Port abstraction for login account persistence.
use async_trait::async_trait;

use crate::domain::{NewUser, PasswordHash, Role, User, UserId};

use super::StoreError;

/// Login account storage.
///
/// Lists are ordered by ascending id so "first Admin/IT user" is stable.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Fails with [`StoreError::Duplicate`] when the
    /// username or email is taken.
    async fn create(&self, user: &NewUser) -> Result<User, StoreError>;

    /// Insert, or overwrite email, role and hash of the account with the
    /// same username.
    async fn upsert_by_username(&self, user: &NewUser) -> Result<User, StoreError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Fetch an account by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Whether any account already uses `username` or `email`.
    async fn exists_with_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, StoreError>;

    /// All accounts.
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    /// Accounts holding any of `roles`.
    async fn list_by_roles(&self, roles: &[Role]) -> Result<Vec<User>, StoreError>;

    /// Change an account's role.
    async fn update_role(&self, id: UserId, role: Role) -> Result<User, StoreError>;

    /// Replace an account's credential.
    async fn update_password_hash(
        &self,
        id: UserId,
        hash: &PasswordHash,
    ) -> Result<(), StoreError>;

    /// Remove an account. Maintenance approvals by it keep their timestamp
    /// but lose the approver reference.
    async fn delete(&self, id: UserId) -> Result<(), StoreError>;
}
