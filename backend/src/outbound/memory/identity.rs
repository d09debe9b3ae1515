//! `UserRepository` over the in-memory tables.

use async_trait::async_trait;

use super::{MemoryStore, Tables};
use crate::domain::ports::{StoreError, UserRepository};
use crate::domain::{Approval, NewUser, PasswordHash, Role, User, UserId};

const USER_EXISTS: &str = "User already exists";

fn clashes(tables: &Tables, username: &str, email: &str, except: Option<UserId>) -> bool {
    tables.users.rows.values().any(|user| {
        Some(user.id()) != except && (user.username() == username || user.email() == email)
    })
}

fn rebuild(user: &User, hash: PasswordHash, role: Role) -> User {
    User::new(user.id(), user.username(), user.email(), hash, role)
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables()?;
        if clashes(&tables, &user.username, &user.email, None) {
            return Err(StoreError::duplicate(USER_EXISTS));
        }
        let id = UserId::new(tables.users.allocate());
        let created = User::new(
            id,
            user.username.clone(),
            user.email.clone(),
            user.password_hash.clone(),
            user.role,
        );
        tables.users.rows.insert(id.get(), created.clone());
        Ok(created)
    }

    async fn upsert_by_username(&self, user: &NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables()?;
        let existing = tables
            .users
            .rows
            .values()
            .find(|row| row.username() == user.username)
            .map(User::id);
        if clashes(&tables, &user.username, &user.email, existing) {
            return Err(StoreError::duplicate(USER_EXISTS));
        }
        let id = match existing {
            Some(id) => id,
            None => UserId::new(tables.users.allocate()),
        };
        let row = User::new(
            id,
            user.username.clone(),
            user.email.clone(),
            user.password_hash.clone(),
            user.role,
        );
        tables.users.rows.insert(id.get(), row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.tables()?.users.rows.get(&id.get()).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .tables()?
            .users
            .rows
            .values()
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn exists_with_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, StoreError> {
        let tables = self.tables()?;
        Ok(clashes(&tables, username, email, None))
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables()?.users.rows.values().cloned().collect())
    }

    async fn list_by_roles(&self, roles: &[Role]) -> Result<Vec<User>, StoreError> {
        Ok(self
            .tables()?
            .users
            .rows
            .values()
            .filter(|user| roles.contains(&user.role()))
            .cloned()
            .collect())
    }

    async fn update_role(&self, id: UserId, role: Role) -> Result<User, StoreError> {
        let mut tables = self.tables()?;
        let row = tables.users.require_mut(id.get(), "User")?;
        *row = rebuild(row, row.password_hash().clone(), role);
        Ok(row.clone())
    }

    async fn update_password_hash(
        &self,
        id: UserId,
        hash: &PasswordHash,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        let row = tables.users.require_mut(id.get(), "User")?;
        *row = rebuild(row, hash.clone(), row.role());
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        tables.users.remove(id.get(), "User")?;
        for record in tables.maintenance.rows.values_mut() {
            if let Approval::Approved { by, .. } = &mut record.approval {
                if *by == Some(id) {
                    *by = None;
                }
            }
        }
        Ok(())
    }
}
