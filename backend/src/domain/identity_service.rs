//! Account use-cases: login, registration, password changes and the
//! administrator's user management.
//!
//! Plaintext passwords only ever reach the [`PasswordHasher`]; repositories
//! see hashes.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{PasswordHasher, StoreError, UserRepository};
use crate::domain::{
    AuthFailure, Error, LoginCredentials, NewUser, PasswordChange, PasswordChangeError,
    Registration, RegistrationError, Role, User, UserId, validate_reset_password,
};

/// Message returned when an administrator targets their own account.
pub const SELF_DELETE_FORBIDDEN: &str = "You cannot delete your own account";

/// Identity use-cases backed by the user repository and a password hasher.
#[derive(Clone)]
pub struct IdentityService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    admin_registration_code: Option<String>,
}

impl IdentityService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            users,
            hasher,
            admin_registration_code: None,
        }
    }

    /// Configure the code that unlocks Admin self-registration.
    #[must_use]
    pub fn with_admin_registration_code(mut self, code: Option<String>) -> Self {
        self.admin_registration_code = code;
        self
    }

    /// Check credentials, distinguishing unknown users from bad passwords.
    pub async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let user = self
            .users
            .find_by_username(credentials.username())
            .await?
            .ok_or(AuthFailure::UserNotFound)?;
        if !self
            .hasher
            .verify(credentials.password(), user.password_hash())?
        {
            return Err(AuthFailure::BadCredential.into());
        }
        info!(user_id = %user.id(), "user logged in");
        Ok(user)
    }

    /// Resolve a session's user id; `None` when the account has gone.
    pub async fn session_user(&self, id: UserId) -> Result<Option<User>, Error> {
        Ok(self.users.find_by_id(id).await?)
    }

    /// Create an account from a validated registration.
    pub async fn register(&self, registration: &Registration) -> Result<User, Error> {
        if self
            .users
            .exists_with_username_or_email(registration.username(), registration.email())
            .await?
        {
            return Err(RegistrationError::AlreadyExists.into());
        }
        let role = registration.resolve_role(self.admin_registration_code.as_deref())?;
        let new_user = NewUser {
            username: registration.username().to_owned(),
            email: registration.email().to_owned(),
            password_hash: self.hasher.hash(registration.password())?,
            role,
        };
        let user = self.users.create(&new_user).await.map_err(|err| match err {
            StoreError::Duplicate { .. } => RegistrationError::AlreadyExists.into(),
            other => Error::from(other),
        })?;
        info!(user_id = %user.id(), role = %user.role(), "user registered");
        Ok(user)
    }

    /// Replace the caller's password after verifying the current one.
    pub async fn change_password(&self, user: &User, change: &PasswordChange) -> Result<(), Error> {
        if !self.hasher.verify(&change.current, user.password_hash())? {
            return Err(PasswordChangeError::CurrentPasswordIncorrect.into());
        }
        change.validate_replacement()?;
        let hash = self.hasher.hash(&change.new)?;
        self.users.update_password_hash(user.id(), &hash).await?;
        info!(user_id = %user.id(), "password changed");
        Ok(())
    }

    /// All accounts in id order.
    pub async fn list_users(&self) -> Result<Vec<User>, Error> {
        Ok(self.users.list().await?)
    }

    /// Change another account's role.
    pub async fn set_role(&self, id: UserId, role: Role) -> Result<User, Error> {
        let user = self.users.update_role(id, role).await?;
        info!(user_id = %id, role = %role, "user role updated");
        Ok(user)
    }

    /// Set a new password chosen by an administrator.
    pub async fn reset_password(&self, id: UserId, password: &str) -> Result<(), Error> {
        self.require_user(id).await?;
        validate_reset_password(password)?;
        let hash = self.hasher.hash(password)?;
        self.users.update_password_hash(id, &hash).await?;
        info!(user_id = %id, "password reset by administrator");
        Ok(())
    }

    /// Delete an account other than the caller's own.
    pub async fn delete_user(&self, actor: &User, id: UserId) -> Result<(), Error> {
        self.require_user(id).await?;
        if actor.id() == id {
            return Err(Error::forbidden(SELF_DELETE_FORBIDDEN));
        }
        self.users.delete(id).await?;
        info!(user_id = %id, actor = %actor.id(), "user deleted");
        Ok(())
    }

    /// Create or refresh a seeded account, resetting its password and role.
    pub async fn upsert_account(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, Error> {
        let new_user = NewUser {
            username: username.trim().to_owned(),
            email: email.trim().to_owned(),
            password_hash: self.hasher.hash(password)?,
            role,
        };
        Ok(self.users.upsert_by_username(&new_user).await?)
    }

    async fn require_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::PasswordHash;
    use crate::domain::ports::{MockPasswordHasher, MockUserRepository};
    use rstest::rstest;

    fn stored(id: i32, username: &str, role: Role) -> User {
        User::new(
            UserId::new(id),
            username,
            format!("{username}@example.com"),
            PasswordHash::new(format!("hash:{username}-secret")),
            role,
        )
    }

    /// Hasher double: `hash(p)` is `hash:p` and verification compares that.
    fn prefix_hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|password| Ok(PasswordHash::new(format!("hash:{password}"))));
        hasher
            .expect_verify()
            .returning(|password, hash| Ok(hash.as_str() == format!("hash:{password}")));
        hasher
    }

    fn service(users: MockUserRepository) -> IdentityService {
        IdentityService::new(Arc::new(users), Arc::new(prefix_hasher()))
    }

    fn credentials(username: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(username, password).expect("valid credentials")
    }

    #[tokio::test]
    async fn authenticate_accepts_matching_hash() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .withf(|name| name == "ama")
            .returning(|_| Ok(Some(stored(1, "ama", Role::It))));

        let user = service(users)
            .authenticate(&credentials("ama", "ama-secret"))
            .await
            .expect("login succeeds");
        assert_eq!(user.id(), UserId::new(1));
    }

    #[rstest]
    #[case(None, "Invalid username - User not found")]
    #[case(Some(stored(1, "ama", Role::It)), "Invalid password - Please try again")]
    #[tokio::test]
    async fn authenticate_reports_distinct_failures(
        #[case] found: Option<User>,
        #[case] message: &str,
    ) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(move |_| Ok(found.clone()));

        let err = service(users)
            .authenticate(&credentials("ama", "wrong-password"))
            .await
            .expect_err("login fails");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), message);
    }

    #[tokio::test]
    async fn register_rejects_existing_user_before_hashing() {
        let mut users = MockUserRepository::new();
        users
            .expect_exists_with_username_or_email()
            .returning(|_, _| Ok(true));
        users.expect_create().never();
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().never();
        let service = IdentityService::new(Arc::new(users), Arc::new(hasher));
        let registration =
            Registration::try_from_parts("ama", "ama@example.com", "long-enough", None)
                .expect("valid form");

        let err = service.register(&registration).await.expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), "User already exists");
    }

    #[rstest]
    #[case(None, Some("letmein"), Err("Admin registration code not configured"))]
    #[case(Some("s3cret"), Some("wrong"), Err("Invalid admin registration code"))]
    #[case(Some("s3cret"), Some("s3cret"), Ok(Role::Admin))]
    #[case(Some("s3cret"), None, Ok(Role::Employee))]
    #[tokio::test]
    async fn admin_registration_requires_configured_code(
        #[case] configured: Option<&'static str>,
        #[case] supplied: Option<&'static str>,
        #[case] expected: Result<Role, &'static str>,
    ) {
        let mut users = MockUserRepository::new();
        users
            .expect_exists_with_username_or_email()
            .returning(|_, _| Ok(false));
        users.expect_create().returning(|new_user| {
            Ok(User::new(
                UserId::new(5),
                new_user.username.clone(),
                new_user.email.clone(),
                new_user.password_hash.clone(),
                new_user.role,
            ))
        });
        let service =
            service(users).with_admin_registration_code(configured.map(str::to_owned));
        let registration =
            Registration::try_from_parts("kofi", "kofi@example.com", "long-enough", supplied)
                .expect("valid form");

        let outcome = service
            .register(&registration)
            .await
            .map(|user| user.role())
            .map_err(|err| err.message().to_owned());
        assert_eq!(outcome, expected.map_err(str::to_owned));
    }

    #[rstest]
    #[case("wrong", "new-password", "new-password", "Current password is incorrect")]
    #[case("ama-secret", "short", "short", "New password must be at least 8 characters")]
    #[case("ama-secret", "new-password", "other-password", "New passwords do not match")]
    #[tokio::test]
    async fn change_password_checks_in_order(
        #[case] current: &str,
        #[case] new: &str,
        #[case] confirm: &str,
        #[case] message: &str,
    ) {
        let mut users = MockUserRepository::new();
        users.expect_update_password_hash().never();
        let user = stored(1, "ama", Role::Employee);

        let err = service(users)
            .change_password(&user, &PasswordChange::new(current, new, confirm))
            .await
            .expect_err("rejected");
        assert_eq!(err.message(), message);
    }

    #[tokio::test]
    async fn change_password_stores_new_hash() {
        let mut users = MockUserRepository::new();
        users
            .expect_update_password_hash()
            .withf(|id, hash| *id == UserId::new(1) && hash.as_str() == "hash:new-password")
            .times(1)
            .returning(|_, _| Ok(()));
        let user = stored(1, "ama", Role::Employee);

        service(users)
            .change_password(
                &user,
                &PasswordChange::new("ama-secret", "new-password", "new-password"),
            )
            .await
            .expect("password changed");
    }

    #[tokio::test]
    async fn admins_cannot_delete_themselves() {
        let admin = stored(1, "root", Role::Admin);
        let found = admin.clone();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        users.expect_delete().never();

        let err = service(users)
            .delete_user(&admin, UserId::new(1))
            .await
            .expect_err("self delete refused");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.message(), SELF_DELETE_FORBIDDEN);
    }

    #[tokio::test]
    async fn deleting_missing_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let err = service(users)
            .delete_user(&stored(1, "root", Role::Admin), UserId::new(9))
            .await
            .expect_err("missing user");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn reset_password_enforces_length() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|_| Ok(Some(stored(2, "kofi", Role::Employee))));
        users.expect_update_password_hash().never();

        let err = service(users)
            .reset_password(UserId::new(2), "short")
            .await
            .expect_err("too short");
        assert_eq!(err.message(), "Password must be at least 8 characters");
    }
}
