//! Login account model.

use std::fmt;

use serde::Serialize;

use super::{Role, UserId};

/// Argon2 PHC string for a stored credential.
///
/// Never holds plaintext. `Debug` output is redacted so hashes stay out of
/// logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a [`crate::domain::ports::PasswordHasher`].
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded PHC string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Persisted login account.
///
/// ## Invariants
/// - `username` and `email` are trimmed, non-empty and globally unique
///   (uniqueness is enforced by the store).
///
/// # Examples
/// ```
/// use itam::domain::{PasswordHash, Role, User, UserId};
///
/// let user = User::new(
///     UserId::new(1),
///     "admin",
///     "admin@example.com",
///     PasswordHash::new("$argon2id$stub"),
///     Role::Admin,
/// );
/// assert_eq!(user.role().dashboard_path(), "/admin/dashboard");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    username: String,
    email: String,
    #[serde(skip)]
    password_hash: PasswordHash,
    role: Role,
}

impl User {
    /// Assemble a user from stored parts.
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: PasswordHash,
        role: Role,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            password_hash,
            role,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Login name.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Contact address; also used as notification sender and CC target.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Stored credential.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Current role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the user is Admin or IT.
    pub fn is_staff(&self) -> bool {
        Role::STAFF.contains(&self.role)
    }
}

/// Insert payload for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Login name, already trimmed.
    pub username: String,
    /// Contact address, already trimmed.
    pub email: String,
    /// Hashed credential.
    pub password_hash: PasswordHash,
    /// Initial role.
    pub role: Role,
}
