//! Authentication primitives: login credentials, registration and password
//! change requests, and the failures they can produce.
//!
//! Inbound adapters build these values from raw strings; the identity service
//! then only deals with validated input.

use zeroize::Zeroizing;

use super::{Error, Role};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

impl From<LoginValidationError> for Error {
    fn from(value: LoginValidationError) -> Self {
        Self::invalid_request(value.to_string())
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use itam::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("admin", "password").unwrap();
/// assert_eq!(creds.username(), "admin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Why a login attempt was rejected.
///
/// Both variants are reported distinctly; this is an internal tool and the
/// disclosure is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    /// No account with the supplied username.
    #[error("Invalid username - User not found")]
    UserNotFound,
    /// The password did not verify against the stored hash.
    #[error("Invalid password - Please try again")]
    BadCredential,
}

impl From<AuthFailure> for Error {
    fn from(value: AuthFailure) -> Self {
        Self::unauthorized(value.to_string())
    }
}

/// Rejections raised while validating registration input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// Username, email or password was blank.
    #[error("All fields are required")]
    MissingField,
    /// Password shorter than [`MIN_PASSWORD_LEN`].
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    /// Username or email already taken.
    #[error("User already exists")]
    AlreadyExists,
    /// Admin requested but no registration code is configured.
    #[error("Admin registration code not configured")]
    AdminCodeNotConfigured,
    /// Admin requested with the wrong code.
    #[error("Invalid admin registration code")]
    InvalidAdminCode,
}

impl From<RegistrationError> for Error {
    fn from(value: RegistrationError) -> Self {
        match value {
            RegistrationError::AlreadyExists => Self::conflict(value.to_string()),
            RegistrationError::AdminCodeNotConfigured | RegistrationError::InvalidAdminCode => {
                Self::forbidden(value.to_string())
            }
            RegistrationError::MissingField | RegistrationError::PasswordTooShort => {
                Self::invalid_request(value.to_string())
            }
        }
    }
}

/// Validated self-registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: String,
    email: String,
    password: Zeroizing<String>,
    admin_code: Option<Zeroizing<String>>,
}

impl Registration {
    /// Validate raw form input.
    ///
    /// `admin_code` is `Some` only when the caller asks for the Admin role;
    /// the code itself is trimmed before comparison.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
        admin_code: Option<&str>,
    ) -> Result<Self, RegistrationError> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(RegistrationError::MissingField);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(RegistrationError::PasswordTooShort);
        }
        Ok(Self {
            username: username.to_owned(),
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
            admin_code: admin_code.map(|code| Zeroizing::new(code.trim().to_owned())),
        })
    }

    /// Requested login name.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Requested contact address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Plaintext password, hashed before storage.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Resolve the role to grant against the configured admin code.
    ///
    /// Fails closed: without a configured code no Admin account can be
    /// self-registered, whatever the caller supplies.
    pub fn resolve_role(&self, configured_code: Option<&str>) -> Result<Role, RegistrationError> {
        let Some(supplied) = self.admin_code.as_ref() else {
            return Ok(Role::Employee);
        };
        let configured = configured_code
            .filter(|code| !code.is_empty())
            .ok_or(RegistrationError::AdminCodeNotConfigured)?;
        if supplied.as_str() == configured {
            Ok(Role::Admin)
        } else {
            Err(RegistrationError::InvalidAdminCode)
        }
    }
}

/// Rejections raised while changing one's own password, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PasswordChangeError {
    /// The current password did not verify.
    #[error("Current password is incorrect")]
    CurrentPasswordIncorrect,
    /// New password shorter than [`MIN_PASSWORD_LEN`].
    #[error("New password must be at least 8 characters")]
    NewPasswordTooShort,
    /// Confirmation did not match.
    #[error("New passwords do not match")]
    ConfirmationMismatch,
}

impl From<PasswordChangeError> for Error {
    fn from(value: PasswordChangeError) -> Self {
        Self::invalid_request(value.to_string())
    }
}

/// Raw password change form; checks are applied by the identity service so
/// that the current-password verification always runs first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    /// Password the caller claims is current.
    pub current: Zeroizing<String>,
    /// Replacement password.
    pub new: Zeroizing<String>,
    /// Repeat of the replacement.
    pub confirm: Zeroizing<String>,
}

impl PasswordChange {
    /// Build a change request from raw form strings.
    pub fn new(current: &str, new: &str, confirm: &str) -> Self {
        Self {
            current: Zeroizing::new(current.to_owned()),
            new: Zeroizing::new(new.to_owned()),
            confirm: Zeroizing::new(confirm.to_owned()),
        }
    }

    /// Length and confirmation checks, run after the current password verified.
    pub fn validate_replacement(&self) -> Result<(), PasswordChangeError> {
        if self.new.chars().count() < MIN_PASSWORD_LEN {
            return Err(PasswordChangeError::NewPasswordTooShort);
        }
        if self.new.as_str() != self.confirm.as_str() {
            return Err(PasswordChangeError::ConfirmationMismatch);
        }
        Ok(())
    }
}

/// Check an administrator-chosen replacement password.
pub fn validate_reset_password(password: &str) -> Result<(), Error> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::invalid_request("Password must be at least 8 characters"));
    }
    Ok(())
}
