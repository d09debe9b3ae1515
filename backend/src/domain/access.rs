//! Role gate decisions.
//!
//! Authentication failures (nobody logged in) and authorisation failures
//! (wrong role) lead to different places: the login page versus the caller's
//! own dashboard.

use super::{Error, Role, User};

/// Path unauthenticated callers are sent to.
pub const LOGIN_PATH: &str = "/login";

/// Message shown when a logged-in user hits a gate they do not pass.
pub const ACCESS_DENIED: &str = "Access denied";

/// Outcome of checking a caller against a role gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision<'a> {
    /// The caller may proceed.
    Granted(&'a User),
    /// No authenticated caller.
    LoginRequired,
    /// Authenticated but outside the gate; send them to their dashboard.
    Denied {
        /// Dashboard of the caller's own role.
        dashboard: &'static str,
    },
}

impl<'a> AccessDecision<'a> {
    /// Convert into the granted user or a redirecting error.
    pub fn into_result(self) -> Result<&'a User, Error> {
        match self {
            Self::Granted(user) => Ok(user),
            Self::LoginRequired => {
                Err(Error::unauthorized("Please log in to access this page")
                    .with_redirect(LOGIN_PATH))
            }
            Self::Denied { dashboard } => {
                Err(Error::forbidden(ACCESS_DENIED).with_redirect(dashboard))
            }
        }
    }
}

/// Check `user` against the `allowed` roles.
///
/// An empty `allowed` slice means "any authenticated user".
///
/// # Examples
/// ```
/// use itam::domain::{authorize, AccessDecision, PasswordHash, Role, User, UserId};
///
/// let user = User::new(UserId::new(4), "emp", "e@x.io", PasswordHash::new("h"), Role::Employee);
/// let decision = authorize(Some(&user), &[Role::Admin]);
/// assert_eq!(decision, AccessDecision::Denied { dashboard: "/employee/dashboard" });
/// ```
pub fn authorize<'a>(user: Option<&'a User>, allowed: &[Role]) -> AccessDecision<'a> {
    match user {
        None => AccessDecision::LoginRequired,
        Some(user) if allowed.is_empty() || allowed.contains(&user.role()) => {
            AccessDecision::Granted(user)
        }
        Some(user) => AccessDecision::Denied {
            dashboard: user.role().dashboard_path(),
        },
    }
}
