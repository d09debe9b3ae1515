//! Role gate extractors.
//!
//! Each protected handler takes an [`Authorized<G>`] argument where `G`
//! names the allowed role set. Extraction reloads the session's user on every
//! request, so role changes and deletions take effect immediately.

use std::marker::PhantomData;

use actix_session::SessionExt;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{AccessDecision, Error, Role, User, authorize};

use super::session::{FlashLevel, SessionContext};
use super::state::HttpState;

/// A set of roles allowed through a gate. Empty means any logged-in user.
pub trait RoleGate {
    const ALLOWED: &'static [Role];
}

macro_rules! role_gate {
    ($(#[$meta:meta])* $name:ident => [$($role:ident),*]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl RoleGate for $name {
            const ALLOWED: &'static [Role] = &[$(Role::$role),*];
        }
    };
}

role_gate!(
    /// Any authenticated user.
    LoggedIn => []
);
role_gate!(
    /// Administrators only.
    AdminOnly => [Admin]
);
role_gate!(
    /// Roles that create and edit inventory records.
    Editors => [Admin, It]
);
role_gate!(
    /// Roles that read inventory, reports and notifications.
    Viewers => [Admin, It, Manager]
);
role_gate!(
    /// Manager dashboard audience.
    ManagerDesk => [Admin, Manager]
);
role_gate!(
    /// Employee dashboard audience.
    EmployeeDesk => [Admin, Employee]
);

/// The caller, after passing gate `G`.
pub struct Authorized<G> {
    user: User,
    session: SessionContext,
    _gate: PhantomData<G>,
}

impl<G> Authorized<G> {
    /// The authenticated user.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// The caller's session, for flash messages.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }
}

/// Resolve the session's user; a stale id counts as logged out.
pub(crate) async fn current_user(
    state: &HttpState,
    session: &SessionContext,
) -> Result<Option<User>, Error> {
    match session.user_id() {
        Some(id) => state.identity.session_user(id).await,
        None => Ok(None),
    }
}

impl<G: RoleGate + 'static> FromRequest for Authorized<G> {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = SessionContext::new(req.get_session());
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not registered"))?;
            let user = current_user(&state, &session).await?;
            let decision = authorize(user.as_ref(), G::ALLOWED);
            if let AccessDecision::Denied { dashboard } = &decision {
                tracing::info!(dashboard, "role gate denied request");
                session.flash(FlashLevel::Danger, crate::domain::ACCESS_DENIED)?;
            }
            let granted = decision.into_result()?.clone();
            Ok(Self {
                user: granted,
                session,
                _gate: PhantomData,
            })
        })
    }
}
