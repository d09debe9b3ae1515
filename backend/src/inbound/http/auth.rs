//! Login, logout, registration and password changes.
//!
//! ```text
//! POST /login {"username":"admin","password":"ChangeMe123!"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{LoginCredentials, PasswordChange, Registration, Role, User};

use super::ApiResult;
use super::error::see_other;
use super::gate::{Authorized, LoggedIn, current_user};
use super::session::{FlashLevel, Notice, SessionContext};
use super::state::HttpState;

/// Where callers land after login or when already authenticated.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Shape of a form page: which fields the client should collect.
#[derive(Debug, Clone, Serialize)]
pub struct FormPage {
    pub form: &'static str,
    pub fields: &'static [&'static str],
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// `"Admin"` asks for the Admin role; anything else registers an Employee.
    pub role: Option<String>,
    pub admin_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Successful login: the account and its dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub dashboard: &'static str,
}

async fn already_logged_in(state: &HttpState, session: &SessionContext) -> ApiResult<bool> {
    Ok(current_user(state, session).await?.is_some())
}

fn to_dashboard() -> HttpResponse {
    see_other(DASHBOARD_PATH, Notice::new("Already logged in"))
}

#[get("/")]
pub async fn index() -> HttpResponse {
    see_other(DASHBOARD_PATH, Notice::new("See your dashboard"))
}

#[get("/login")]
pub async fn login_page(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    if already_logged_in(&state, &session).await? {
        return Ok(to_dashboard());
    }
    Ok(HttpResponse::Ok().json(FormPage {
        form: "login",
        fields: &["username", "password"],
    }))
}

/// Authenticate and store the user id in the session.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    if already_logged_in(&state, &session).await? {
        return Ok(to_dashboard());
    }
    let credentials = LoginCredentials::try_from_parts(&payload.username, &payload.password)
        .map_err(|err| session.flash_failure(err.into()))?;
    let user = state
        .identity
        .authenticate(&credentials)
        .await
        .map_err(|err| session.flash_failure(err))?;
    session.persist_user(user.id())?;
    let dashboard_path = user.role().dashboard_path();
    Ok(HttpResponse::Ok().json(LoginResponse {
        user,
        dashboard: dashboard_path,
    }))
}

#[get("/logout")]
pub async fn logout(caller: Authorized<LoggedIn>) -> ApiResult<HttpResponse> {
    let session = caller.session();
    session.clear();
    session.flash(FlashLevel::Info, "Logged out")?;
    tracing::info!(user_id = %caller.user().id(), "user logged out");
    Ok(HttpResponse::Ok().json(Notice::new("Logged out")))
}

#[get("/register")]
pub async fn register_page(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    if already_logged_in(&state, &session).await? {
        return Ok(to_dashboard());
    }
    Ok(HttpResponse::Ok().json(FormPage {
        form: "register",
        fields: &["username", "email", "password", "role", "adminCode"],
    }))
}

/// Self-registration. Admin requires the configured registration code.
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    if already_logged_in(&state, &session).await? {
        return Ok(to_dashboard());
    }
    let wants_admin = payload.role.as_deref() == Some(Role::Admin.as_str());
    let admin_code = wants_admin.then(|| payload.admin_code.as_deref().unwrap_or_default());
    let registration = Registration::try_from_parts(
        &payload.username,
        &payload.email,
        &payload.password,
        admin_code,
    )
    .map_err(|err| session.flash_failure(err.into()))?;
    let user = state
        .identity
        .register(&registration)
        .await
        .map_err(|err| session.flash_failure(err))?;
    session.flash(FlashLevel::Success, "Registered successfully, please login")?;
    Ok(HttpResponse::Created().json(user))
}

#[get("/account/change-password")]
pub async fn change_password_page(caller: Authorized<LoggedIn>) -> HttpResponse {
    tracing::debug!(user_id = %caller.user().id(), "password change form requested");
    HttpResponse::Ok().json(FormPage {
        form: "change-password",
        fields: &["currentPassword", "newPassword", "confirmPassword"],
    })
}

/// Verify the current password, then replace it.
#[post("/account/change-password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    caller: Authorized<LoggedIn>,
    payload: web::Json<ChangePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let change = PasswordChange::new(
        &payload.current_password,
        &payload.new_password,
        &payload.confirm_password,
    );
    state
        .identity
        .change_password(caller.user(), &change)
        .await
        .map_err(|err| caller.session().flash_failure(err))?;
    caller
        .session()
        .flash(FlashLevel::Success, "Password updated successfully")?;
    Ok(HttpResponse::Ok().json(Notice::new("Password updated successfully")))
}

/// Dispatch to the caller's role dashboard.
#[get("/dashboard")]
pub async fn dashboard(caller: Authorized<LoggedIn>) -> HttpResponse {
    let path = caller.user().role().dashboard_path();
    see_other(path, Notice::new(format!("Redirecting to {path}")))
}

/// Drain queued flash messages.
#[get("/messages")]
pub async fn messages(session: SessionContext) -> HttpResponse {
    HttpResponse::Ok().json(session.take_flashes())
}
