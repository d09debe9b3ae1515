//! Administrator user management.
//!
//! ```text
//! GET  /admin/users
//! POST /admin/users/{id}/role            {"role":"Manager"}
//! POST /admin/users/{id}/reset-password  {"password":"..."}
//! POST /admin/users/{id}/delete
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;

use crate::domain::{Error, Role, UserId};

use super::ApiResult;
use super::gate::{AdminOnly, Authorized};
use super::session::{FlashLevel, Notice};
use super::state::HttpState;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleRequest {
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub password: String,
}

#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    _caller: Authorized<AdminOnly>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.identity.list_users().await?))
}

#[post("/admin/users/{id}/role")]
pub async fn set_role(
    state: web::Data<HttpState>,
    caller: Authorized<AdminOnly>,
    path: web::Path<i32>,
    payload: web::Json<RoleRequest>,
) -> ApiResult<HttpResponse> {
    let session = caller.session();
    let role: Role = payload
        .role
        .trim()
        .parse()
        .map_err(|err: crate::domain::RoleParseError| {
            session.flash_failure(Error::invalid_request(err.to_string()))
        })?;
    let user = state
        .identity
        .set_role(UserId::new(path.into_inner()), role)
        .await
        .map_err(|err| session.flash_failure(err))?;
    session.flash(FlashLevel::Success, "User role updated")?;
    Ok(HttpResponse::Ok().json(user))
}

#[post("/admin/users/{id}/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    caller: Authorized<AdminOnly>,
    path: web::Path<i32>,
    payload: web::Json<ResetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let session = caller.session();
    state
        .identity
        .reset_password(UserId::new(path.into_inner()), &payload.password)
        .await
        .map_err(|err| session.flash_failure(err))?;
    session.flash(FlashLevel::Success, "Password reset successfully")?;
    Ok(HttpResponse::Ok().json(Notice::new("Password reset successfully")))
}

/// Delete another account; administrators cannot delete themselves.
#[post("/admin/users/{id}/delete")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    caller: Authorized<AdminOnly>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let session = caller.session();
    state
        .identity
        .delete_user(caller.user(), UserId::new(path.into_inner()))
        .await
        .map_err(|err| session.flash_failure(err))?;
    session.flash(FlashLevel::Info, "User deleted")?;
    Ok(HttpResponse::Ok().json(Notice::new("User deleted")))
}
