//! Software licence CRUD.

use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;

use crate::domain::{Employee, LicenseId, LicenseInput, SoftwareLicense};

use super::ApiResult;
use super::gate::{Authorized, Editors, Viewers};
use super::session::{FlashLevel, Notice};
use super::state::HttpState;

#[derive(Debug, Clone, Serialize)]
pub struct LicenseForm {
    pub action: &'static str,
    pub license: Option<SoftwareLicense>,
    pub employees: Vec<Employee>,
}

#[get("/licenses")]
pub async fn list_licenses(
    state: web::Data<HttpState>,
    _caller: Authorized<Viewers>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.inventory.list_licenses().await?))
}

#[get("/licenses/new")]
pub async fn new_license_form(
    state: web::Data<HttpState>,
    _caller: Authorized<Editors>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(LicenseForm {
        action: "Add",
        license: None,
        employees: state.inventory.list_employees().await?,
    }))
}

#[post("/licenses/new")]
pub async fn create_license(
    state: web::Data<HttpState>,
    caller: Authorized<Editors>,
    payload: web::Json<LicenseInput>,
) -> ApiResult<HttpResponse> {
    let session = caller.session();
    let license = state
        .inventory
        .create_license(payload.into_inner())
        .await
        .map_err(|err| session.flash_failure(err))?;
    session.flash(FlashLevel::Success, "License added")?;
    Ok(HttpResponse::Created().json(license))
}

#[get("/licenses/{id}/edit")]
pub async fn edit_license_form(
    state: web::Data<HttpState>,
    _caller: Authorized<Editors>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let license = state
        .inventory
        .license(LicenseId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(LicenseForm {
        action: "Edit",
        license: Some(license),
        employees: state.inventory.list_employees().await?,
    }))
}

#[post("/licenses/{id}/edit")]
pub async fn update_license(
    state: web::Data<HttpState>,
    caller: Authorized<Editors>,
    path: web::Path<i32>,
    payload: web::Json<LicenseInput>,
) -> ApiResult<HttpResponse> {
    let session = caller.session();
    let license = state
        .inventory
        .update_license(LicenseId::new(path.into_inner()), payload.into_inner())
        .await
        .map_err(|err| session.flash_failure(err))?;
    session.flash(FlashLevel::Success, "License updated")?;
    Ok(HttpResponse::Ok().json(license))
}

#[post("/licenses/{id}/delete")]
pub async fn delete_license(
    state: web::Data<HttpState>,
    caller: Authorized<Editors>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    state
        .inventory
        .delete_license(LicenseId::new(path.into_inner()))
        .await?;
    caller.session().flash(FlashLevel::Info, "License deleted")?;
    Ok(HttpResponse::Ok().json(Notice::new("License deleted")))
}
