//! Maintenance records and their one-shot approval.

use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;

use crate::domain::{ApprovalOutcome, Asset, Maintenance, MaintenanceId, MaintenanceInput};

use super::ApiResult;
use super::gate::{AdminOnly, Authorized, Editors, Viewers};
use super::session::{FlashLevel, Notice};
use super::state::HttpState;

#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceForm {
    pub action: &'static str,
    pub maintenance: Option<Maintenance>,
    pub assets: Vec<Asset>,
}

/// Result of an approval request.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalResponse {
    pub message: &'static str,
    pub maintenance: Maintenance,
}

#[get("/maintenance")]
pub async fn list_maintenance(
    state: web::Data<HttpState>,
    _caller: Authorized<Viewers>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.inventory.list_maintenance().await?))
}

#[get("/maintenance/new")]
pub async fn new_maintenance_form(
    state: web::Data<HttpState>,
    _caller: Authorized<Editors>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(MaintenanceForm {
        action: "Add",
        maintenance: None,
        assets: state.inventory.list_assets().await?,
    }))
}

/// New records start out pending.
#[post("/maintenance/new")]
pub async fn create_maintenance(
    state: web::Data<HttpState>,
    caller: Authorized<Editors>,
    payload: web::Json<MaintenanceInput>,
) -> ApiResult<HttpResponse> {
    let session = caller.session();
    let record = state
        .inventory
        .create_maintenance(payload.into_inner())
        .await
        .map_err(|err| session.flash_failure(err))?;
    session.flash(FlashLevel::Success, "Maintenance record added")?;
    Ok(HttpResponse::Created().json(record))
}

#[get("/maintenance/{id}/edit")]
pub async fn edit_maintenance_form(
    state: web::Data<HttpState>,
    _caller: Authorized<Editors>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let record = state
        .inventory
        .maintenance(MaintenanceId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(MaintenanceForm {
        action: "Edit",
        maintenance: Some(record),
        assets: state.inventory.list_assets().await?,
    }))
}

#[post("/maintenance/{id}/edit")]
pub async fn update_maintenance(
    state: web::Data<HttpState>,
    caller: Authorized<Editors>,
    path: web::Path<i32>,
    payload: web::Json<MaintenanceInput>,
) -> ApiResult<HttpResponse> {
    let session = caller.session();
    let record = state
        .inventory
        .update_maintenance(MaintenanceId::new(path.into_inner()), payload.into_inner())
        .await
        .map_err(|err| session.flash_failure(err))?;
    session.flash(FlashLevel::Success, "Maintenance updated")?;
    Ok(HttpResponse::Ok().json(record))
}

/// Approve a pending record; a second approval changes nothing.
#[post("/maintenance/{id}/approve")]
pub async fn approve_maintenance(
    state: web::Data<HttpState>,
    caller: Authorized<AdminOnly>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let outcome = state
        .inventory
        .approve_maintenance(MaintenanceId::new(path.into_inner()), caller.user())
        .await?;
    let (level, message, maintenance) = match outcome {
        ApprovalOutcome::Approved(record) => (FlashLevel::Success, "Maintenance approved", record),
        ApprovalOutcome::AlreadyApproved(record) => (FlashLevel::Info, "Already approved", record),
    };
    caller.session().flash(level, message)?;
    Ok(HttpResponse::Ok().json(ApprovalResponse {
        message,
        maintenance,
    }))
}

#[post("/maintenance/{id}/delete")]
pub async fn delete_maintenance(
    state: web::Data<HttpState>,
    caller: Authorized<Editors>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    state
        .inventory
        .delete_maintenance(MaintenanceId::new(path.into_inner()))
        .await?;
    caller.session().flash(FlashLevel::Info, "Maintenance deleted")?;
    Ok(HttpResponse::Ok().json(Notice::new("Maintenance deleted")))
}
