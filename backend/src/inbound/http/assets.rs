//! Asset CRUD. The asset tag is fixed once created.

use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;

use crate::domain::{Asset, AssetId, AssetInput, Employee};

use super::ApiResult;
use super::gate::{Authorized, Editors, Viewers};
use super::session::{FlashLevel, Notice};
use super::state::HttpState;

/// Create/edit form: the record plus employees it can be assigned to.
#[derive(Debug, Clone, Serialize)]
pub struct AssetForm {
    pub action: &'static str,
    pub asset: Option<Asset>,
    pub employees: Vec<Employee>,
}

#[get("/assets")]
pub async fn list_assets(
    state: web::Data<HttpState>,
    _caller: Authorized<Viewers>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.inventory.list_assets().await?))
}

#[get("/assets/new")]
pub async fn new_asset_form(
    state: web::Data<HttpState>,
    _caller: Authorized<Editors>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(AssetForm {
        action: "Add",
        asset: None,
        employees: state.inventory.list_employees().await?,
    }))
}

#[post("/assets/new")]
pub async fn create_asset(
    state: web::Data<HttpState>,
    caller: Authorized<Editors>,
    payload: web::Json<AssetInput>,
) -> ApiResult<HttpResponse> {
    let session = caller.session();
    let asset = state
        .inventory
        .create_asset(payload.into_inner())
        .await
        .map_err(|err| session.flash_failure(err))?;
    session.flash(FlashLevel::Success, "Asset added")?;
    Ok(HttpResponse::Created().json(asset))
}

#[get("/assets/{id}/edit")]
pub async fn edit_asset_form(
    state: web::Data<HttpState>,
    _caller: Authorized<Editors>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let asset = state.inventory.asset(AssetId::new(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(AssetForm {
        action: "Edit",
        asset: Some(asset),
        employees: state.inventory.list_employees().await?,
    }))
}

#[post("/assets/{id}/edit")]
pub async fn update_asset(
    state: web::Data<HttpState>,
    caller: Authorized<Editors>,
    path: web::Path<i32>,
    payload: web::Json<AssetInput>,
) -> ApiResult<HttpResponse> {
    let session = caller.session();
    let asset = state
        .inventory
        .update_asset(AssetId::new(path.into_inner()), payload.into_inner())
        .await
        .map_err(|err| session.flash_failure(err))?;
    session.flash(FlashLevel::Success, "Asset updated")?;
    Ok(HttpResponse::Ok().json(asset))
}

/// Delete an asset; its maintenance history is kept, detached.
#[post("/assets/{id}/delete")]
pub async fn delete_asset(
    state: web::Data<HttpState>,
    caller: Authorized<Editors>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    state
        .inventory
        .delete_asset(AssetId::new(path.into_inner()))
        .await?;
    caller.session().flash(FlashLevel::Info, "Asset deleted")?;
    Ok(HttpResponse::Ok().json(Notice::new("Asset deleted")))
}
