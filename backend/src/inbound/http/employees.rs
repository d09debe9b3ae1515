//! Employee CRUD.

use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;

use crate::domain::{Employee, EmployeeId, EmployeeInput};

use super::ApiResult;
use super::gate::{Authorized, Editors, Viewers};
use super::session::{FlashLevel, Notice};
use super::state::HttpState;

/// Edit form: the current record.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeForm {
    pub action: &'static str,
    pub employee: Option<Employee>,
}

#[get("/employees")]
pub async fn list_employees(
    state: web::Data<HttpState>,
    _caller: Authorized<Viewers>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.inventory.list_employees().await?))
}

#[get("/employees/new")]
pub async fn new_employee_form(_caller: Authorized<Editors>) -> HttpResponse {
    HttpResponse::Ok().json(EmployeeForm {
        action: "Add",
        employee: None,
    })
}

#[post("/employees/new")]
pub async fn create_employee(
    state: web::Data<HttpState>,
    caller: Authorized<Editors>,
    payload: web::Json<EmployeeInput>,
) -> ApiResult<HttpResponse> {
    let session = caller.session();
    let employee = state
        .inventory
        .create_employee(payload.into_inner())
        .await
        .map_err(|err| session.flash_failure(err))?;
    session.flash(FlashLevel::Success, "Employee added")?;
    Ok(HttpResponse::Created().json(employee))
}

#[get("/employees/{id}/edit")]
pub async fn edit_employee_form(
    state: web::Data<HttpState>,
    _caller: Authorized<Editors>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let employee = state
        .inventory
        .employee(EmployeeId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(EmployeeForm {
        action: "Edit",
        employee: Some(employee),
    }))
}

#[post("/employees/{id}/edit")]
pub async fn update_employee(
    state: web::Data<HttpState>,
    caller: Authorized<Editors>,
    path: web::Path<i32>,
    payload: web::Json<EmployeeInput>,
) -> ApiResult<HttpResponse> {
    let session = caller.session();
    let employee = state
        .inventory
        .update_employee(EmployeeId::new(path.into_inner()), payload.into_inner())
        .await
        .map_err(|err| session.flash_failure(err))?;
    session.flash(FlashLevel::Success, "Employee updated")?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Delete an employee; their assets and licences become unassigned.
#[post("/employees/{id}/delete")]
pub async fn delete_employee(
    state: web::Data<HttpState>,
    caller: Authorized<Editors>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    state
        .inventory
        .delete_employee(EmployeeId::new(path.into_inner()))
        .await?;
    caller.session().flash(FlashLevel::Info, "Employee deleted")?;
    Ok(HttpResponse::Ok().json(Notice::new("Employee deleted")))
}
