//! Role dashboards, the reports overview and the notifications centre.

use actix_web::{HttpResponse, get, web};

use super::ApiResult;
use super::gate::{AdminOnly, Authorized, Editors, EmployeeDesk, ManagerDesk, Viewers};
use super::state::HttpState;

#[get("/admin/dashboard")]
pub async fn admin_dashboard(
    state: web::Data<HttpState>,
    _caller: Authorized<AdminOnly>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.reports.admin_dashboard().await?))
}

#[get("/it/dashboard")]
pub async fn it_dashboard(
    state: web::Data<HttpState>,
    _caller: Authorized<Editors>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.reports.it_dashboard().await?))
}

#[get("/manager/dashboard")]
pub async fn manager_dashboard(
    state: web::Data<HttpState>,
    _caller: Authorized<ManagerDesk>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.reports.manager_dashboard().await?))
}

/// Assets of the employee whose contact matches the caller's email.
#[get("/employee/dashboard")]
pub async fn employee_dashboard(
    state: web::Data<HttpState>,
    caller: Authorized<EmployeeDesk>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.reports.employee_dashboard(caller.user()).await?))
}

#[get("/reports")]
pub async fn reports(
    state: web::Data<HttpState>,
    _caller: Authorized<Viewers>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.reports.overview().await?))
}

/// Licences and warranties expiring within the next 30 days.
#[get("/notifications")]
pub async fn notification_centre(
    state: web::Data<HttpState>,
    _caller: Authorized<Viewers>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.reports.notification_centre().await?))
}
