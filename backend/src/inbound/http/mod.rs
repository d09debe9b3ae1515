//! HTTP inbound adapter exposing the JSON endpoints.
//!
//! Handlers only depend on [`state::HttpState`]; [`configure`] registers every
//! route so the server and the integration tests mount the same surface.

pub mod assets;
pub mod auth;
pub mod dashboards;
pub mod employees;
pub mod error;
pub mod export;
pub mod gate;
pub mod health;
pub mod licenses;
pub mod maintenance;
pub mod notifications;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::web;

use crate::domain::Error;

pub use error::ApiResult;

/// Register extractor error mapping and every application route.
///
/// Health probes are mounted separately because they need
/// [`health::HealthState`] rather than the session.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid request body: {err}")).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|_err, _req| {
        Error::not_found("not found").into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid query string: {err}")).into()
    }))
    .service(auth::index)
    .service(auth::login_page)
    .service(auth::login)
    .service(auth::logout)
    .service(auth::register_page)
    .service(auth::register)
    .service(auth::change_password_page)
    .service(auth::change_password)
    .service(auth::dashboard)
    .service(auth::messages)
    .service(dashboards::admin_dashboard)
    .service(dashboards::it_dashboard)
    .service(dashboards::manager_dashboard)
    .service(dashboards::employee_dashboard)
    .service(dashboards::reports)
    .service(dashboards::notification_centre)
    .service(users::list_users)
    .service(users::set_role)
    .service(users::reset_password)
    .service(users::delete_user)
    .service(employees::list_employees)
    .service(employees::new_employee_form)
    .service(employees::create_employee)
    .service(employees::edit_employee_form)
    .service(employees::update_employee)
    .service(employees::delete_employee)
    .service(assets::list_assets)
    .service(assets::new_asset_form)
    .service(assets::create_asset)
    .service(assets::edit_asset_form)
    .service(assets::update_asset)
    .service(assets::delete_asset)
    .service(maintenance::list_maintenance)
    .service(maintenance::new_maintenance_form)
    .service(maintenance::create_maintenance)
    .service(maintenance::edit_maintenance_form)
    .service(maintenance::update_maintenance)
    .service(maintenance::approve_maintenance)
    .service(maintenance::delete_maintenance)
    .service(licenses::list_licenses)
    .service(licenses::new_license_form)
    .service(licenses::create_license)
    .service(licenses::edit_license_form)
    .service(licenses::update_license)
    .service(licenses::delete_license)
    .service(export::export_table)
    .service(notifications::send_form)
    .service(notifications::send_notifications)
    .service(notifications::test_license)
    .service(notifications::test_warranty);
}
