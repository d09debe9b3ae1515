//! Role gates across the route table.
//!
//! Anonymous callers go to `/login`; authenticated callers without the role
//! go back to their own dashboard with an "Access denied" flash.

// Shared harness carries helpers this suite does not use.
#[allow(dead_code)]
mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use itam::server::build_app;
use rstest::rstest;
use serde_json::Value;

use support::{World, get, location, login_request, session_cookie};

#[rstest]
#[case("/admin/users", "admin", StatusCode::OK, None)]
#[case("/admin/users", "it", StatusCode::SEE_OTHER, Some("/it/dashboard"))]
#[case("/admin/dashboard", "manager", StatusCode::SEE_OTHER, Some("/manager/dashboard"))]
#[case("/it/dashboard", "it", StatusCode::OK, None)]
#[case("/it/dashboard", "employee", StatusCode::SEE_OTHER, Some("/employee/dashboard"))]
#[case("/manager/dashboard", "admin", StatusCode::OK, None)]
#[case("/manager/dashboard", "it", StatusCode::SEE_OTHER, Some("/it/dashboard"))]
#[case("/employee/dashboard", "admin", StatusCode::OK, None)]
#[case("/employee/dashboard", "manager", StatusCode::SEE_OTHER, Some("/manager/dashboard"))]
#[case("/employees", "manager", StatusCode::OK, None)]
#[case("/employees", "employee", StatusCode::SEE_OTHER, Some("/employee/dashboard"))]
#[case("/employees/new", "it", StatusCode::OK, None)]
#[case("/employees/new", "manager", StatusCode::SEE_OTHER, Some("/manager/dashboard"))]
#[case("/assets", "manager", StatusCode::OK, None)]
#[case("/licenses/new", "manager", StatusCode::SEE_OTHER, Some("/manager/dashboard"))]
#[case("/maintenance", "employee", StatusCode::SEE_OTHER, Some("/employee/dashboard"))]
#[case("/reports", "manager", StatusCode::OK, None)]
#[case("/reports", "employee", StatusCode::SEE_OTHER, Some("/employee/dashboard"))]
#[case("/notifications", "it", StatusCode::OK, None)]
#[case("/notifications/send", "employee", StatusCode::SEE_OTHER, Some("/employee/dashboard"))]
#[case("/export/assets/csv", "manager", StatusCode::OK, None)]
#[case("/export/assets/csv", "employee", StatusCode::SEE_OTHER, Some("/employee/dashboard"))]
#[actix_rt::test]
async fn gates_follow_the_role_table(
    #[case] uri: &str,
    #[case] username: &str,
    #[case] status: StatusCode,
    #[case] redirect: Option<&str>,
) {
    let world = World::new().await;
    let app = test::init_service(build_app(world.deps())).await;
    let password = format!("{username}-pass");
    let login = test::call_service(&app, login_request(username, &password).to_request()).await;
    let cookie = session_cookie(&login);

    let res = test::call_service(&app, get(uri, &cookie).to_request()).await;
    assert_eq!(res.status(), status, "{username} -> {uri}");
    assert_eq!(location(&res), redirect);
}

#[rstest]
#[case("/admin/users")]
#[case("/employees")]
#[case("/assets/new")]
#[case("/reports")]
#[case("/export/licenses/csv")]
#[case("/account/change-password")]
#[actix_rt::test]
async fn anonymous_callers_are_sent_to_login(#[case] uri: &str) {
    let world = World::new().await;
    let app = test::init_service(build_app(world.deps())).await;

    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/login"));
}

#[actix_web::test]
async fn denied_callers_see_an_access_denied_flash() {
    let world = World::new().await;
    let app = test::init_service(build_app(world.deps())).await;
    let login =
        test::call_service(&app, login_request("employee", "employee-pass").to_request()).await;
    let cookie = session_cookie(&login);

    let res = test::call_service(&app, get("/assets", &cookie).to_request()).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let cookie = session_cookie(&res);

    let res = test::call_service(&app, get("/messages", &cookie).to_request()).await;
    let flashes: Vec<Value> = test::read_body_json(res).await;
    assert_eq!(flashes.len(), 1);
    assert_eq!(flashes[0]["message"], "Access denied");
}

#[actix_web::test]
async fn only_admins_approve_maintenance() {
    let world = World::new().await;
    let app = test::init_service(build_app(world.deps())).await;
    let login = test::call_service(&app, login_request("it", "it-pass").to_request()).await;
    let cookie = session_cookie(&login);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/maintenance/1/approve")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/it/dashboard"));
}
