//! End-to-end login, dashboard dispatch and logout through the full app.

// Shared harness carries helpers this suite does not use.
#[allow(dead_code)]
mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use itam::domain::{Error, TRACE_ID_HEADER};
use itam::server::build_app;
use rstest::rstest;
use serde_json::Value;

use support::{World, get, location, login_request, session_cookie};

#[rstest]
#[case("admin", "admin-pass", "/admin/dashboard")]
#[case("it", "it-pass", "/it/dashboard")]
#[case("manager", "manager-pass", "/manager/dashboard")]
#[case("employee", "employee-pass", "/employee/dashboard")]
#[actix_rt::test]
async fn each_role_lands_on_its_dashboard(
    #[case] username: &str,
    #[case] password: &str,
    #[case] dashboard: &str,
) {
    let world = World::new().await;
    let app = test::init_service(build_app(world.deps())).await;

    let login = test::call_service(&app, login_request(username, password).to_request()).await;
    assert_eq!(login.status(), StatusCode::OK);
    assert!(login.headers().contains_key(TRACE_ID_HEADER));
    let cookie = session_cookie(&login);

    let res = test::call_service(&app, get("/dashboard", &cookie).to_request()).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some(dashboard));

    let res = test::call_service(&app, get(dashboard, &cookie).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn index_sends_anonymous_visitors_to_login() {
    let world = World::new().await;
    let app = test::init_service(build_app(world.deps())).await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/dashboard"));

    let res =
        test::call_service(&app, test::TestRequest::get().uri("/dashboard").to_request()).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/login"));
}

#[actix_web::test]
async fn rejected_login_carries_the_trace_id() {
    let world = World::new().await;
    let app = test::init_service(build_app(world.deps())).await;

    let res = test::call_service(&app, login_request("admin", "nope").to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Error = test::read_body_json(res).await;
    assert_eq!(body.message(), "Invalid password - Please try again");
    assert_eq!(body.trace_id(), Some(header.as_str()));
}

#[actix_web::test]
async fn logout_ends_the_session() {
    let world = World::new().await;
    let app = test::init_service(build_app(world.deps())).await;
    let login = test::call_service(&app, login_request("it", "it-pass").to_request()).await;
    let cookie = session_cookie(&login);

    let res = test::call_service(&app, get("/logout", &cookie).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res);

    let res = test::call_service(&app, get("/assets", &cookie).to_request()).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/login"));
}

#[actix_web::test]
async fn registered_accounts_can_log_in() {
    let world = World::new().await;
    let app = test::init_service(build_app(world.deps())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/register")
            .set_json(serde_json::json!({
                "username": "ama",
                "email": "ama@example.com",
                "password": "hunter22",
                "role": "Admin",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/register")
            .set_json(serde_json::json!({
                "username": "ama",
                "email": "ama@example.com",
                "password": "hunter22",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = test::call_service(&app, login_request("ama", "hunter22").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["dashboard"], "/employee/dashboard");
}
