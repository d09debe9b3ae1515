//! Inventory create, edit, delete and approval through the HTTP surface.

// Shared harness carries helpers this suite does not use.
#[allow(dead_code)]
mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use itam::domain::Error;
use itam::server::build_app;
use serde_json::{Value, json};

use support::{World, get, login_request, post, session_cookie};

#[actix_web::test]
async fn employees_round_trip_through_the_forms() {
    let world = World::new().await;
    let app = test::init_service(build_app(world.deps())).await;
    let login = test::call_service(&app, login_request("it", "it-pass").to_request()).await;
    let cookie = session_cookie(&login);

    let res = test::call_service(
        &app,
        post(
            "/employees/new",
            &cookie,
            json!({"name": "  Ada Lovelace ", "department": "R&D", "contact": "ada@example.com"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(res).await;
    assert_eq!(created["name"], "Ada Lovelace");
    let id = created["id"].as_i64().expect("employee id");

    let res = test::call_service(
        &app,
        post(
            &format!("/employees/{id}/edit"),
            &cookie,
            json!({"name": "Ada King", "department": "", "contact": "ada@example.com"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(res).await;
    assert_eq!(updated["name"], "Ada King");
    assert!(updated["department"].is_null());

    let res = test::call_service(&app, get(&format!("/employees/{id}/edit"), &cookie).to_request())
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let form: Value = test::read_body_json(res).await;
    assert_eq!(form["action"], "Edit");

    let res = test::call_service(
        &app,
        post(&format!("/employees/{id}/delete"), &cookie, json!({})).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = test::call_service(&app, get("/employees", &cookie).to_request()).await;
    let employees: Vec<Value> = test::read_body_json(res).await;
    assert!(employees.is_empty());
}

#[actix_web::test]
async fn blank_employee_name_is_rejected() {
    let world = World::new().await;
    let app = test::init_service(build_app(world.deps())).await;
    let login = test::call_service(&app, login_request("admin", "admin-pass").to_request()).await;
    let cookie = session_cookie(&login);

    let res = test::call_service(
        &app,
        post("/employees/new", &cookie, json!({"name": "   "})).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Error = test::read_body_json(res).await;
    assert_eq!(body.message(), "Employee name is required");
}

#[actix_web::test]
async fn asset_tags_are_unique_and_assignment_is_cleared_on_employee_delete() {
    let world = World::new().await;
    let app = test::init_service(build_app(world.deps())).await;
    let login = test::call_service(&app, login_request("it", "it-pass").to_request()).await;
    let cookie = session_cookie(&login);

    let res = test::call_service(
        &app,
        post("/employees/new", &cookie, json!({"name": "Grace"})).to_request(),
    )
    .await;
    let employee: Value = test::read_body_json(res).await;
    let employee_id = employee["id"].as_i64().expect("employee id");

    let asset = json!({
        "assetTag": "LAP-001",
        "assetType": "Laptop",
        "brand": "Lenovo",
        "model": "T14",
        "serialNo": "SN-1",
        "purchaseDate": "2024-01-15",
        "warrantyExpiry": "2027-01-15",
        "status": "In Use",
        "assignedTo": employee_id,
    });
    let res =
        test::call_service(&app, post("/assets/new", &cookie, asset.clone()).to_request()).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(res).await;
    assert_eq!(created["assetTag"], "LAP-001");
    assert_eq!(created["warrantyExpiry"], "2027-01-15");
    assert_eq!(created["assignedTo"], employee_id);
    let asset_id = created["id"].as_i64().expect("asset id");

    let res = test::call_service(&app, post("/assets/new", &cookie, asset).to_request()).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Error = test::read_body_json(res).await;
    assert_eq!(body.message(), "Asset ID already exists");

    let res = test::call_service(
        &app,
        post("/assets/new", &cookie, json!({"assetTag": "LAP-002", "purchaseDate": "15/01/2024"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = test::call_service(
        &app,
        post(&format!("/employees/{employee_id}/delete"), &cookie, json!({})).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res =
        test::call_service(&app, get(&format!("/assets/{asset_id}/edit"), &cookie).to_request())
            .await;
    let form: Value = test::read_body_json(res).await;
    assert!(form["asset"]["assignedTo"].is_null());
}

#[actix_web::test]
async fn licenses_can_be_edited_and_deleted() {
    let world = World::new().await;
    let app = test::init_service(build_app(world.deps())).await;
    let login = test::call_service(&app, login_request("admin", "admin-pass").to_request()).await;
    let cookie = session_cookie(&login);

    let res = test::call_service(
        &app,
        post(
            "/licenses/new",
            &cookie,
            json!({"softwareName": "Office", "licenseKey": "KEY-1", "expiryDate": "2026-12-31"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(res).await;
    let id = created["id"].as_i64().expect("license id");

    let res = test::call_service(
        &app,
        post(
            &format!("/licenses/{id}/edit"),
            &cookie,
            json!({"softwareName": "Office 365", "expiryDate": ""}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(res).await;
    assert_eq!(updated["softwareName"], "Office 365");
    assert!(updated["expiryDate"].is_null());

    let res = test::call_service(
        &app,
        post(&format!("/licenses/{id}/delete"), &cookie, json!({})).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = test::call_service(
        &app,
        post(&format!("/licenses/{id}/delete"), &cookie, json!({})).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn maintenance_is_approved_exactly_once() {
    let world = World::new().await;
    let app = test::init_service(build_app(world.deps())).await;
    let login = test::call_service(&app, login_request("admin", "admin-pass").to_request()).await;
    let cookie = session_cookie(&login);

    let res = test::call_service(
        &app,
        post("/assets/new", &cookie, json!({"assetTag": "PRN-7"})).to_request(),
    )
    .await;
    let asset: Value = test::read_body_json(res).await;

    let res = test::call_service(
        &app,
        post(
            "/maintenance/new",
            &cookie,
            json!({
                "assetId": asset["id"],
                "date": "2025-03-01",
                "description": "Replace drum",
                "cost": "49.90",
            }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let record: Value = test::read_body_json(res).await;
    assert_eq!(record["status"], "Pending");
    assert_eq!(record["cost"], "49.90");
    let id = record["id"].as_i64().expect("maintenance id");

    let res = test::call_service(
        &app,
        post(&format!("/maintenance/{id}/approve"), &cookie, json!({})).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let first: Value = test::read_body_json(res).await;
    assert_eq!(first["message"], "Maintenance approved");
    assert_eq!(first["maintenance"]["status"], "Approved");
    assert_eq!(first["maintenance"]["approvedBy"], 1);

    let res = test::call_service(
        &app,
        post(&format!("/maintenance/{id}/approve"), &cookie, json!({})).to_request(),
    )
    .await;
    let second: Value = test::read_body_json(res).await;
    assert_eq!(second["message"], "Already approved");
    assert_eq!(
        second["maintenance"]["approvedAt"],
        first["maintenance"]["approvedAt"]
    );
}

#[actix_web::test]
async fn malformed_cost_is_a_bad_request() {
    let world = World::new().await;
    let app = test::init_service(build_app(world.deps())).await;
    let login = test::call_service(&app, login_request("it", "it-pass").to_request()).await;
    let cookie = session_cookie(&login);

    let res = test::call_service(
        &app,
        post("/maintenance/new", &cookie, json!({"cost": "twelve"})).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
