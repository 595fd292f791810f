#[macro_use]
extern crate time_test;

use rocket::http::{Cookie, Status};
use rocket::local::asynchronous::Client;
use rocket::tokio;
use serde_json::json;

use carbon_api::models::Employee;
use carbon_api::orm::testing::{TEST_STAFF_EMAIL, TEST_STAFF_PASSWORD, test_rocket};

/// Helper to login and get session cookie
async fn login_and_get_session(client: &Client, email: &str, password: &str) -> Cookie<'static> {
    let response = client
        .post("/api/1/login")
        .json(&json!({ "email": email, "password": password }))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    response
        .cookies()
        .get("session")
        .expect("Session cookie should be set")
        .clone()
        .into_owned()
}

async fn create_employee(
    client: &Client,
    session: &Cookie<'static>,
    body: serde_json::Value,
) -> Employee {
    let response = client
        .post("/api/1/Employees")
        .json(&body)
        .cookie(session.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    response.into_json().await.expect("valid employee JSON")
}

#[tokio::test]
async fn test_create_employee_requires_superuser() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    time_test!("test_create_employee_requires_superuser");

    let body = json!({ "name": "Aarav Patel" });

    let response = client.post("/api/1/Employees").json(&body).dispatch().await;
    assert_eq!(response.status(), Status::Unauthorized);

    let staff = login_and_get_session(&client, TEST_STAFF_EMAIL, TEST_STAFF_PASSWORD).await;
    let response = client
        .post("/api/1/Employees")
        .json(&body)
        .cookie(staff)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);
    let error: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(error["error"], "Forbidden");
}

#[tokio::test]
async fn test_create_employee_defaults() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let admin = login_and_get_session(&client, "superadmin@example.com", "admin").await;

    let employee = create_employee(&client, &admin, json!({ "name": "Diya Sharma" })).await;
    assert!(employee.id > 0);
    assert_eq!(employee.name, "Diya Sharma");
    assert_eq!(employee.home_address, "Home");
    assert_eq!(employee.home_commute_distance_km, 10.0);
}

#[tokio::test]
async fn test_create_employee_blank_name_rejected() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let admin = login_and_get_session(&client, "superadmin@example.com", "admin").await;

    let response = client
        .post("/api/1/Employees")
        .json(&json!({ "name": "   " }))
        .cookie(admin)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[tokio::test]
async fn test_list_and_get_employees_are_public() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    time_test!("test_list_and_get_employees_are_public");
    let admin = login_and_get_session(&client, "superadmin@example.com", "admin").await;

    let first = create_employee(
        &client,
        &admin,
        json!({
            "name": "Rohan Gupta",
            "home_address": "Locality 7, Bengaluru",
            "home_commute_distance_km": 14.2
        }),
    )
    .await;
    create_employee(&client, &admin, json!({ "name": "Ananya Singh" })).await;

    let response = client.get("/api/1/Employees").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let employees: Vec<Employee> = response.into_json().await.unwrap();
    assert_eq!(employees.len(), 2);
    assert_eq!(employees[0], first);

    let response = client
        .get(format!("/api/1/Employees/{}", first.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let fetched: Employee = response.into_json().await.unwrap();
    assert_eq!(fetched.home_address, "Locality 7, Bengaluru");
    assert_eq!(fetched.home_commute_distance_km, 14.2);

    let response = client.get("/api/1/Employees/9999").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
}

#[tokio::test]
async fn test_update_employee() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let admin = login_and_get_session(&client, "superadmin@example.com", "admin").await;
    let employee = create_employee(&client, &admin, json!({ "name": "Vikram Malhotra" })).await;

    let response = client
        .put(format!("/api/1/Employees/{}", employee.id))
        .json(&json!({ "home_commute_distance_km": 22.5 }))
        .cookie(admin.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let updated: Employee = response.into_json().await.unwrap();
    assert_eq!(updated.name, "Vikram Malhotra");
    assert_eq!(updated.home_commute_distance_km, 22.5);

    let response = client
        .put("/api/1/Employees/9999")
        .json(&json!({ "name": "Nobody" }))
        .cookie(admin)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}

#[tokio::test]
async fn test_delete_employee_removes_logs() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    time_test!("test_delete_employee_removes_logs");
    let admin = login_and_get_session(&client, "superadmin@example.com", "admin").await;
    let employee = create_employee(&client, &admin, json!({ "name": "Temp Worker" })).await;

    let response = client
        .post("/api/1/DailyLogs")
        .json(&json!({ "employee_id": employee.id }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);

    let response = client
        .delete(format!("/api/1/Employees/{}", employee.id))
        .cookie(admin.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);

    let response = client
        .get(format!("/api/1/Employees/{}/DailyLogs", employee.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);

    // The company totals no longer include the removed log
    let response = client.get("/api/1/Dashboard").cookie(admin.clone()).dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let report: serde_json::Value = response.into_json().await.unwrap();
    assert_eq!(report["log_count"], 0);
    assert_eq!(report["employee_count"], 0);

    let response = client
        .delete(format!("/api/1/Employees/{}", employee.id))
        .cookie(admin)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}
