//! Company endpoint tests driven through the full router.

mod test_utils;

use axum::http::StatusCode;
use serde_json::json;
use test_utils::{send_request, setup_test_app};
use uuid::Uuid;

#[tokio::test]
async fn test_create_company_returns_201_with_generated_id() {
    let (_db, app) = setup_test_app().await.unwrap();

    let (status, body) = send_request(
        &app,
        "POST",
        "/api/companies",
        Some(json!({ "name": "Acme AB" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap();
    assert!(Uuid::parse_str(id).is_ok());
    assert_eq!(body["name"], "Acme AB");
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn test_create_company_without_name_is_400() {
    let (_db, app) = setup_test_app().await.unwrap();

    let (status, body) = send_request(
        &app,
        "POST",
        "/api/companies",
        Some(json!({ "business_type": "AB" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(body["details"]["fields"][0], "name");
}

#[tokio::test]
async fn test_create_company_with_bad_country_code_is_400() {
    let (_db, app) = setup_test_app().await.unwrap();

    let (status, body) = send_request(
        &app,
        "POST",
        "/api/companies",
        Some(json!({ "name": "Acme AB", "country_code": "sweden" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(
        body["details"]["violations"][0]["field"],
        "country_code"
    );
}

#[tokio::test]
async fn test_get_unknown_company_is_404_naming_the_entity() {
    let (_db, app) = setup_test_app().await.unwrap();

    let (status, body) = send_request(
        &app,
        "GET",
        &format!("/api/companies/{}", Uuid::new_v4()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["message"], "Company not found");
}

#[tokio::test]
async fn test_duplicate_tax_id_is_409() {
    let (_db, app) = setup_test_app().await.unwrap();

    let (status, _) = send_request(
        &app,
        "POST",
        "/api/companies",
        Some(json!({ "name": "Acme AB", "tax_id": "556000-0001" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_request(
        &app,
        "POST",
        "/api/companies",
        Some(json!({ "name": "Copycat AB", "tax_id": "556000-0001" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "UNIQUENESS_VIOLATION");
    assert_eq!(body["details"]["fields"][0], "tax_id");
}

#[tokio::test]
async fn test_listing_accounts_of_empty_company_is_200_with_empty_array() {
    let (_db, app) = setup_test_app().await.unwrap();

    let (status, body) = send_request(
        &app,
        "POST",
        "/api/companies",
        Some(json!({ "name": "Acme AB" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send_request(
        &app,
        "GET",
        &format!("/api/companies/{}/accounts", id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_update_and_delete_company_lifecycle() {
    let (_db, app) = setup_test_app().await.unwrap();

    let (_, created) = send_request(
        &app,
        "POST",
        "/api/companies",
        Some(json!({ "name": "Acme AB" })),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send_request(
        &app,
        "PUT",
        &format!("/api/companies/{}", id),
        Some(json!({ "business_type": "AB" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Acme AB");
    assert_eq!(updated["business_type"], "AB");
    assert_eq!(updated["id"], created["id"]);

    let (status, body) = send_request(&app, "DELETE", &format!("/api/companies/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = send_request(&app, "GET", &format!("/api/companies/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_json_body_is_400() {
    let (_db, app) = setup_test_app().await.unwrap();

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let request = Request::builder()
        .method("POST")
        .uri("/api/companies")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
