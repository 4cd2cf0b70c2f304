//! Error body shape for every failure class

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use fitmatch_gateway::{BillingSetup, ErrorResponse};
use serde_json::json;
use tests::fixtures::registration_body;
use tests::http::TestApp;
use tests::FakeBillingProvider;

fn app() -> TestApp {
    TestApp::new(BillingSetup::Provider(Arc::new(FakeBillingProvider::new())))
}

fn assert_error_shape(body: &serde_json::Value) -> ErrorResponse {
    let parsed: ErrorResponse =
        serde_json::from_value(body.clone()).expect("error body has error/error_description/details");
    assert!(body["details"].is_array());
    assert!(!parsed.error_description.is_empty());
    parsed
}

#[tokio::test]
async fn test_validation_error_lists_details() {
    let app = app();
    let mut body = registration_body("ana@example.com");
    body["password"] = json!("short");
    body["trainingDays"] = json!([]);

    let (status, response) = app.request(Method::POST, "/athletes", None, Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = assert_error_shape(&response);
    assert_eq!(error.error, "invalid_request");
    assert_eq!(error.details.len(), 2);
    assert!(error.details.iter().any(|d| d.contains("password")));
    assert!(error.details.iter().any(|d| d.contains("trainingDays")));
}

#[tokio::test]
async fn test_malformed_json_is_invalid_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/athletes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let (status, response) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = assert_error_shape(&response);
    assert_eq!(error.error, "invalid_request");
    assert_eq!(error.details.len(), 1);
}

#[tokio::test]
async fn test_unknown_enum_value_is_invalid_request() {
    let app = app();
    let mut body = registration_body("ana@example.com");
    body["gender"] = json!("UNSPECIFIED");

    let (status, response) = app.request(Method::POST, "/athletes", None, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(assert_error_shape(&response).error, "invalid_request");
}

#[tokio::test]
async fn test_duplicate_email_conflict() {
    let app = app();
    app.signup("ana@example.com").await;

    let (status, response) = app
        .request(
            Method::POST,
            "/athletes",
            None,
            Some(registration_body("ANA@example.com")),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(assert_error_shape(&response).error, "user.exists");
}

#[tokio::test]
async fn test_like_unknown_athlete_not_found() {
    let app = app();
    let (_, token) = app.signup("ana@example.com").await;

    let (status, response) = app
        .request(
            Method::POST,
            "/athletes/likes",
            Some(&token),
            Some(json!({ "athleteId": uuid::Uuid::new_v4() })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(assert_error_shape(&response).error, "user.notFound");
}

#[tokio::test]
async fn test_self_like_rejected() {
    let app = app();
    let (id, token) = app.signup("ana@example.com").await;

    let (status, response) = app
        .request(
            Method::POST,
            "/athletes/likes",
            Some(&token),
            Some(json!({ "athleteId": id })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(assert_error_shape(&response).error, "interaction.self");
}

#[tokio::test]
async fn test_message_to_unknown_chat() {
    let app = app();
    let (_, token) = app.signup("ana@example.com").await;

    for chat in ["not-a-uuid".to_string(), uuid::Uuid::new_v4().to_string()] {
        let (status, response) = app
            .request(
                Method::POST,
                &format!("/chats/{}/messages", chat),
                Some(&token),
                Some(json!({ "message": "hi" })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(assert_error_shape(&response).error, "chat.notFound");
    }
}
