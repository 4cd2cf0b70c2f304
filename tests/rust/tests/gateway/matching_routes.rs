//! Like, match, chat and unlink over HTTP

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use fitmatch_gateway::BillingSetup;
use serde_json::{json, Value};
use tests::http::TestApp;
use tests::mocks::{MockMatchingRepository, MockRepositories};
use tests::FakeBillingProvider;

fn app() -> TestApp {
    TestApp::new(BillingSetup::Provider(Arc::new(FakeBillingProvider::new())))
}

async fn like(app: &TestApp, token: &str, target: &str) -> (StatusCode, Value) {
    app.request(
        Method::POST,
        "/athletes/likes",
        Some(token),
        Some(json!({ "athleteId": target })),
    )
    .await
}

/// Two athletes who liked each other, plus the matching id
async fn matched_pair(app: &TestApp) -> ((String, String), (String, String), String) {
    let ana = app.signup("ana@example.com").await;
    let ben = app.signup("ben@example.com").await;

    let (status, first) = like(app, &ana.1, &ben.0).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["matched"], false);

    let (status, second) = like(app, &ben.1, &ana.0).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["matched"], true);
    assert_eq!(second["matching"]["status"], "ACTIVE");

    let matching_id = second["matching"]["id"].as_str().unwrap().to_string();
    (ana, ben, matching_id)
}

#[tokio::test]
async fn test_mutual_like_then_unlink() {
    let app = app();
    let (ana, ben, matching_id) = matched_pair(&app).await;

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/athletes/matching/{}/unlink", matching_id),
            Some(&ana.1),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], matching_id.as_str());
    assert_eq!(body["status"], "CLOSED");
    assert_eq!(body["interactedUser"], ana.0.as_str());
    assert_eq!(body["interactingUser"], ben.0.as_str());

    // Unlinking twice leaves it CLOSED
    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/athletes/matching/{}/unlink", matching_id),
            Some(&ben.1),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "CLOSED");
}

#[tokio::test]
async fn test_unlink_by_outsider_is_not_found() {
    let app = app();
    let (_, _, matching_id) = matched_pair(&app).await;
    let (_, outsider) = app.signup("cleo@example.com").await;

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/athletes/matching/{}/unlink", matching_id),
            Some(&outsider),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "matching.notFound");
    assert!(body["details"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unlink_with_malformed_id_is_not_found() {
    let app = app();
    let (_, token) = app.signup("ana@example.com").await;

    let (status, body) = app
        .request(
            Method::PUT,
            "/athletes/matching/12345/unlink",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "matching.notFound");
}

#[tokio::test]
async fn test_repeat_like_conflicts() {
    let app = app();
    let ana = app.signup("ana@example.com").await;
    let ben = app.signup("ben@example.com").await;

    like(&app, &ana.1, &ben.0).await;
    let (status, body) = like(&app, &ana.1, &ben.0).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "interaction.exists");
}

#[tokio::test]
async fn test_dislike_never_matches() {
    let app = app();
    let ana = app.signup("ana@example.com").await;
    let ben = app.signup("ben@example.com").await;

    like(&app, &ana.1, &ben.0).await;
    let (status, body) = app
        .request(
            Method::POST,
            "/athletes/dislikes",
            Some(&ben.1),
            Some(json!({ "athleteId": ana.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matched"], false);
    assert!(body.get("matching").is_none());
}

#[tokio::test]
async fn test_chat_open_only_while_active() {
    let app = app();
    let (ana, _ben, matching_id) = matched_pair(&app).await;
    let uri = format!("/chats/{}/messages", matching_id);

    let (status, body) = app
        .request(Method::POST, &uri, Some(&ana.1), Some(json!({ "message": "leg day?" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["chatId"], matching_id.as_str());
    assert_eq!(body["body"], "leg day?");

    app.request(
        Method::PUT,
        &format!("/athletes/matching/{}/unlink", matching_id),
        Some(&ana.1),
        None,
    )
    .await;

    let (status, body) = app
        .request(Method::POST, &uri, Some(&ana.1), Some(json!({ "message": "hello?" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "chat.notFound");
}

#[tokio::test]
async fn test_gym_unique_per_city() {
    let app = app();
    let (_, token) = app.signup("ana@example.com").await;
    let gym = json!({ "name": "Iron Temple", "address": "1 Main St", "city": "Lisbon" });

    let (status, _) = app
        .request(Method::POST, "/gyms", Some(&token), Some(gym.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .request(Method::POST, "/gyms", Some(&token), Some(gym))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "gym.exists");
}

#[tokio::test]
async fn test_concurrent_mutual_likes_match_once() {
    let repos = MockRepositories::new().with_matchings(MockMatchingRepository::yielding());
    let app = TestApp::from_builder(
        repos
            .builder()
            .with_billing_provider(Arc::new(FakeBillingProvider::new())),
    );
    let ana = app.signup("ana@example.com").await;
    let ben = app.signup("ben@example.com").await;

    let ((s1, first), (s2, second)) =
        futures::join!(like(&app, &ana.1, &ben.0), like(&app, &ben.1, &ana.0));
    assert_eq!(s1, StatusCode::OK);
    assert_eq!(s2, StatusCode::OK);

    // Exactly one side completes the match
    let matched = [&first, &second]
        .iter()
        .filter(|body| body["matched"] == true)
        .count();
    assert_eq!(matched, 1);
    assert_eq!(repos.matchings.active_count(), 1);
}
