//! Integration tests for user listing and subscriptions

mod common;

use axum::http::StatusCode;
use common::{parse, TestApp};
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_list_users_is_paginated() {
    let app = TestApp::new().await;
    app.create_user().await;
    app.create_user().await;

    let (status, body) = app.get("/api/users?page=1&limit=1").await;

    assert_eq!(status, StatusCode::OK);
    let body = parse(&body);
    assert_eq!(body["limit"], 1);
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert!(body["count"].as_i64().unwrap() >= 2);
    assert_eq!(body["has_more"], true);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_get_unknown_user_is_404() {
    let app = TestApp::new().await;

    let (status, body) = app
        .get(&format!("/api/users/{}", uuid::Uuid::new_v4()))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body)["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_subscribe_lifecycle() {
    let app = TestApp::new().await;
    let reader = app.create_user().await;
    let author = app.create_user().await;
    for _ in 0..3 {
        app.create_simple_recipe(&author).await;
    }
    let path = format!("/api/users/{}/subscribe?recipes_limit=2", author.id);

    let (status, body) = app.post_auth(&path, &reader.token, &json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    let body = parse(&body);
    assert_eq!(body["id"], author.id.to_string());
    assert_eq!(body["is_subscribed"], true);
    assert_eq!(body["recipes_count"], 3);
    assert_eq!(body["recipes"].as_array().unwrap().len(), 2);

    // Duplicate
    let (status, _) = app.post_auth(&path, &reader.token, &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Profile now shows the follow
    let (_, profile) = app
        .get_auth(&format!("/api/users/{}", author.id), &reader.token)
        .await;
    assert_eq!(parse(&profile)["is_subscribed"], true);

    let (status, body) = app
        .get_auth("/api/users/subscriptions?recipes_limit=1", &reader.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let body = parse(&body);
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["recipes"].as_array().unwrap().len(), 1);

    let delete_path = format!("/api/users/{}/subscribe", author.id);
    let (status, _) = app.delete_auth(&delete_path, &reader.token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.delete_auth(&delete_path, &reader.token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_cannot_subscribe_to_self() {
    let app = TestApp::new().await;
    let user = app.create_user().await;

    let (status, body) = app
        .post_auth(
            &format!("/api/users/{}/subscribe", user.id),
            &user.token,
            &json!({}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse(&body)["error"]["field"], "author");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_subscribe_to_unknown_user_is_404() {
    let app = TestApp::new().await;
    let user = app.create_user().await;

    let (status, _) = app
        .post_auth(
            &format!("/api/users/{}/subscribe", uuid::Uuid::new_v4()),
            &user.token,
            &json!({}),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
