//! Integration tests for favorites, shopping cart and the shopping list

mod common;

use axum::http::StatusCode;
use common::{parse, unique, TestApp};
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_favorite_toggle() {
    let app = TestApp::new().await;
    let author = app.create_user().await;
    let fan = app.create_user().await;
    let recipe = app.create_simple_recipe(&author).await;
    let path = format!("/api/recipes/{}/favorite", recipe["id"].as_str().unwrap());

    let (status, body) = app.post_auth(&path, &fan.token, &json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    let body = parse(&body);
    assert_eq!(body["id"], recipe["id"]);
    assert_eq!(body["cooking_time"], 25);
    assert!(body.get("author").is_none());

    let (status, body) = app.post_auth(&path, &fan.token, &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse(&body)["error"]["field"], "recipe");

    let (status, _) = app.delete_auth(&path, &fan.token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.delete_auth(&path, &fan.token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_collections_on_unknown_recipe_are_404() {
    let app = TestApp::new().await;
    let user = app.create_user().await;
    let id = uuid::Uuid::new_v4();

    for kind in ["favorite", "shopping_cart"] {
        let path = format!("/api/recipes/{}/{}", id, kind);
        let (status, _) = app.post_auth(&path, &user.token, &json!({})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app.delete_auth(&path, &user.token).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_shopping_list_sums_ingredients() {
    let app = TestApp::new().await;
    let cook = app.create_user().await;
    let (tag, _) = app.create_tag().await;
    let marker = unique();
    let flour = app.create_ingredient(&format!("a-flour {}", marker), "g").await;
    let milk = app.create_ingredient(&format!("b-milk {}", marker), "ml").await;

    let pancakes = app
        .create_recipe(&cook, &[tag], &[(flour, 200), (milk, 300)])
        .await;
    let bread = app.create_recipe(&cook, &[tag], &[(flour, 500)]).await;

    for recipe in [&pancakes, &bread] {
        let (status, _) = app
            .post_auth(
                &format!("/api/recipes/{}/shopping_cart", recipe["id"].as_str().unwrap()),
                &cook.token,
                &json!({}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app
        .get_auth("/api/recipes/download_shopping_cart", &cook.token)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        format!(
            "a-flour {m} - 700 g\r\nb-milk {m} - 300 ml\r\n",
            m = marker
        )
    );

    let (_, detail) = app
        .get_auth(
            &format!("/api/recipes/{}", bread["id"].as_str().unwrap()),
            &cook.token,
        )
        .await;
    assert_eq!(parse(&detail)["is_in_shopping_cart"], true);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_empty_shopping_list() {
    let app = TestApp::new().await;
    let user = app.create_user().await;

    let (status, body) = app
        .get_auth("/api/recipes/download_shopping_cart", &user.token)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}
