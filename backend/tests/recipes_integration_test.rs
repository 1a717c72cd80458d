//! Integration tests for recipe CRUD and listing filters

mod common;

use axum::http::StatusCode;
use common::{parse, unique, TestApp};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_recipe_returns_full_representation() {
    let app = TestApp::new().await;
    let author = app.create_user().await;
    let (tag, slug) = app.create_tag().await;
    let flour = app.create_ingredient(&format!("flour {}", unique()), "g").await;

    let recipe = app.create_recipe(&author, &[tag], &[(flour, 250)]).await;

    assert_eq!(recipe["author"]["id"], author.id.to_string());
    assert_eq!(recipe["tags"][0]["slug"], slug);
    assert_eq!(recipe["ingredients"][0]["id"], flour.to_string());
    assert_eq!(recipe["ingredients"][0]["measurement_unit"], "g");
    assert_eq!(recipe["ingredients"][0]["amount"], 250);
    assert_eq!(recipe["is_favorited"], false);
    assert_eq!(recipe["is_in_shopping_cart"], false);
    assert_eq!(recipe["cooking_time"], 25);

    // Anonymous detail view
    let (status, body) = app
        .get(&format!("/api/recipes/{}", recipe["id"].as_str().unwrap()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body)["name"], recipe["name"]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_recipe_validation() {
    let app = TestApp::new().await;
    let author = app.create_user().await;
    let (tag, _) = app.create_tag().await;
    let salt = app.create_ingredient(&format!("salt {}", unique()), "pinch").await;

    let cases = [
        ("cooking_time", {
            let mut body = TestApp::recipe_body(&[tag], &[(salt, 1)]);
            body["cooking_time"] = json!(0);
            body
        }),
        ("ingredients", TestApp::recipe_body(&[tag], &[(salt, 0)])),
        ("ingredients", TestApp::recipe_body(&[tag], &[(salt, 1), (salt, 2)])),
        ("ingredients", TestApp::recipe_body(&[tag], &[(Uuid::new_v4(), 1)])),
        ("ingredients", TestApp::recipe_body(&[tag], &[])),
        ("tags", TestApp::recipe_body(&[Uuid::new_v4()], &[(salt, 1)])),
        ("tags", TestApp::recipe_body(&[tag, tag], &[(salt, 1)])),
        ("tags", TestApp::recipe_body(&[], &[(salt, 1)])),
    ];

    for (field, body) in cases {
        let (status, response) = app.post_auth("/api/recipes", &author.token, &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(parse(&response)["error"]["field"], field, "body: {}", body);
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_duplicate_recipe_name_rejected() {
    let app = TestApp::new().await;
    let author = app.create_user().await;
    let recipe = app.create_simple_recipe(&author).await;
    let (tag, _) = app.create_tag().await;
    let egg = app.create_ingredient(&format!("egg {}", unique()), "pcs").await;

    let mut body = TestApp::recipe_body(&[tag], &[(egg, 2)]);
    body["name"] = recipe["name"].clone();
    let (status, response) = app.post_auth("/api/recipes", &author.token, &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse(&response)["error"]["field"], "name");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_only_author_may_modify() {
    let app = TestApp::new().await;
    let author = app.create_user().await;
    let stranger = app.create_user().await;
    let recipe = app.create_simple_recipe(&author).await;
    let path = format!("/api/recipes/{}", recipe["id"].as_str().unwrap());

    let (tag, _) = app.create_tag().await;
    let butter = app.create_ingredient(&format!("butter {}", unique()), "g").await;
    let body = TestApp::recipe_body(&[tag], &[(butter, 50)]);

    let (status, _) = app.patch_auth(&path, &stranger.token, &body).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.delete_auth(&path, &stranger.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, response) = app.patch_auth(&path, &author.token, &body).await;
    assert_eq!(status, StatusCode::OK);
    let updated = parse(&response);
    assert_eq!(updated["ingredients"].as_array().unwrap().len(), 1);
    assert_eq!(updated["ingredients"][0]["id"], butter.to_string());
    assert_eq!(updated["tags"][0]["id"], tag.to_string());
    assert_eq!(updated["name"], body["name"]);

    let (status, _) = app.delete_auth(&path, &author.token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_delete_cascades_to_links() {
    let app = TestApp::new().await;
    let author = app.create_user().await;
    let fan = app.create_user().await;
    let recipe = app.create_simple_recipe(&author).await;
    let id = recipe["id"].as_str().unwrap();
    let recipe_id: Uuid = id.parse().unwrap();

    app.post_auth(&format!("/api/recipes/{}/favorite", id), &fan.token, &json!({}))
        .await;
    app.post_auth(&format!("/api/recipes/{}/shopping_cart", id), &fan.token, &json!({}))
        .await;

    let (status, _) = app
        .delete_auth(&format!("/api/recipes/{}", id), &author.token)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for table in ["favorites", "shopping_cart", "recipe_ingredients", "recipe_tags"] {
        let remaining = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE recipe_id = $1",
            table
        ))
        .bind(recipe_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
        assert_eq!(remaining, 0, "{} still references the recipe", table);
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_list_filters() {
    let app = TestApp::new().await;
    let author = app.create_user().await;
    let viewer = app.create_user().await;
    let (breakfast, breakfast_slug) = app.create_tag().await;
    let (dinner, dinner_slug) = app.create_tag().await;
    let oats = app.create_ingredient(&format!("oats {}", unique()), "g").await;

    let morning = app.create_recipe(&author, &[breakfast], &[(oats, 80)]).await;
    let evening = app.create_recipe(&author, &[dinner], &[(oats, 20)]).await;

    let by_author = format!("/api/recipes?author={}", author.id);
    let (status, body) = app.get(&by_author).await;
    assert_eq!(status, StatusCode::OK);
    let body = parse(&body);
    assert_eq!(body["count"], 2);
    // Newest first
    assert_eq!(body["results"][0]["id"], evening["id"]);

    let (_, body) = app
        .get(&format!("{}&tags={}", by_author, breakfast_slug.to_uppercase()))
        .await;
    let body = parse(&body);
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["id"], morning["id"]);

    let (_, body) = app
        .get(&format!("{}&tags={}&tags={}", by_author, breakfast_slug, dinner_slug))
        .await;
    assert_eq!(parse(&body)["count"], 2);

    app.post_auth(
        &format!("/api/recipes/{}/favorite", morning["id"].as_str().unwrap()),
        &viewer.token,
        &json!({}),
    )
    .await;

    let (_, body) = app
        .get_auth(&format!("{}&is_favorited=1", by_author), &viewer.token)
        .await;
    let body = parse(&body);
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["is_favorited"], true);

    let (_, body) = app
        .get_auth(&format!("{}&is_favorited=0", by_author), &viewer.token)
        .await;
    assert_eq!(parse(&body)["results"][0]["id"], evening["id"]);

    // Anonymous callers have no favorites
    let (_, body) = app.get(&format!("{}&is_favorited=1", by_author)).await;
    assert_eq!(parse(&body)["count"], 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_ingredient_search_prefix_first() {
    let app = TestApp::new().await;
    let marker = unique();
    let prefixed = app.create_ingredient(&format!("{}sugar", marker), "g").await;
    let inner = app.create_ingredient(&format!("brown {}sugar", marker), "g").await;

    let (status, body) = app
        .get(&format!("/api/ingredients?name={}", marker.to_uppercase()))
        .await;

    assert_eq!(status, StatusCode::OK);
    let items = parse(&body);
    let ids: Vec<&str> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![prefixed.to_string(), inner.to_string()]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_tag_detail() {
    let app = TestApp::new().await;
    let (tag, slug) = app.create_tag().await;

    let (status, body) = app.get(&format!("/api/tags/{}", tag)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body)["slug"], slug);

    let (status, _) = app.get(&format!("/api/tags/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_page_far_past_the_end_is_empty() {
    let app = TestApp::new().await;

    for path in [
        "/api/recipes?page=9223372036854775807&limit=100",
        "/api/users?page=9223372036854775807&limit=100",
    ] {
        let (status, body) = app.get(path).await;
        let body = parse(&body);

        assert_eq!(status, StatusCode::OK, "{}", path);
        assert_eq!(body["results"].as_array().map(Vec::len), Some(0));
        assert_eq!(body["has_more"], false);
    }
}
