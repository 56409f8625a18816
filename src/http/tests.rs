use actix_web::http::StatusCode;
use actix_web::{test, web};
use assert_json_diff::{assert_json_eq, assert_json_include};
use serde_json::{json, Value};

use super::configure;
use crate::test_utils::{self, FlakyStore};

macro_rules! init_service {
    ($app:expr) => {
        test::init_service(
            actix_web::App::new()
                .app_data(web::Data::new($app.clone()))
                .configure(configure),
        )
        .await
    };
}

#[actix_web::test]
async fn should_create_and_fetch_users() {
    let app = test_utils::build_test_app();
    let service = init_service!(app);

    let request = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "username": "alfonso" }))
        .to_request();

    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(response).await;
    assert_json_eq!(body, json!({ "id": "1" }));

    let request = test::TestRequest::get().uri("/users/1").to_request();
    let body: Value = test::call_and_read_body_json(&service, request).await;
    assert_json_include!(actual: body, expected: json!({ "id": "1", "username": "alfonso" }));

    let request = test::TestRequest::get().uri("/users/@alfonso").to_request();
    let body: Value = test::call_and_read_body_json(&service, request).await;
    assert_json_include!(actual: body, expected: json!({ "id": "1" }));

    let request = test::TestRequest::get().uri("/users").to_request();
    let body: Value = test::call_and_read_body_json(&service, request).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn should_reject_invalid_forms() {
    let app = test_utils::build_test_app();
    let service = init_service!(app);

    let request = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "username": "" }))
        .to_request();

    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_argument");
    assert!(body["message"].as_str().unwrap().contains("username"));

    let request = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({ "author_id": 1, "content": "a".repeat(256) }))
        .to_request();

    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let request = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "name": 1 }))
        .to_request();

    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_argument");
}

#[actix_web::test]
async fn should_map_error_categories_to_statuses() {
    let app = test_utils::build_test_app();
    test_utils::users::register_all(&app, &["alfonso", "ivan"]).await;
    let service = init_service!(app);

    // missing user
    let request = test::TestRequest::get().uri("/users/404").to_request();
    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(response).await;
    assert_json_eq!(body, json!({ "code": "not_found", "message": "User does not exist" }));

    // zero is never a valid id
    let request = test::TestRequest::get().uri("/users/0/feed").to_request();
    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // ids must be numeric
    let request = test::TestRequest::get().uri("/users/abc/feed").to_request();
    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_argument");
    assert!(body["message"].as_str().unwrap().starts_with("Invalid request path"));

    let request = test::TestRequest::delete()
        .uri("/users/1/following/-2")
        .to_request();
    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // self follow
    let request = test::TestRequest::put().uri("/users/1/following/1").to_request();
    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(response).await;
    assert_json_eq!(
        body,
        json!({ "code": "invalid_argument", "message": "User can't follow itself" })
    );

    // duplicated follow
    let request = test::TestRequest::put().uri("/users/1/following/2").to_request();
    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let request = test::TestRequest::put().uri("/users/1/following/2").to_request();
    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(response).await;
    assert_json_eq!(body, json!({ "code": "conflict", "message": "Already following user" }));
}

#[actix_web::test]
async fn should_serve_follow_graph_and_feed() {
    let app = test_utils::build_test_app();
    let ids = test_utils::users::register_all(&app, &["alfonso", "ivan", "alicia"]).await;
    let service = init_service!(app);

    let request = test::TestRequest::put().uri("/users/1/following/2").to_request();
    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let request = test::TestRequest::get().uri("/users/1/following/2").to_request();
    let body: Value = test::call_and_read_body_json(&service, request).await;
    assert_json_eq!(body, json!({ "following": true }));

    let request = test::TestRequest::get().uri("/users/2/followers").to_request();
    let body: Value = test::call_and_read_body_json(&service, request).await;
    assert_json_include!(actual: body, expected: json!([{ "id": "1", "username": "alfonso" }]));

    for (author, content) in [(ids[1], "ivan 1"), (ids[2], "alicia 1"), (ids[0], "alfonso 1")] {
        let request = test::TestRequest::post()
            .uri("/posts")
            .set_json(json!({ "author_id": author.get(), "content": content }))
            .to_request();

        let response = test::call_service(&service, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let request = test::TestRequest::get().uri("/users/1/feed").to_request();
    let body: Value = test::call_and_read_body_json(&service, request).await;
    assert_json_include!(
        actual: body,
        expected: json!([{ "content": "alfonso 1" }, { "content": "ivan 1" }])
    );
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let request = test::TestRequest::get().uri("/users/3/posts").to_request();
    let body: Value = test::call_and_read_body_json(&service, request).await;
    assert_json_include!(actual: body, expected: json!([{ "content": "alicia 1" }]));

    let request = test::TestRequest::delete().uri("/users/1/following/2").to_request();
    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let request = test::TestRequest::get().uri("/users/1/feed").to_request();
    let body: Value = test::call_and_read_body_json(&service, request).await;
    assert_json_include!(actual: body, expected: json!([{ "content": "alfonso 1" }]));
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn should_edit_and_delete_posts() {
    let app = test_utils::build_test_app();
    let ids = test_utils::users::register_all(&app, &["alfonso"]).await;
    let post = app.posts.publish(ids[0], "hello").await.unwrap();
    let service = init_service!(app);

    let request = test::TestRequest::put()
        .uri(&format!("/posts/{}", post.id))
        .set_json(json!({ "content": "hello world" }))
        .to_request();

    let body: Value = test::call_and_read_body_json(&service, request).await;
    assert_json_include!(
        actual: body,
        expected: json!({ "id": post.id.to_string(), "content": "hello world" })
    );
    assert!(!body["updated_at"].is_null());

    let request = test::TestRequest::delete()
        .uri(&format!("/posts/{}", post.id))
        .to_request();
    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let request = test::TestRequest::get()
        .uri(&format!("/posts/{}", post.id))
        .to_request();
    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn should_hide_internal_failures() {
    let store = FlakyStore::default();
    let app = test_utils::build_test_app_with(store.clone());
    test_utils::users::register_all(&app, &["alfonso"]).await;
    let service = init_service!(app);

    store.fail_posts(true);
    let request = test::TestRequest::get().uri("/users/1/feed").to_request();
    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(response).await;
    assert_json_eq!(
        body,
        json!({ "code": "internal", "message": "Failed to perform request" })
    );
}
