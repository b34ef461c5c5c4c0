//! Writes require a Bearer token; reads do not.

mod common;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use catalog_api::auth::jwt::{generate_access_token, JwtConfig};
use common::{body_json, build_test_app, character, create, get, send};

fn request(method: Method, uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    builder
        .body(Body::from(character("Viola").to_string()))
        .unwrap()
}

#[tokio::test]
async fn writes_without_token_are_401() {
    let app = build_test_app();

    for (method, uri) in [
        (Method::POST, "/api/v1/characters"),
        (Method::PUT, "/api/v1/characters/1"),
        (Method::DELETE, "/api/v1/characters/1"),
    ] {
        let response = send(app.clone(), request(method.clone(), uri, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        let json = body_json(response).await;
        assert_eq!(json["message"], "Missing Authorization header");
    }
}

#[tokio::test]
async fn non_bearer_scheme_is_401() {
    let response = send(
        build_test_app(),
        request(Method::POST, "/api/v1/characters", Some("Basic dXNlcjpwYXNz")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_other_secret_is_401() {
    let foreign = JwtConfig {
        secret: "not-the-server-secret".to_string(),
        access_token_expiry_mins: 15,
    };
    let token = generate_access_token(1, "editor", &foreign).unwrap();

    let response = send(
        build_test_app(),
        request(
            Method::POST,
            "/api/v1/characters",
            Some(&format!("Bearer {token}")),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid or expired token");
}

#[tokio::test]
async fn rejected_write_changes_nothing() {
    let app = build_test_app();
    let (id, etag) = create(&app, "characters", character("Viola")).await;

    let unauthenticated = Request::builder()
        .method(Method::PUT)
        .uri(format!("/api/v1/characters/{id}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"rarity": 3}"#))
        .unwrap();
    let response = send(app.clone(), unauthenticated).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let current = get(app, &format!("/api/v1/characters/{id}")).await;
    assert_eq!(current.headers()["etag"].to_str().unwrap(), etag);
}

#[tokio::test]
async fn reads_are_public() {
    let app = build_test_app();
    assert_eq!(get(app.clone(), "/api/v1/characters").await.status(), StatusCode::OK);
    assert_eq!(get(app, "/api/v1/accessories").await.status(), StatusCode::OK);
}
