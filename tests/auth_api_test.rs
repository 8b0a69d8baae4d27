mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};

use common::{json_request, send, test_app, InMemoryStore};
use enrollment_backend::config::JwtConfig;
use enrollment_backend::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

fn login_from(client: &str, email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .header("x-forwarded-for", client)
        .body(Body::from(json!({"email": email, "password": password}).to_string()))
        .unwrap()
}

async fn register(app: &axum::Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        json_request("POST", "/api/auth/register", json!({"name": "A", "email": email, "password": password})),
    )
    .await
}

#[tokio::test]
async fn test_register_then_login() {
    let store = InMemoryStore::new();
    let app = test_app(&store);

    let (status, body) = register(&app, "a@x.com", "pw").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body["user"].get("passwordHash").is_none());
    assert_eq!(body["tokens"]["tokenType"], "Bearer");

    let (status, body) = send(&app, login_from("10.0.0.1", "A@X.com", "pw")).await;
    assert_eq!(status, StatusCode::OK);
    let claims = JwtTokenUtilsImpl::new(JwtConfig::default())
        .validate_access_token(body["tokens"]["accessToken"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.email, "a@x.com");
    assert_eq!(claims.sub, body["user"]["id"].as_str().unwrap());
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let store = InMemoryStore::new();
    let app = test_app(&store);
    register(&app, "a@x.com", "pw").await;

    let (status, wrong_pw) = send(&app, login_from("10.0.0.1", "a@x.com", "px")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, unknown) = send(&app, login_from("10.0.0.1", "b@x.com", "pw")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(wrong_pw, unknown);
    assert_eq!(wrong_pw["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let store = InMemoryStore::new();
    let app = test_app(&store);

    let (status, _) = register(&app, "a@x.com", "pw").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = register(&app, "A@x.com", "other").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");
}

#[tokio::test]
async fn test_login_payload_is_validated() {
    let store = InMemoryStore::new();
    let app = test_app(&store);

    let (status, body) = send(&app, login_from("10.0.0.1", "not-an-email", "pw")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], json!(["email: is not a valid email address"]));
}

#[tokio::test]
async fn test_login_accepts_email_as_typed_at_registration() {
    let store = InMemoryStore::new();
    let app = test_app(&store);
    let (status, _) = register(&app, " A@X.com ", "pw").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, login_from("10.0.0.1", " A@X.com ", "pw")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "a@x.com");
}

#[tokio::test]
async fn test_missing_auth_fields_use_error_envelope() {
    let store = InMemoryStore::new();
    let app = test_app(&store);

    let (status, body) =
        send(&app, json_request("POST", "/api/auth/login", json!({"email": "a@x.com"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation");
    assert_eq!(body["details"], json!(["password: is required"]));

    let (status, body) = send(&app, json_request("POST", "/api/auth/refresh-token", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation");
    assert!(body["details"][0].as_str().unwrap().ends_with(": is required"));
}

#[tokio::test]
async fn test_refresh_token_issues_new_pair() {
    let store = InMemoryStore::new();
    let app = test_app(&store);
    let (_, body) = register(&app, "a@x.com", "pw").await;
    let access = body["tokens"]["accessToken"].as_str().unwrap().to_string();
    let refresh = body["tokens"]["refreshToken"].as_str().unwrap().to_string();

    let (status, tokens) = send(
        &app,
        json_request("POST", "/api/auth/refresh-token", json!({"refreshToken": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(tokens["accessToken"].is_string());

    // An access token is not accepted in place of a refresh token.
    let (status, _) = send(
        &app,
        json_request("POST", "/api/auth/refresh-token", json!({"refreshToken": access})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_eleventh_auth_request_is_rate_limited() {
    let store = InMemoryStore::new();
    let app = test_app(&store);

    for i in 0..10 {
        let response = tower::ServiceExt::oneshot(app.clone(), login_from("1.2.3.4", "nobody@x.com", "pw"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()["ratelimit-limit"], "10");
        assert_eq!(response.headers()["ratelimit-remaining"], (9 - i).to_string().as_str());
    }

    let response = tower::ServiceExt::oneshot(app.clone(), login_from("1.2.3.4", "nobody@x.com", "pw"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = response.headers()["retry-after"].to_str().unwrap().parse().unwrap();
    assert!(retry_after > 0 && retry_after <= 900);

    let (status, body) = send(&app, login_from("1.2.3.4", "nobody@x.com", "pw")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body,
        json!({
            "error": "TooManyRequests",
            "message": "Too many requests, please try again later",
            "details": null
        })
    );

    // Another client has its own window.
    let (status, _) = send(&app, login_from("5.6.7.8", "nobody@x.com", "pw")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_auth_routes_are_not_rate_limited() {
    let store = InMemoryStore::new();
    let app = test_app(&store);

    for _ in 0..15 {
        let (status, _) = send(&app, common::empty_request("GET", "/students")).await;
        assert_eq!(status, StatusCode::OK);
    }
    let response = tower::ServiceExt::oneshot(app.clone(), common::empty_request("GET", "/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("ratelimit-limit").is_none());
}
