// SPDX-License-Identifier: MIT

//! Session cookie attribute tests.
//!
//! Logout never touches the store, so these run against the offline mock.
//! Removal attributes must match the creation attributes or browsers keep
//! the stale cookie.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use tower::ServiceExt;

mod common;

fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

fn find_cookie(headers: &[String], name: &str) -> String {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
        .unwrap_or_else(|| panic!("missing Set-Cookie header for {name}: {headers:?}"))
}

#[tokio::test]
async fn test_logout_cookie_removal_localhost_attributes() {
    let (app, _) = common::create_test_app_with_frontend_url("http://localhost:5173");

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .header(header::COOKIE, "quitpuff_token=test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let set_cookies = set_cookie_headers(&response);
    let token_cookie = find_cookie(&set_cookies, "quitpuff_token");

    assert!(token_cookie.contains("Path=/"));
    assert!(token_cookie.contains("HttpOnly"));
    assert!(token_cookie.contains("SameSite=Lax"));
    assert!(token_cookie.contains("Max-Age=0"));
    assert!(!token_cookie.contains("Secure"));
    assert!(!token_cookie.contains("Domain="));
}

#[tokio::test]
async fn test_logout_cookie_removal_production_attributes() {
    let (app, _) = common::create_test_app_with_frontend_url("https://quitpuff.example.com");

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .header(header::COOKIE, "quitpuff_token=test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let set_cookies = set_cookie_headers(&response);
    let token_cookie = find_cookie(&set_cookies, "quitpuff_token");

    assert!(token_cookie.contains("Path=/"));
    assert!(token_cookie.contains("HttpOnly"));
    assert!(token_cookie.contains("SameSite=Lax"));
    assert!(token_cookie.contains("Max-Age=0"));
    assert!(token_cookie.contains("Secure"));
    assert!(!token_cookie.contains("Domain="));
}

#[tokio::test]
async fn test_logout_works_without_existing_cookie() {
    let (app, _) = common::create_test_app_with_frontend_url("http://localhost:5173");

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Logout is idempotent: still 200 and still sends the removal cookie
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookies = set_cookie_headers(&response);
    let token_cookie = find_cookie(&set_cookies, "quitpuff_token");
    assert!(token_cookie.contains("Max-Age=0"));
}
