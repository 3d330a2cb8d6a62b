// SPDX-License-Identifier: MIT

//! Error-to-response mapping tests.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use quitpuff::error::AppError;

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_status_codes() {
    let cases = [
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
        (AppError::InvalidToken, StatusCode::UNAUTHORIZED),
        (
            AppError::NotFound("smoke".to_string()),
            StatusCode::NOT_FOUND,
        ),
        (
            AppError::Validation("bad timestamp".to_string()),
            StatusCode::BAD_REQUEST,
        ),
        (
            AppError::Conflict("email is already registered".to_string()),
            StatusCode::CONFLICT,
        ),
        (
            AppError::Database("connection lost".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (error, expected) in cases {
        assert_eq!(error.into_response().status(), expected);
    }
}

#[tokio::test]
async fn test_validation_details_are_returned() {
    let response = AppError::Validation("timestamp cannot be in the future".to_string())
        .into_response();
    let body = body_string(response).await;

    assert!(body.contains("validation_error"));
    assert!(body.contains("timestamp cannot be in the future"));
}

#[tokio::test]
async fn test_server_errors_do_not_leak_details() {
    let response = AppError::Database("Firestore at 10.0.0.3 refused".to_string()).into_response();
    let body = body_string(response).await;
    assert!(body.contains("database_error"));
    assert!(!body.contains("10.0.0.3"));

    let response = AppError::Internal(anyhow::anyhow!("credentials row for user u-42 is corrupt"))
        .into_response();
    let body = body_string(response).await;
    assert!(body.contains("internal_error"));
    assert!(!body.contains("u-42"));
}
