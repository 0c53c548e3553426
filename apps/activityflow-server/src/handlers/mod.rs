pub mod activities;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod extract;
pub mod health;
pub mod statuses;
pub mod users;

use activityflow_shared::auth::AuthResponse;
use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// 201 with a `Location` header pointing at the new resource.
pub fn created<T: Serialize>(location: String, body: T) -> Response {
    (StatusCode::CREATED, [(header::LOCATION, location)], Json(body)).into_response()
}

/// Auth-style outcomes: 200 on success, 400 with the same body otherwise.
pub fn auth_outcome(response: AuthResponse) -> Response {
    let status = if response.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn created_sets_status_location_and_body() {
        let response = created("/api/activities/42".to_string(), json!({ "id": 42 }));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::LOCATION], "/api/activities/42");

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["id"], 42);
    }

    #[test]
    fn failed_auth_outcomes_are_bad_requests() {
        let response = auth_outcome(AuthResponse::failure("User not found"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
