use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::AppState;
use crate::auth::require_auth;
use crate::config::AppConfig;
use crate::handlers::{activities, auth, categories, comments, health, statuses, users};

const BODY_LIMIT: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/refresh-token", post(auth::refresh_token));

    let protected = Router::new()
        .route("/api/auth/test-auth", get(auth::test_auth))
        // Activities
        .route("/api/activities", get(activities::list).post(activities::create))
        .route("/api/activities/categories", get(activities::categories))
        .route("/api/activities/user/{user_id}", get(activities::by_user))
        .route("/api/activities/category/{category_id}", get(activities::by_category))
        .route(
            "/api/activities/{id}",
            get(activities::get).put(activities::update).delete(activities::delete),
        )
        .route("/api/activities/{id}/comments", get(comments::list).post(comments::create))
        .route(
            "/api/activities/{id}/comments/{comment_id}",
            axum::routing::delete(comments::delete),
        )
        // Categories
        .route("/api/categories", get(categories::list).post(categories::create))
        .route(
            "/api/categories/{id}",
            get(categories::get).put(categories::update).delete(categories::delete),
        )
        // Statuses
        .route("/api/statuses", get(statuses::list).post(statuses::create))
        .route(
            "/api/statuses/{id}",
            get(statuses::get).put(statuses::update).delete(statuses::delete),
        )
        // Users
        .route("/api/users", get(users::list).post(users::create).put(users::update))
        .route("/api/users/change-password", post(users::change_password))
        .route("/api/users/reset-password", post(users::reset_password))
        .route("/api/users/{id}", get(users::get).delete(users::delete))
        .route("/api/users/{id}/lock", post(users::lock))
        .route("/api/users/{id}/unlock", post(users::unlock))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let mut app = public.merge(protected);
    if let Some(dir) = &state.config.static_dir {
        tracing::info!("Serving static files from {}", dir);
        app = app.fallback_service(ServeDir::new(dir));
    }

    let cors = cors_layer(&state.config);
    app.with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    if config.allows_any_origin() {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Subject, TokenPair};
    use crate::config::test_config;
    use activityflow_shared::ErrorBody;
    use activityflow_shared::user::{ROLE_ADMIN, ROLE_USER};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use uuid::Uuid;

    /// State over a pool that never connects; every request below is
    /// answered before any query runs.
    fn test_state() -> AppState {
        let config = test_config();
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy(&config.database_url)
            .unwrap();
        AppState::new(pool, config)
    }

    fn tokens(state: &AppState, roles: &[&str]) -> TokenPair {
        let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
        state
            .jwt
            .issue(&Subject {
                id: Uuid::new_v4(),
                email: "user1@example.com",
                name: "user1@example.com",
                roles: &roles,
            })
            .unwrap()
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(state: AppState, req: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(state).oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn health_is_public() {
        let (status, body) = send(test_state(), request(Method::GET, "/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn responses_carry_security_headers() {
        let response = build_router(test_state())
            .oneshot(request(Method::GET, "/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let (status, body) = send(test_state(), request(Method::GET, "/api/activities", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized");
    }

    #[tokio::test]
    async fn garbage_tokens_are_rejected() {
        let req = request(Method::GET, "/api/categories", Some("not.a.jwt"), None);
        let (status, _) = send(test_state(), req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn refresh_tokens_cannot_authorize_requests() {
        let state = test_state();
        let pair = tokens(&state, &[ROLE_USER]);
        let req = request(Method::GET, "/api/auth/test-auth", Some(&pair.refresh), None);
        let (status, _) = send(state, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_echoes_the_caller() {
        let state = test_state();
        let pair = tokens(&state, &[ROLE_USER]);
        let req = request(Method::GET, "/api/auth/test-auth", Some(&pair.access), None);
        let (status, body) = send(state, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_email"], "user1@example.com");
        assert_eq!(body["roles"], json!(["User"]));
    }

    #[tokio::test]
    async fn status_changes_require_admin() {
        let state = test_state();
        let pair = tokens(&state, &[ROLE_USER]);
        let req = request(
            Method::POST,
            "/api/statuses",
            Some(&pair.access),
            Some(json!({ "name": "Pending", "order": 1 })),
        );
        let (status, _) = send(state, req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn user_deletion_requires_admin() {
        let state = test_state();
        let pair = tokens(&state, &[ROLE_USER]);
        let uri = format!("/api/users/{}", Uuid::new_v4());
        let (status, _) = send(state, request(Method::DELETE, &uri, Some(&pair.access), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn empty_category_name_is_rejected() {
        let state = test_state();
        let pair = tokens(&state, &[ROLE_ADMIN]);
        let req = request(
            Method::POST,
            "/api/categories",
            Some(&pair.access),
            Some(json!({ "name": "" })),
        );
        let (status, body) = send(state, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"], json!(["Name is required"]));
    }

    #[tokio::test]
    async fn out_of_range_priority_is_rejected() {
        let state = test_state();
        let pair = tokens(&state, &[ROLE_USER]);
        let req = request(
            Method::POST,
            "/api/activities",
            Some(&pair.access),
            Some(json!({ "title": "Plan sprint", "priority": 9 })),
        );
        let (status, body) = send(state, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"], json!(["Priority must be between 0 and 5"]));
    }

    #[tokio::test]
    async fn mistyped_json_bodies_get_an_error_body() {
        let state = test_state();
        let pair = tokens(&state, &[ROLE_ADMIN]);
        let req = request(
            Method::POST,
            "/api/categories",
            Some(&pair.access),
            Some(json!({ "name": 5 })),
        );
        let response = build_router(state).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert!(body.error.contains("invalid type"), "{}", body.error);
    }

    #[tokio::test]
    async fn malformed_json_gets_an_error_body() {
        let state = test_state();
        let pair = tokens(&state, &[ROLE_USER]);
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/activities")
            .header(header::AUTHORIZATION, format!("Bearer {}", pair.access))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"title\":"))
            .unwrap();
        let (status, body) = send(state, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn unparsable_path_ids_get_an_error_body() {
        let state = test_state();
        let pair = tokens(&state, &[ROLE_USER]);
        let (status, body) = send(
            state.clone(),
            request(Method::GET, "/api/activities/abc", Some(&pair.access), None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("abc"));

        let (status, body) = send(
            state,
            request(Method::GET, "/api/users/not-a-uuid", Some(&pair.access), None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn register_reports_password_mismatch() {
        let req = request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "email": "new@example.com",
                "password": "User123!",
                "confirm_password": "User123?"
            })),
        );
        let (status, body) = send(test_state(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Passwords do not match");
    }

    #[tokio::test]
    async fn changing_someone_elses_password_is_forbidden() {
        let state = test_state();
        let pair = tokens(&state, &[ROLE_USER]);
        let req = request(
            Method::POST,
            "/api/users/change-password",
            Some(&pair.access),
            Some(json!({
                "user_id": Uuid::new_v4(),
                "current_password": "User123!",
                "new_password": "User1234!",
                "confirm_password": "User1234!"
            })),
        );
        let (status, _) = send(state, req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
