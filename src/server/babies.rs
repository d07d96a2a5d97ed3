use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Baby;

use super::{failure, AppState};

#[derive(Serialize)]
struct BabyListResponse {
    success: bool,
    babies: Vec<Baby>,
}

#[derive(Serialize)]
struct BabyResponse {
    success: bool,
    baby: Baby,
}

pub async fn list_babies(State(state): State<AppState>) -> Response {
    match state.babies.list().await {
        Ok(babies) => (
            StatusCode::OK,
            Json(BabyListResponse {
                success: true,
                babies,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error fetching babies: {}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch babies")
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBabyRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    birth_date: Option<DateTime<Utc>>,
}

pub async fn create_baby(
    State(state): State<AppState>,
    Json(req): Json<CreateBabyRequest>,
) -> Response {
    let name = match req.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return failure(StatusCode::BAD_REQUEST, "Name is required"),
    };

    let mut baby = Baby::new(name);
    if let Some(birth_date) = req.birth_date {
        baby = baby.with_birth_date(birth_date);
    }

    match state.babies.create(&baby).await {
        Ok(baby) => (
            StatusCode::OK,
            Json(BabyResponse {
                success: true,
                baby,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error creating baby: {}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create baby")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateBabyRequest {
    #[serde(default)]
    id: Option<Uuid>,
    #[serde(default)]
    name: Option<String>,
}

pub async fn update_baby(
    State(state): State<AppState>,
    Json(req): Json<UpdateBabyRequest>,
) -> Response {
    let (id, name) = match (req.id, req.name.as_deref().map(str::trim)) {
        (Some(id), Some(name)) if !name.is_empty() => (id, name.to_string()),
        _ => return failure(StatusCode::BAD_REQUEST, "ID and name are required"),
    };

    match state.babies.rename(id, &name).await {
        Ok(baby) => (
            StatusCode::OK,
            Json(BabyResponse {
                success: true,
                baby,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error updating baby: {}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update baby")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::server::{notify::SlackNotifier, router};
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use axum::Router;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct TestContext {
        app: Router,
        _temp_dir: TempDir, // Keep alive for duration of test
    }

    async fn setup_app() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let pool = init_db(&db_path).await.unwrap();
        let state = AppState::new(pool, SlackNotifier::new(None));
        TestContext {
            app: router(state),
            _temp_dir: temp_dir,
        }
    }

    async fn send_json(
        app: &Router,
        method: Method,
        uri: &str,
        body: Value,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_create_baby() {
        let ctx = setup_app().await;

        let (status, body) =
            send_json(&ctx.app, Method::POST, "/babies", json!({"name": "Ada"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["baby"]["name"], "Ada");
        assert!(body["baby"]["id"].is_string());
    }

    #[tokio::test]
    async fn test_create_baby_rejects_empty_name() {
        let ctx = setup_app().await;

        let (status, body) =
            send_json(&ctx.app, Method::POST, "/babies", json!({"name": "  "})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Name is required");

        let (status, _) = send_json(&ctx.app, Method::POST, "/babies", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_baby_with_birth_date() {
        let ctx = setup_app().await;

        let (status, body) = send_json(
            &ctx.app,
            Method::POST,
            "/babies",
            json!({"name": "Ada", "birthDate": "2025-03-01T08:30:00Z"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let birth_date: DateTime<Utc> = body["baby"]["birthDate"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(birth_date.to_rfc3339(), "2025-03-01T08:30:00+00:00");
    }

    #[tokio::test]
    async fn test_list_babies_in_creation_order() {
        let ctx = setup_app().await;

        send_json(&ctx.app, Method::POST, "/babies", json!({"name": "First"})).await;
        send_json(&ctx.app, Method::POST, "/babies", json!({"name": "Second"})).await;

        let (status, body) = get_json(&ctx.app, "/babies").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let names: Vec<&str> = body["babies"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn test_rename_baby() {
        let ctx = setup_app().await;

        let (_, created) =
            send_json(&ctx.app, Method::POST, "/babies", json!({"name": "Before"})).await;
        send_json(&ctx.app, Method::POST, "/babies", json!({"name": "Other"})).await;
        let id = created["baby"]["id"].as_str().unwrap().to_string();

        let (status, body) = send_json(
            &ctx.app,
            Method::PATCH,
            "/babies/update",
            json!({"id": id, "name": "After"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["baby"]["name"], "After");

        // Only the targeted record changed
        let (_, list) = get_json(&ctx.app, "/babies").await;
        let names: Vec<&str> = list["babies"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["After", "Other"]);
    }

    #[tokio::test]
    async fn test_rename_unknown_baby_fails() {
        let ctx = setup_app().await;

        let (status, body) = send_json(
            &ctx.app,
            Method::PATCH,
            "/babies/update",
            json!({"id": Uuid::new_v4(), "name": "Nobody"}),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_rename_requires_id_and_name() {
        let ctx = setup_app().await;

        let (status, body) = send_json(
            &ctx.app,
            Method::PATCH,
            "/babies/update",
            json!({"name": "No Id"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ID and name are required");

        let (status, _) = send_json(
            &ctx.app,
            Method::PATCH,
            "/babies/update",
            json!({"id": Uuid::new_v4(), "name": ""}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
