//! HTTP API gateway for RosterHub.
//!
//! Endpoints:
//!
//! - `GET    /` and `GET /health` — liveness probe
//! - `GET    /students`           — list all records
//! - `POST   /students`           — create a record
//! - `DELETE /students/{id}`      — remove a record
//! - `POST   /chat`               — ask a question about the records
//!
//! Built on Axum; every response, including failures and the unmatched-route
//! fallback, is JSON.

use axum::{
    Router,
    extract::rejection::JsonRejection,
    extract::{FromRequest, Path, Request, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use rosterhub_chat::{CompletionGateway, PromptBuilder};
use rosterhub_config::AppConfig;
use rosterhub_core::message::ChatTurn;
use rosterhub_core::result::{FailureKind, ProviderResult};
use rosterhub_core::{StoreError, StudentRecord};
use rosterhub_store::RecordStore;

/// Reply returned for chat questions when no records exist yet. The provider
/// is not contacted in that case; there is nothing to ground an answer in.
const EMPTY_DATASET_REPLY: &str =
    "There are no student records yet, so there is nothing to answer questions about. \
     Add some records first.";

/// Shared application state for the gateway.
pub struct AppState {
    pub store: RecordStore,
    pub prompts: PromptBuilder,
    pub completions: CompletionGateway,
}

pub type SharedState = Arc<AppState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState, config: &AppConfig) -> Router {
    let origins: Vec<axum::http::HeaderValue> = config
        .gateway
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::list(origins))
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        .route("/students", get(list_students_handler))
        .route("/students", post(create_student_handler))
        .route("/students/{id}", delete(delete_student_handler))
        .route("/chat", post(chat_handler))
        .fallback(fallback_handler)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve the router until the process is stopped.
pub async fn serve(router: Router, host: &str, port: u16) -> std::io::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Gateway listening");
    axum::serve(listener, router).await
}

// ── DTOs ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    time: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct DeleteResponse {
    success: bool,
    removed: StudentRecord,
}

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
    /// Optional prior turns, forwarded to the provider in order.
    #[serde(default)]
    context: Vec<ChatTurn>,
}

#[derive(Serialize)]
struct ChatResponse {
    success: bool,
    model: String,
    message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// `Json` with the extractor's rejection folded into the API's error shape.
///
/// Axum's default rejection is a plain-text 400 or 422 depending on whether
/// the body is syntactically or structurally wrong; on this surface every
/// failure is a 400 `{"error": ...}` object, so both cases map there.
struct ApiJson<T>(T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(error(StatusCode::BAD_REQUEST, rejection.body_text())),
        }
    }
}

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn store_error(e: StoreError) -> ApiError {
    let status = match &e {
        StoreError::Validation(_) => StatusCode::BAD_REQUEST,
        StoreError::Duplicate { .. } => StatusCode::CONFLICT,
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error(status, e.to_string())
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "rosterhub",
        time: chrono::Utc::now().to_rfc3339(),
    })
}

async fn list_students_handler(State(state): State<SharedState>) -> Json<Vec<StudentRecord>> {
    Json(state.store.list().await)
}

async fn create_student_handler(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<StudentRecord>,
) -> Result<(StatusCode, Json<StudentRecord>), ApiError> {
    let created = state.store.create(payload).await.map_err(store_error)?;
    info!(student_id = %created.student_id, "Student created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_student_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let removed = state.store.delete_by_id(&id).await.map_err(store_error)?;
    info!(student_id = %id, "Student removed");
    Ok(Json(DeleteResponse {
        success: true,
        removed,
    }))
}

async fn chat_handler(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = match payload.message.as_deref().map(str::trim) {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => {
            return Err(error(
                StatusCode::BAD_REQUEST,
                "Message is required and must be a non-empty string.",
            ));
        }
    };

    let records = state.store.list().await;
    let model = state.completions.model().to_string();

    // Nothing to ground an answer in: reply locally, skip the provider.
    if records.is_empty() {
        return Ok(Json(ChatResponse {
            success: true,
            model,
            message: EMPTY_DATASET_REPLY.to_string(),
        }));
    }

    let prompt = state.prompts.build(&message, &records);
    let result = state
        .completions
        .send(&prompt.system, &prompt.user, payload.context)
        .await;

    match result {
        ProviderResult::Success { message } => Ok(Json(ChatResponse {
            success: true,
            model,
            message,
        })),
        ProviderResult::Failure {
            kind,
            status,
            detail,
        } => {
            let http_status = match kind {
                FailureKind::ConfigurationMissing => StatusCode::INTERNAL_SERVER_ERROR,
                FailureKind::UpstreamRejected => status
                    .filter(|code| (400..=599).contains(code))
                    .and_then(|code| StatusCode::from_u16(code).ok())
                    .unwrap_or(StatusCode::BAD_GATEWAY),
                FailureKind::UpstreamUnreachable => StatusCode::BAD_GATEWAY,
            };
            warn!(?kind, %detail, "Chat request failed");
            Err(error(http_status, detail))
        }
    }
}

async fn fallback_handler() -> ApiError {
    error(StatusCode::NOT_FOUND, "Not Found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use rosterhub_core::error::ProviderError;
    use rosterhub_core::provider::{Provider, ProviderRequest, ProviderResponse};
    use rosterhub_config::ValidationMode;
    use rosterhub_store::JsonFileMirror;
    use tower::ServiceExt;

    struct StubProvider {
        reply: std::result::Result<ProviderResponse, ProviderError>,
    }

    #[async_trait]
    impl Provider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> std::result::Result<ProviderResponse, ProviderError> {
            self.reply.clone()
        }
    }

    async fn test_app_with(
        dir: &tempfile::TempDir,
        provider: Option<Arc<dyn Provider>>,
        seed: &[StudentRecord],
    ) -> Router {
        let config = AppConfig::default();
        let mirror = JsonFileMirror::new(dir.path().join("students.json"));
        let store = RecordStore::open(Box::new(mirror), ValidationMode::Lenient);
        let state = Arc::new(AppState {
            store,
            prompts: PromptBuilder::new(config.store.prompt_record_cap),
            completions: CompletionGateway::new(provider, &config),
        });

        for record in seed {
            state.store.create(record.clone()).await.unwrap();
        }

        build_router(state, &config)
    }

    fn stub(content: &str) -> Option<Arc<dyn Provider>> {
        Some(Arc::new(StubProvider {
            reply: Ok(ProviderResponse {
                content: Some(content.to_string()),
                model: "stub-model".into(),
            }),
        }))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn sample_record(id: &str) -> StudentRecord {
        StudentRecord::new(id, format!("Student {id}"))
    }

    #[tokio::test]
    async fn health_reports_service_and_time() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app_with(&dir, None, &[]).await;
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "rosterhub");
        assert!(body["time"].is_string());
    }

    #[tokio::test]
    async fn create_then_list_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app_with(&dir, None, &[]).await;

        let created = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/students",
                serde_json::json!({"studentID": "S001", "fullName": "Ada Lovelace"}),
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);

        let listed = app
            .oneshot(Request::builder().uri("/students").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(listed.status(), StatusCode::OK);
        let body = body_json(listed).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["studentID"], "S001");
        assert_eq!(body[0]["fullName"], "Ada Lovelace");
    }

    #[tokio::test]
    async fn create_without_required_fields_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app_with(&dir, None, &[]).await;
        let response = app
            .oneshot(json_request(
                "POST",
                "/students",
                serde_json::json!({"program": "BSIS"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("required"));
    }

    #[tokio::test]
    async fn malformed_create_body_is_json_400() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app_with(&dir, None, &[]).await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/students")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        // The rejection must be this API's JSON error shape, not plain text.
        let body = body_json(response).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn duplicate_create_is_409() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app_with(&dir, None, &[sample_record("S001")]).await;
        let response = app
            .oneshot(json_request(
                "POST",
                "/students",
                serde_json::json!({"studentID": "S001", "fullName": "Someone Else"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn delete_returns_removed_record() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app_with(&dir, None, &[sample_record("S001")]).await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/students/S001")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["removed"]["studentID"], "S001");
    }

    #[tokio::test]
    async fn delete_unknown_id_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app_with(&dir, None, &[]).await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/students/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn chat_requires_nonempty_message() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app_with(&dir, stub("hi"), &[sample_record("S001")]).await;
        let response = app
            .oneshot(json_request("POST", "/chat", serde_json::json!({"message": "   "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn chat_rejects_non_string_message_with_json_400() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app_with(&dir, stub("hi"), &[sample_record("S001")]).await;
        let response = app
            .oneshot(json_request("POST", "/chat", serde_json::json!({"message": 123})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn chat_with_empty_dataset_answers_locally() {
        let dir = tempfile::tempdir().unwrap();
        // No provider at all: the short-circuit must still succeed.
        let app = test_app_with(&dir, None, &[]).await;
        let response = app
            .oneshot(json_request(
                "POST",
                "/chat",
                serde_json::json!({"message": "How many students?"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert!(body["message"].as_str().unwrap().contains("no student records"));
    }

    #[tokio::test]
    async fn chat_success_carries_model_and_message() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app_with(&dir, stub("There is 1 student."), &[sample_record("S001")]).await;
        let response = app
            .oneshot(json_request(
                "POST",
                "/chat",
                serde_json::json!({"message": "How many students?"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "There is 1 student.");
        assert!(body["model"].is_string());
    }

    #[tokio::test]
    async fn chat_without_credentials_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app_with(&dir, None, &[sample_record("S001")]).await;
        let response = app
            .oneshot(json_request(
                "POST",
                "/chat",
                serde_json::json!({"message": "How many students?"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("API key"));
    }

    #[tokio::test]
    async fn chat_propagates_upstream_status() {
        let dir = tempfile::tempdir().unwrap();
        let provider: Option<Arc<dyn Provider>> = Some(Arc::new(StubProvider {
            reply: Err(ProviderError::ApiError {
                status_code: 429,
                message: "Rate limit exceeded".into(),
            }),
        }));
        let app = test_app_with(&dir, provider, &[sample_record("S001")]).await;
        let response = app
            .oneshot(json_request(
                "POST",
                "/chat",
                serde_json::json!({"message": "q"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Rate limit exceeded");
    }

    #[tokio::test]
    async fn chat_maps_transport_failure_to_502() {
        let dir = tempfile::tempdir().unwrap();
        let provider: Option<Arc<dyn Provider>> = Some(Arc::new(StubProvider {
            reply: Err(ProviderError::Network("connection refused".into())),
        }));
        let app = test_app_with(&dir, provider, &[sample_record("S001")]).await;
        let response = app
            .oneshot(json_request(
                "POST",
                "/chat",
                serde_json::json!({"message": "q"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn unmatched_route_is_json_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app_with(&dir, None, &[]).await;
        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Not Found");
    }
}
