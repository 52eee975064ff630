use super::AppState;
use crate::client::SearchResult;
use crate::{Error, ErrorClass};
use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::error;

/// Assemble the application router. Every route is a stateless
/// request-to-response mapping; unmatched paths fall through to a JSON 404.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/search", post(search_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/health", get(health_handler))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_max_results")]
    pub max_results: i64,
}

fn default_category() -> String {
    "all".to_string()
}

fn default_max_results() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    status: &'static str,
    response: String,
    session_id: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
}

impl ErrorBody {
    fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

/// Boundary-side wrapper mapping crate errors to JSON responses. Internal
/// faults are logged with detail here and leave as a generic 500 body; no
/// raw fault ever reaches the transport layer.
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.class() {
            ErrorClass::Validation => StatusCode::BAD_REQUEST,
            ErrorClass::Exhausted => StatusCode::SERVICE_UNAVAILABLE,
            ErrorClass::Internal => {
                error!("Internal error: {}", self.0);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(ErrorBody::new(self.0.user_message()))).into_response()
    }
}

/// JSON body extractor whose rejection keeps the error contract. Axum's
/// stock `Json` rejection is plain text; here a malformed body or wrong
/// content type leaves as the same `{status, message}` shape as every other
/// boundary error.
struct ApiJson<T>(T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err((
                rejection.status(),
                Json(ErrorBody::new(rejection.body_text())),
            )
                .into_response()),
        }
    }
}

async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

/// POST /api/search. Requires a non-empty `query`; provider failures still
/// come back as 200 with `status: error` since search is best-effort.
async fn search_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SearchRequest>,
) -> Result<Json<SearchResult>, ApiError> {
    if request.query.is_empty() {
        return Err(Error::missing_field("Query").into());
    }

    let result = state
        .arxiv
        .search(&request.query, &request.category, request.max_results)
        .await;

    Ok(Json(result))
}

/// POST /api/chat. Rejects strictly empty messages only; a whitespace-only
/// message is forwarded as-is. Gateway exhaustion maps to 503, anything
/// else unexpected to 500.
async fn chat_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if request.message.is_empty() {
        return Err(Error::missing_field("Message").into());
    }

    let reply = state
        .gateway
        .chat(&request.message, request.session_id.as_deref())
        .await?;

    Ok(Json(ChatResponse {
        status: "success",
        response: reply.response,
        session_id: reply.session_id,
    }))
}

/// GET /api/health. Pure liveness: always 200 while the process runs, never
/// consults upstream providers.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "ResearchForge AI",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn not_found_handler() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new("Resource not found")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatGateway;
    use crate::client::gemini::{BackendError, GenerativeBackend};
    use crate::client::ArxivClient;
    use crate::Config;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct EchoBackend;

    #[async_trait]
    impl GenerativeBackend for EchoBackend {
        async fn generate(
            &self,
            _model: &str,
            message: &str,
            _system_instruction: &str,
        ) -> Result<String, BackendError> {
            Ok(format!("echo: {message}"))
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl GenerativeBackend for FailingBackend {
        async fn generate(
            &self,
            _model: &str,
            _message: &str,
            _system_instruction: &str,
        ) -> Result<String, BackendError> {
            Err(BackendError::Network("quota exhausted".to_string()))
        }
    }

    fn test_state(backend: Arc<dyn GenerativeBackend>) -> AppState {
        let config = Arc::new(Config::default());
        let arxiv = ArxivClient::new(&config).unwrap();
        let gateway = Arc::new(ChatGateway::new(backend, config.models.clone()));
        AppState {
            config,
            arxiv,
            gateway,
        }
    }

    async fn post_json(router: Router, path: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_json(router: Router, path: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_is_always_200() {
        let router = build_router(test_state(Arc::new(FailingBackend)));
        let (status, body) = get_json(router, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "ResearchForge AI");
        assert!(body["version"].is_string());
    }

    #[tokio::test]
    async fn unmatched_route_is_json_404() {
        let router = build_router(test_state(Arc::new(EchoBackend)));
        let (status, body) = get_json(router, "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Resource not found");
    }

    #[tokio::test]
    async fn search_rejects_empty_query() {
        let router = build_router(test_state(Arc::new(EchoBackend)));
        let (status, body) = post_json(router, "/api/search", r#"{"query": ""}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Query parameter is required");
    }

    #[tokio::test]
    async fn search_rejects_missing_query() {
        let router = build_router(test_state(Arc::new(EchoBackend)));
        let (status, body) = post_json(router, "/api/search", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Query parameter is required");
    }

    #[tokio::test]
    async fn malformed_json_body_is_json_400() {
        let router = build_router(test_state(Arc::new(EchoBackend)));
        let (status, body) = post_json(router, "/api/search", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("JSON"));
    }

    #[tokio::test]
    async fn missing_content_type_is_json_415() {
        let router = build_router(test_state(Arc::new(EchoBackend)));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/chat")
            .body(Body::from(r#"{"message": "hi"}"#))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn chat_rejects_empty_message() {
        let router = build_router(test_state(Arc::new(EchoBackend)));
        let (status, body) = post_json(router, "/api/chat", r#"{"message": ""}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Message parameter is required");
    }

    // Pinned behavior: only strict emptiness is rejected. A whitespace-only
    // message passes validation and is forwarded verbatim.
    #[tokio::test]
    async fn chat_accepts_whitespace_only_message() {
        let router = build_router(test_state(Arc::new(EchoBackend)));
        let (status, body) = post_json(router, "/api/chat", r#"{"message": " "}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["response"], "echo:  ");
    }

    #[tokio::test]
    async fn chat_success_echoes_session_id() {
        let router = build_router(test_state(Arc::new(EchoBackend)));
        let (status, body) = post_json(
            router,
            "/api/chat",
            r#"{"message": "hi", "session_id": "abc-123"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session_id"], "abc-123");
    }

    #[tokio::test]
    async fn chat_generates_session_id_when_absent() {
        let router = build_router(test_state(Arc::new(EchoBackend)));
        let (status, body) = post_json(router, "/api/chat", r#"{"message": "hi"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body["session_id"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn chat_exhaustion_maps_to_503_with_last_error() {
        let router = build_router(test_state(Arc::new(FailingBackend)));
        let (status, body) = post_json(router, "/api/chat", r#"{"message": "hi"}"#).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "error");
        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with("All models failed."));
        assert!(message.contains("quota exhausted"));
        assert!(message.contains("Please try again in a few moments."));
    }

    #[tokio::test]
    async fn index_serves_ui_shell() {
        let router = build_router(test_state(Arc::new(EchoBackend)));
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("ResearchForge"));
    }
}
