use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    SafePathError,
    app::{AppState, Orchestrator},
    complaint::ComplaintDraft,
    config::MapProvider,
    forms::DestinationQuery,
    map::{MapScene, StaticSvgRenderer, static_svg},
    models::{Complaint, Language, Notice, WeatherReading},
};

/// Handlers share one orchestrator; it locks its own state briefly per action
pub type SharedOrchestrator = Arc<Orchestrator>;

/// Result of an action plus the notices pending once it finished
#[derive(Debug, Serialize)]
pub struct ActionResponse<T> {
    pub data: T,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageView {
    pub language: Language,
    pub toggle_label: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Input problems become 422 with the user-facing message; anything else is a 500
pub struct ApiError(SafePathError);

impl From<SafePathError> for ApiError {
    fn from(e: SafePathError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_validation() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            error!("Request failed: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = ErrorBody {
            error: self.0.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(app: SharedOrchestrator) -> Router {
    Router::new()
        .route("/search", post(search))
        .route("/weather", get(weather))
        .route("/complaints", post(submit_complaint))
        .route("/language/toggle", post(toggle_language))
        .route("/navigation/start", post(start_navigation))
        .route("/map", get(map_scene))
        .route("/map.svg", get(map_svg))
        .route("/state", get(state))
        .with_state(app)
}

async fn search(
    State(app): State<SharedOrchestrator>,
    Json(query): Json<DestinationQuery>,
) -> Result<Json<ActionResponse<AppState>>, ApiError> {
    app.search_destination(&query).await?;
    let notices = app.take_notices().await;
    Ok(Json(ActionResponse {
        data: app.state().await,
        notices,
    }))
}

async fn weather(
    State(app): State<SharedOrchestrator>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<ActionResponse<Option<WeatherReading>>>, ApiError> {
    let location = query.location.trim();
    if location.is_empty() {
        return Err(SafePathError::validation("Please enter a location").into());
    }

    let reading = app.lookup_weather(location).await;
    Ok(respond(&app, reading).await)
}

async fn submit_complaint(
    State(app): State<SharedOrchestrator>,
    Json(draft): Json<ComplaintDraft>,
) -> Result<(StatusCode, Json<ActionResponse<Complaint>>), ApiError> {
    let complaint = app.submit_complaint(&draft).await?;
    Ok((StatusCode::CREATED, respond(&app, complaint).await))
}

async fn toggle_language(
    State(app): State<SharedOrchestrator>,
) -> Json<ActionResponse<LanguageView>> {
    let language = app.toggle_language().await;
    let view = LanguageView {
        language,
        toggle_label: language.toggle_label(),
    };
    respond(&app, view).await
}

async fn start_navigation(State(app): State<SharedOrchestrator>) -> Json<ActionResponse<()>> {
    app.start_navigation().await;
    respond(&app, ()).await
}

async fn map_scene(State(app): State<SharedOrchestrator>) -> Json<MapScene> {
    Json(app.render_map().await)
}

/// The static route sketch, whatever renderer is configured
async fn map_svg(State(app): State<SharedOrchestrator>) -> Result<Response, StatusCode> {
    let scene = match app.state().await.current_route {
        Some(route) => {
            StaticSvgRenderer::new().scene(&route.origin, &route.destination, &route.waypoints)
        }
        None => MapScene::blank(MapProvider::Static),
    };

    let svg = static_svg::to_svg(&scene).map_err(|e| {
        error!("Failed to render route sketch: {:#}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

async fn state(State(app): State<SharedOrchestrator>) -> Json<AppState> {
    Json(app.state().await)
}

async fn respond<T>(app: &Orchestrator, data: T) -> Json<ActionResponse<T>> {
    Json(ActionResponse {
        data,
        notices: app.take_notices().await,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::SafePathConfig;

    fn app() -> Router {
        app_with_delay(0)
    }

    fn app_with_delay(submit_delay_ms: u64) -> Router {
        let mut config = SafePathConfig::default();
        config.weather.api_key = None;
        config.complaint.submit_delay_ms = submit_delay_ms;
        let orchestrator = Orchestrator::from_config(&config).unwrap();
        router(Arc::new(orchestrator))
    }

    async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_search_without_weather_key() {
        let router = app();
        let (status, body) = call(&router, post_json("/search", json!({"destination": "Ujjain"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["currentRoute"]["distance"], "194 km");
        assert_eq!(body["data"]["weather"], json!([]));
        assert_eq!(body["notices"][0]["title"], "Route Planned");
        assert_eq!(body["notices"].as_array().unwrap().len(), 1);

        let (_, state) = call(&router, get("/state")).await;
        assert_eq!(
            state["currentRoute"]["alerts"][0]["location"],
            "Ujjain City Bypass"
        );
    }

    #[tokio::test]
    async fn test_blank_search_is_unprocessable() {
        let (status, body) = call(&app(), post_json("/search", json!({"destination": " "}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Please enter a destination");
    }

    #[tokio::test]
    async fn test_weather_requires_location() {
        let (status, _) = call(&app(), get("/weather?location=")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_complaint_endpoint() {
        let router = app();
        let (status, body) = call(
            &router,
            post_json(
                "/complaints",
                json!({"type": "pothole", "description": "Broken road", "location": "Rajwada"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["status"], "submitted");
        assert_eq!(body["notices"][0]["title"], "Complaint Registered");

        let (status, body) = call(&router, post_json("/complaints", json!({"type": "pothole"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Please fill all required fields");
    }

    #[tokio::test]
    async fn test_language_and_navigation() {
        let router = app();
        let (_, body) = call(&router, post_json("/language/toggle", Value::Null)).await;
        assert_eq!(body["data"]["language"], "hi");
        assert_eq!(body["data"]["toggleLabel"], "English");

        let (_, body) = call(&router, post_json("/navigation/start", Value::Null)).await;
        assert_eq!(body["notices"][0]["title"], "Navigation Started");
    }

    #[tokio::test]
    async fn test_map_endpoints() {
        let router = app();
        let (_, scene) = call(&router, get("/map")).await;
        assert_eq!(scene["markers"], json!([]));

        call(&router, post_json("/search", json!({"destination": "Indore"}))).await;
        let (_, scene) = call(&router, get("/map")).await;
        assert_eq!(scene["provider"], "static");
        assert_eq!(scene["markers"].as_array().unwrap().len(), 5);

        let response = router.clone().oneshot(get("/map.svg")).await.unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "image/svg+xml"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("Sehore"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_not_blocked_by_pending_complaint() {
        let router = app_with_delay(2000);
        let complaint = tokio::spawn({
            let router = router.clone();
            async move {
                call(
                    &router,
                    post_json(
                        "/complaints",
                        json!({"type": "pothole", "description": "Broken road", "location": "Rajwada"}),
                    ),
                )
                .await
            }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;

        let started = tokio::time::Instant::now();
        let (status, body) = call(&router, post_json("/language/toggle", Value::Null)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["language"], "hi");
        assert!(started.elapsed() < Duration::from_millis(500));
        assert!(!complaint.is_finished());

        let (status, body) = complaint.await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["notices"][0]["title"], "Complaint Registered");
    }

    #[test]
    fn test_config_error_is_internal() {
        let response = ApiError::from(SafePathError::config("bad")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
