// Lo Shu Numerology - Web Server
// Web form + JSON API over the numerology engine

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use loshu_numerology::{
    generate_reading, AppConfig, BirthRecord, CalculationOptions, Gender, GridCell,
    HttpNarrativeClient, NarrativeClient, NumerologyChart, NumerologyError,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Shared application state
#[derive(Clone)]
struct AppState {
    config: Arc<AppConfig>,
    /// None when the narrative backend is disabled or has no API key
    narrative: Option<Arc<dyn NarrativeClient>>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
        }
    }

    fn failed(data: Option<T>, error: String, code: &'static str) -> Self {
        Self {
            success: false,
            data,
            error: Some(error),
            code: Some(code),
        }
    }
}

/// POST body for /api/chart and /api/reading
#[derive(Debug, Deserialize)]
struct ChartRequest {
    name: String,
    day: u32,
    month: u32,
    year: i32,
    gender: String,
    #[serde(default)]
    legacy_kua: Option<bool>,
}

/// Chart plus its rendered grid
#[derive(Serialize)]
struct ChartResponse {
    chart: NumerologyChart,
    grid: [[GridCell; 3]; 3],
    complete_planes: Vec<String>,
    incomplete_planes: Vec<String>,
}

#[derive(Serialize)]
struct ReadingResponse {
    #[serde(flatten)]
    chart: ChartResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    reading: Option<String>,
}

impl AppState {
    fn chart_for(&self, request: &ChartRequest) -> Result<ChartResponse, NumerologyError> {
        let gender: Gender = request.gender.parse()?;
        let record = BirthRecord::new(
            &request.name,
            request.day,
            request.month,
            request.year,
            gender,
            &self.config.validation,
        )?;

        let mut options = CalculationOptions::from(&self.config.calculation);
        if let Some(legacy) = request.legacy_kua {
            options.apply_kua5_legacy_remap = legacy;
        }

        let chart = NumerologyChart::compute_now(record, &options);
        Ok(ChartResponse {
            grid: chart.grid(&self.config.grid.empty_placeholder),
            complete_planes: chart.planes.complete_labels(),
            incomplete_planes: chart.planes.incomplete_labels(),
            chart,
        })
    }
}

fn invalid_input(e: NumerologyError) -> Response {
    tracing::debug!(error = %e, "rejected chart request");
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::failed(None, e.to_string(), e.code())),
    )
        .into_response()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(serde_json::json!({
        "status": "OK",
        "version": loshu_numerology::VERSION,
        "narrative": state.narrative.is_some(),
    })))
}

/// POST /api/chart - Core numbers, grid and planes
async fn create_chart(
    State(state): State<AppState>,
    Json(request): Json<ChartRequest>,
) -> Response {
    match state.chart_for(&request) {
        Ok(chart) => (StatusCode::OK, Json(ApiResponse::ok(chart))).into_response(),
        Err(e) => invalid_input(e),
    }
}

/// POST /api/reading - Chart plus narrative reading.
/// A failed reading still returns the chart (502 with `data` set).
async fn create_reading(
    State(state): State<AppState>,
    Json(request): Json<ChartRequest>,
) -> Response {
    let chart = match state.chart_for(&request) {
        Ok(chart) => chart,
        Err(e) => return invalid_input(e),
    };

    let Some(client) = state.narrative.clone() else {
        let response = ReadingResponse { chart, reading: None };
        return (
            StatusCode::BAD_GATEWAY,
            Json(ApiResponse::failed(
                Some(response),
                "Narrative backend is not configured".to_string(),
                "narrative_unavailable",
            )),
        )
            .into_response();
    };

    let numerology = chart.chart.clone();
    let result = tokio::task::spawn_blocking(move || generate_reading(client.as_ref(), &numerology)).await;

    match result {
        Ok(Ok(reading)) => {
            let response = ReadingResponse {
                chart,
                reading: Some(reading),
            };
            (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
        }
        Ok(Err(e)) => {
            let response = ReadingResponse { chart, reading: None };
            (
                StatusCode::BAD_GATEWAY,
                Json(ApiResponse::failed(Some(response), e.to_string(), "narrative_failed")),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Reading task panicked: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::failed(None, "internal error".to_string(), "internal")),
            )
                .into_response()
        }
    }
}

/// GET / - Serve the form
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/chart", post(create_chart))
        .route("/reading", post(create_reading))
        .with_state(state);

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new("web"))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

// ============================================================================
// Main Server
// ============================================================================

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load_or_default(None)?;

    // The blocking HTTP client is built (and finally dropped) outside the async runtime
    let narrative: Option<Arc<dyn NarrativeClient>> =
        match HttpNarrativeClient::from_config(&config.narrative) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                tracing::warn!("Readings disabled: {}", e);
                None
            }
        };

    let state = AppState {
        config: Arc::new(config),
        narrative: narrative.clone(),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(state))?;
    drop(runtime);
    drop(narrative);

    Ok(())
}

async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.server.bind_addr.clone();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🔮 Lo Shu server running on http://{}", addr);
    tracing::info!("   Form: http://{}/", addr);
    tracing::info!("   API:  POST http://{}/api/chart", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use loshu_numerology::{FakeNarrativeClient, NarrativeError};
    use tower::ServiceExt;

    fn state(narrative: Option<Arc<dyn NarrativeClient>>) -> AppState {
        AppState {
            config: Arc::new(AppConfig::default()),
            narrative,
        }
    }

    async fn post_json(router: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn aseem() -> serde_json::Value {
        serde_json::json!({
            "name": "Aseem", "day": 15, "month": 8, "year": 1990, "gender": "Male"
        })
    }

    #[tokio::test]
    async fn test_chart_endpoint() {
        let (status, json) = post_json(build_router(state(None)), "/api/chart", aseem()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["chart"]["core"]["psychic"], 6);
        assert_eq!(json["data"]["chart"]["core"]["kua"], 1);
        assert_eq!(json["data"]["grid"][0][1]["text"], "9(2)");
        assert_eq!(json["data"]["complete_planes"][1], "Will Plane (9-5-1)");
    }

    #[tokio::test]
    async fn test_invalid_date_is_bad_request() {
        let body = serde_json::json!({
            "name": "Aseem", "day": 31, "month": 2, "year": 1990, "gender": "female"
        });
        let (status, json) = post_json(build_router(state(None)), "/api/chart", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "invalid_date");
    }

    #[tokio::test]
    async fn test_unknown_gender_is_bad_request() {
        let body = serde_json::json!({
            "name": "Aseem", "day": 1, "month": 2, "year": 1990, "gender": "robot"
        });
        let (status, json) = post_json(build_router(state(None)), "/api/chart", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "unknown_gender");
    }

    #[tokio::test]
    async fn test_reading_with_fake_client() {
        let client: Arc<dyn NarrativeClient> = Arc::new(FakeNarrativeClient::always("## Reading"));
        let (status, json) = post_json(build_router(state(Some(client))), "/api/reading", aseem()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["reading"], "## Reading");
        assert_eq!(json["data"]["chart"]["core"]["destiny"], 6);
    }

    #[tokio::test]
    async fn test_reading_failure_still_returns_chart() {
        let client: Arc<dyn NarrativeClient> =
            Arc::new(FakeNarrativeClient::always_error(NarrativeError::Timeout(60)));
        let (status, json) = post_json(build_router(state(Some(client))), "/api/reading", aseem()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["code"], "narrative_failed");
        assert_eq!(json["data"]["chart"]["core"]["psychic"], 6);
        assert!(json["data"].get("reading").is_none());
    }

    #[tokio::test]
    async fn test_reading_without_backend() {
        let (status, json) = post_json(build_router(state(None)), "/api/reading", aseem()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["code"], "narrative_unavailable");
    }

    #[tokio::test]
    async fn test_legacy_kua_override() {
        // 1995 -> year sum 6 -> male kua 5 -> legacy 2
        let body = serde_json::json!({
            "name": "Ravi", "day": 3, "month": 3, "year": 1995, "gender": "m", "legacy_kua": true
        });
        let (_, json) = post_json(build_router(state(None)), "/api/chart", body).await;
        assert_eq!(json["data"]["chart"]["core"]["kua"], 2);
    }
}
