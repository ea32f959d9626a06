//! HTTP API gateway for LearnVeda.
//!
//! Exposes the generate action as a JSON endpoint, plus a health check and
//! the form defaults a client needs to pre-fill its inputs.
//!
//! Built on Axum.

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use learnveda_config::AppConfig;
use learnveda_core::plan::{PlanRequest, StudyPlan};
use learnveda_planner::Planner;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub config: AppConfig,
    pub planner: Planner,
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - CORS limited to `gateway.allowed_origins`
/// - Request body size limit (64 KB)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.gateway.allowed_origins);

    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/defaults", get(defaults_handler))
        .route("/v1/timetable", post(timetable_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Start the gateway HTTP server.
///
/// The planner is built once and shared by every request. Returns an error
/// when the configured provider cannot be initialized or the address cannot
/// be bound.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let planner = Planner::from_config(&config)?;
    info!(
        provider = %planner.advisor().provider_name(),
        model = %planner.advisor().model(),
        "Planner ready"
    );

    let state = Arc::new(GatewayState { config, planner });
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct DefaultsResponse {
    subjects: u32,
    chapters: u32,
    days: u32,
    daily_hours: f64,
    max_subjects: u32,
    max_days: u32,
}

async fn defaults_handler(State(state): State<SharedState>) -> Json<DefaultsResponse> {
    let planner = &state.config.planner;
    Json(DefaultsResponse {
        subjects: planner.default_subjects,
        chapters: planner.default_chapters,
        days: planner.default_days,
        daily_hours: planner.default_daily_hours,
        max_subjects: planner.max_subjects,
        max_days: planner.max_days,
    })
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

async fn timetable_handler(
    State(state): State<SharedState>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<StudyPlan>, (StatusCode, Json<ErrorResponse>)> {
    info!(
        subjects = request.subjects.len(),
        days = request.total_days,
        "Timetable requested"
    );

    match state.planner.generate(&request).await {
        Ok(plan) => Ok(Json(plan)),
        Err(e) => {
            warn!(error = %e, "Rejected timetable request");
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}
