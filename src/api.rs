//! REST API handlers for the scheduling service.

use axum::{
    extract::Path,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::demo_data::{self, DemoData};
use crate::domain::SolveOutcome;
use crate::dto::{ScheduleRequestDto, ScheduleResponseDto};
use crate::solver;
use crate::validate;

/// Creates the API router.
pub fn router() -> Router {
    Router::new()
        // Health & Info
        .route("/health", get(health))
        .route("/info", get(info_handler))
        // Demo data
        .route("/demo-data", get(list_demo_data))
        .route("/demo-data/{id}", get(get_demo_data))
        // Scheduling
        .route("/api/schedule", post(create_schedule))
}

// ============================================================================
// Health & Info
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health - Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub solver_engine: &'static str,
}

/// GET /info - Application info endpoint.
async fn info_handler() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "Restaurant Scheduling",
        version: env!("CARGO_PKG_VERSION"),
        solver_engine: "HiGHS via good_lp",
    })
}

// ============================================================================
// Demo data
// ============================================================================

/// GET /demo-data - List available demo data sets.
async fn list_demo_data() -> Json<Vec<&'static str>> {
    Json(demo_data::list_demo_data())
}

/// GET /demo-data/{id} - Get a ready-to-post demo request.
async fn get_demo_data(Path(id): Path<String>) -> Result<Json<ScheduleRequestDto>, StatusCode> {
    match id.parse::<DemoData>() {
        Ok(demo) => Ok(Json(demo_data::generate(demo))),
        Err(_) => Err(StatusCode::NOT_FOUND),
    }
}

// ============================================================================
// Scheduling
// ============================================================================

/// POST /api/schedule - Validate a request and solve it.
///
/// Responds 200 with a schedule, 400 on validation failure, 422 when the
/// hard constraints admit no assignment, and 500 on internal errors.
async fn create_schedule(
    Json(dto): Json<ScheduleRequestDto>,
) -> (StatusCode, Json<ScheduleResponseDto>) {
    let request_id = Uuid::new_v4();
    info!(
        %request_id,
        staff = dto.staff_list.len(),
        unavailability = dto.unavailability_list.len(),
        needs_days = dto.weekly_needs.len(),
        "received schedule request"
    );

    let request = match validate::validate(&dto) {
        Ok(request) => request,
        Err(err) => {
            info!(%request_id, error = %err, "request rejected");
            return (
                StatusCode::BAD_REQUEST,
                Json(ScheduleResponseDto::failed(err.to_string())),
            );
        }
    };

    // The solve is CPU-bound and can run for minutes; keep it off the
    // async workers.
    let outcome = tokio::task::spawn_blocking(move || solver::solve(&request)).await;

    match outcome {
        Ok(SolveOutcome::Solved(result)) => {
            info!(
                %request_id,
                warnings = result.warnings.len(),
                calculation_time_ms = result.calculation_time_ms,
                "schedule generated"
            );
            (StatusCode::OK, Json(ScheduleResponseDto::solved(result)))
        }
        Ok(SolveOutcome::Infeasible { message }) => {
            info!(%request_id, "request infeasible");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ScheduleResponseDto::failed(message)),
            )
        }
        Ok(SolveOutcome::Error { message }) => {
            error!(%request_id, %message, "solver error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ScheduleResponseDto::failed(
                    "An internal error occurred during schedule calculation.",
                )),
            )
        }
        Err(join_error) => {
            error!(%request_id, %join_error, "solver task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ScheduleResponseDto::failed(
                    "An internal error occurred during schedule calculation.",
                )),
            )
        }
    }
}
