//! API handlers for the task endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use relay_foundation::Error;
use relay_task::{TaskId, TaskStatusView};
use serde::Serialize;
use std::sync::Arc;

use crate::server::AppState;

/// Submission response
#[derive(Serialize)]
pub struct TaskQueuedResponse {
    pub task_id: String,
    pub message: &'static str,
}

/// Queue a task for the given device token
pub async fn trigger_task(
    State(state): State<Arc<AppState>>,
    Path(device_token): Path<String>,
) -> Result<Json<TaskQueuedResponse>, (StatusCode, String)> {
    let id = state
        .gateway
        .submit(&device_token)
        .await
        .map_err(into_http)?;

    Ok(Json(TaskQueuedResponse {
        task_id: id.to_string(),
        message: "Task queued",
    }))
}

/// Report current status for a task id
///
/// A malformed id and an id that was never issued are transport errors
/// (400 / 404); a failed task is a normal 200 with `status = "FAILURE"`.
pub async fn task_status(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskStatusView>, (StatusCode, String)> {
    let id: TaskId = task_id.parse().map_err(into_http)?;
    let view = state.gateway.status(id).await.map_err(into_http)?;
    Ok(Json(view))
}

/// Map core errors onto transport status codes
fn into_http(err: Error) -> (StatusCode, String) {
    let code = match &err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::Overloaded(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (code, err.to_string())
}
