//! HTTP surface tests - wire shapes and transport error mapping
//!
//! `cargo test -p relay-server --test http_test`

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use relay_foundation::{CompletionJournal, JournalConfig};
use relay_server::{build_router, AppState, DeviceWork};
use relay_task::{ExecutorPool, PoolConfig, SubmissionGateway, TaskId, TaskRegistry, WorkFn};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

async fn test_app(delay: Duration) -> (Router, SubmissionGateway, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let journal = Arc::new(
        CompletionJournal::with_config(JournalConfig {
            path: dir.path().join("task.log"),
        })
        .await
        .unwrap(),
    );

    let registry = TaskRegistry::new();
    let work: Arc<dyn WorkFn> = Arc::new(DeviceWork::new(journal, delay));
    let pool = Arc::new(ExecutorPool::start(
        PoolConfig {
            workers: 2,
            queue_capacity: 8,
            ..Default::default()
        },
        registry.clone(),
        work,
    ));
    let gateway = SubmissionGateway::new(registry, pool);

    let state = Arc::new(AppState {
        gateway: gateway.clone(),
    });

    (build_router(state), gateway, dir)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

#[tokio::test]
async fn test_trigger_task_returns_queued_shape() {
    let (app, _gateway, _dir) = test_app(Duration::from_millis(50)).await;

    let (status, json) = get_json(app, "/task/device-42").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Task queued");
    let task_id = json["task_id"].as_str().unwrap();
    assert!(task_id.parse::<TaskId>().is_ok());
}

#[tokio::test]
async fn test_status_reflects_lifecycle() {
    let (app, gateway, _dir) = test_app(Duration::from_millis(50)).await;

    let (status, json) = get_json(app.clone(), "/task/device-42").await;
    assert_eq!(status, StatusCode::OK);
    let task_id = json["task_id"].as_str().unwrap().to_string();

    // Immediate poll: not terminal yet, result is null
    let (status, json) = get_json(app.clone(), &format!("/task/status/{task_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["task_id"], task_id.as_str());
    assert!(["PENDING", "RUNNING"].contains(&json["status"].as_str().unwrap()));
    assert!(json["result"].is_null());

    // After completion: SUCCESS with the confirmation text
    let id: TaskId = task_id.parse().unwrap();
    gateway.wait(id, Duration::from_secs(5)).await.unwrap();

    let (status, json) = get_json(app.clone(), &format!("/task/status/{task_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "SUCCESS");
    assert_eq!(json["result"], "Task completed for device-42");

    // Terminal reads are idempotent
    let (_, again) = get_json(app, &format!("/task/status/{task_id}")).await;
    assert_eq!(again, json);
}

#[tokio::test]
async fn test_blank_token_is_bad_request() {
    let (app, _gateway, _dir) = test_app(Duration::ZERO).await;

    let (status, _) = get_json(app, "/task/%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let (app, _gateway, _dir) = test_app(Duration::ZERO).await;

    let (status, _) = get_json(app, &format!("/task/status/{}", TaskId::new())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let (app, _gateway, _dir) = test_app(Duration::ZERO).await;

    let (status, _) = get_json(app, "/task/status/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
