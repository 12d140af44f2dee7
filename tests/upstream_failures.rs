//! Failure injection tests for upstream calls.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use serde_json::Value;

mod common;

#[tokio::test]
async fn test_data_with_unreachable_upstream() {
    let upstream = common::unused_addr().await;
    let proxy = common::spawn_proxy(common::test_config(upstream)).await;

    let res = common::client().get(proxy.url("/api/data")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Failed to fetch data from backend");
    assert!(!body["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_backend_health_with_unreachable_upstream() {
    let upstream = common::unused_addr().await;
    let proxy = common::spawn_proxy(common::test_config(upstream)).await;

    let res = common::client()
        .get(proxy.url("/api/backend-health"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["frontend"], "healthy");
    assert_eq!(body["backend"], "unreachable");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_upstream_error_status_is_a_failure() {
    let upstream =
        common::start_programmable_backend(|_| async { (500, r#"{"error":"boom"}"#.into()) }).await;
    let proxy = common::spawn_proxy(common::test_config(upstream)).await;
    let client = common::client();

    let res = client.get(proxy.url("/api/data")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Request failed with status code 500");

    let res = client.get(proxy.url("/api/backend-health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["backend"], "unreachable");
    assert_eq!(body["error"], "Request failed with status code 500");
}

#[tokio::test]
async fn test_no_retry_on_failure() {
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let upstream = common::start_programmable_backend(move |_| {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (503, "Service Unavailable".into())
        }
    })
    .await;
    let proxy = common::spawn_proxy(common::test_config(upstream)).await;

    let res = common::client().get(proxy.url("/api/data")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(call_count.load(Ordering::SeqCst), 1, "exactly one upstream call");
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let upstream = common::start_programmable_backend(|_| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        (200, r#"{"late":true}"#.into())
    })
    .await;
    let mut config = common::test_config(upstream);
    config.timeouts.upstream_secs = 1;
    let proxy = common::spawn_proxy(config).await;

    let start = Instant::now();
    let res = common::client()
        .get(proxy.url("/api/backend-health"))
        .send()
        .await
        .unwrap();
    assert!(start.elapsed() < Duration::from_secs(4));
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("timeout"), "{body}");
}

#[tokio::test]
async fn test_upstream_recovers_between_requests() {
    let healthy = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let h = healthy.clone();
    let upstream = common::start_programmable_backend(move |_| {
        let h = h.clone();
        async move {
            if h.load(Ordering::SeqCst) {
                (200, r#"{"status":"healthy"}"#.into())
            } else {
                (502, "bad gateway".into())
            }
        }
    })
    .await;
    let proxy = common::spawn_proxy(common::test_config(upstream)).await;
    let client = common::client();

    let res = client.get(proxy.url("/api/backend-health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    healthy.store(true, Ordering::SeqCst);

    let res = client.get(proxy.url("/api/backend-health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["backend"]["status"], "healthy");
}
