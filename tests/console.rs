// Copyright 2025 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! End-to-end tests of the console router against a fake Kubernetes API.

use axum::{
    Json, Router,
    body::Body,
    extract::Path,
    http::{HeaderMap, Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use metrics_console::config::UpstreamArgs;
use metrics_console::console::{server, state::AppState};
use metrics_console::context::Context;
use metrics_console::dashboard::Dashboard;
use metrics_console::theme::{MemoryStore, THEME_KEY, Theme, ThemeController, ThemeStore};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const TOKEN: &str = "test-token";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(&format!("Bearer {TOKEN}"))
}

fn node_metrics_body() -> Value {
    json!({
        "kind": "NodeMetricsList",
        "apiVersion": "metrics.k8s.io/v1beta1",
        "metadata": {},
        "items": [
            {
                "metadata": { "name": "node-a" },
                "timestamp": "2025-01-01T00:00:00Z",
                "window": "10s",
                "usage": { "cpu": "500000000n", "memory": "2097152Ki" }
            },
            {
                "metadata": { "name": "node-b" },
                "timestamp": "2025-01-01T00:00:00Z",
                "window": "10s",
                "usage": { "cpu": "250000000n", "memory": "1048576Ki" }
            }
        ]
    })
}

fn pod_metrics_body(namespace: &str) -> Value {
    json!({
        "kind": "PodMetricsList",
        "apiVersion": "metrics.k8s.io/v1beta1",
        "metadata": {},
        "items": [{
            "metadata": { "name": format!("{namespace}-web-0"), "namespace": namespace },
            "timestamp": "2025-01-01T00:00:00Z",
            "window": "10s",
            "containers": [
                { "name": "app", "usage": { "cpu": "250000000n", "memory": "1048576Ki" } },
                { "name": "sidecar", "usage": { "cpu": "1000000n", "memory": "1024Ki" } }
            ]
        }]
    })
}

fn node_list_body() -> Value {
    // node-b reports no capacity
    json!({
        "kind": "NodeList",
        "apiVersion": "v1",
        "metadata": { "resourceVersion": "1" },
        "items": [
            {
                "apiVersion": "v1",
                "kind": "Node",
                "metadata": { "name": "node-a" },
                "status": { "capacity": { "cpu": "4", "memory": "8388608Ki", "pods": "110" } }
            },
            {
                "apiVersion": "v1",
                "kind": "Node",
                "metadata": { "name": "node-b" },
                "status": {}
            }
        ]
    })
}

async fn fake_node_metrics(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    Json(node_metrics_body()).into_response()
}

async fn fake_pod_metrics(Path(namespace): Path<String>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    if namespace == "broken" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "metrics backend down").into_response();
    }
    Json(pod_metrics_body(&namespace)).into_response()
}

async fn fake_nodes(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    Json(node_list_body()).into_response()
}

/// Serves the fake API on a loopback port and returns its base URL.
async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/apis/metrics.k8s.io/v1beta1/nodes", get(fake_node_metrics))
        .route(
            "/apis/metrics.k8s.io/v1beta1/namespaces/{namespace}/pods",
            get(fake_pod_metrics),
        )
        .route("/api/v1/nodes", get(fake_nodes));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

struct Harness {
    app: Router,
    store: Arc<MemoryStore>,
}

async fn setup(token: &str, namespace: &str) -> Harness {
    metrics_console::utils::tls::install_crypto_provider();

    let upstream = UpstreamArgs {
        api_url: spawn_upstream().await,
        token: token.to_string(),
        ca_file: None,
    };
    let context = Context::connect(&upstream).await.unwrap();
    let dashboard = Arc::new(Dashboard::new(Arc::new(context.clone()), namespace));
    let store = Arc::new(MemoryStore::default());
    let theme = Arc::new(ThemeController::load(store.clone(), Theme::Dark));

    Harness {
        app: server::app(AppState::new(context, dashboard, theme), None),
        store,
    }
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>, HeaderMap) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec(), headers)
}

async fn send_json(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let (status, body, _) = send(app, method, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_node_metrics_pass_through() {
    let h = setup(TOKEN, "default").await;

    let (status, body) = send_json(&h.app, "GET", "/api/metrics/nodes").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, node_metrics_body());
}

#[tokio::test]
async fn test_pod_metrics_default_and_explicit_namespace() {
    let h = setup(TOKEN, "default").await;

    let (status, body) = send_json(&h.app, "GET", "/api/metrics/pods").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, pod_metrics_body("default"));

    let (status, body) = send_json(&h.app, "GET", "/api/metrics/pods?namespace=kube-system").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["metadata"]["namespace"], "kube-system");
}

#[tokio::test]
async fn test_upstream_failure_returns_error_envelope() {
    let h = setup(TOKEN, "default").await;

    let (status, body) = send_json(&h.app, "GET", "/api/metrics/pods?namespace=broken").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let object = body.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert!(object["error"].as_str().unwrap().starts_with("Kubernetes API error"));
}

#[tokio::test]
async fn test_invalid_namespace_is_rejected() {
    let h = setup(TOKEN, "default").await;

    let (status, body) = send_json(&h.app, "GET", "/api/metrics/pods?namespace=Not_Valid").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad request: invalid namespace 'Not_Valid'");
}

#[tokio::test]
async fn test_wrong_token_is_an_upstream_error() {
    let h = setup("wrong-token", "default").await;

    let (status, body) = send_json(&h.app, "GET", "/api/metrics/nodes").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_capacity_endpoint() {
    let h = setup(TOKEN, "default").await;

    let (status, body) = send_json(&h.app, "GET", "/api/metrics/capacity").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "items": [{ "name": "node-a", "cpu": "4", "memory": "8388608Ki" }] })
    );
}

#[tokio::test]
async fn test_dashboard_refresh_normalizes_and_joins() {
    let h = setup(TOKEN, "default").await;

    let (status, _, _) = send(&h.app, "GET", "/readyz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = send_json(&h.app, "GET", "/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot"], Value::Null);

    let (status, body) = send_json(&h.app, "POST", "/api/dashboard/refresh").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["committed"], true);
    assert_eq!(body["generation"], 1);

    let nodes = &body["snapshot"]["nodes"];
    assert_eq!(nodes[0]["name"], "node-a");
    assert_eq!(nodes[0]["cpu_usage_milli"], 500);
    assert_eq!(nodes[0]["memory_usage_mebi"], 2048);
    assert_eq!(nodes[0]["cpu_capacity_milli"], 4000);
    assert_eq!(nodes[0]["memory_capacity_mebi"], 8192);
    assert_eq!(nodes[0]["cpu_percent"], 12.5);
    assert_eq!(nodes[0]["memory_percent"], 25.0);
    assert_eq!(nodes[0]["cpu_chart"], json!({ "used": 500, "remaining": 3500 }));

    assert_eq!(nodes[1]["name"], "node-b");
    assert_eq!(nodes[1]["cpu_capacity_milli"], "unavailable");
    assert_eq!(nodes[1]["cpu_percent"], "unavailable");
    assert_eq!(nodes[1]["cpu_chart"], json!({ "used": 250, "remaining": 0 }));

    let pods = &body["snapshot"]["pods"];
    assert_eq!(pods[0]["name"], "default-web-0");
    assert_eq!(pods[0]["cpu_usage_milli"], 250);
    assert_eq!(pods[0]["memory_usage_mebi"], 1024);

    let (status, _, _) = send(&h.app, "GET", "/readyz").await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send_json(&h.app, "GET", "/api/dashboard").await;
    assert_eq!(body["snapshot"]["generation"], 1);
    assert_eq!(body["last_error"], Value::Null);
}

#[tokio::test]
async fn test_failed_refresh_is_reported_and_keeps_view() {
    let h = setup(TOKEN, "broken").await;

    let (status, body) = send_json(&h.app, "POST", "/api/dashboard/refresh").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("fetch metrics error"));

    let (_, body) = send_json(&h.app, "GET", "/api/dashboard").await;
    assert_eq!(body["snapshot"], Value::Null);
    assert_eq!(body["last_error"]["generation"], 1);

    let (status, _, headers) = send(&h.app, "POST", "/refresh").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/");

    let (_, body) = send_json(&h.app, "GET", "/api/dashboard").await;
    assert_eq!(body["last_error"]["generation"], 2);

    let (status, page, _) = send(&h.app, "GET", "/").await;
    assert_eq!(status, StatusCode::OK);
    let page = String::from_utf8(page).unwrap();
    assert!(page.contains("Last refresh failed"));
}

#[tokio::test]
async fn test_dashboard_rejects_invalid_namespace_before_fetching() {
    let h = setup(TOKEN, "../../api/v1/secrets#").await;

    let (status, body) = send_json(&h.app, "POST", "/api/dashboard/refresh").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "fetch metrics error: invalid namespace '../../api/v1/secrets#'"
    );
}

#[tokio::test]
async fn test_page_refresh_and_theme_toggle() {
    let h = setup(TOKEN, "default").await;

    let (status, _, headers) = send(&h.app, "POST", "/refresh").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/");

    let (_, page, _) = send(&h.app, "GET", "/").await;
    let page = String::from_utf8(page).unwrap();
    assert!(page.contains("<body class=\"dark\">"));
    assert!(page.contains("<td>12.50%</td>"));
    assert!(page.contains("<td>default-web-0</td>"));

    let (status, _, _) = send(&h.app, "POST", "/theme/toggle").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(h.store.read(THEME_KEY).unwrap().as_deref(), Some("light"));

    let (_, body) = send_json(&h.app, "GET", "/api/theme").await;
    assert_eq!(body, json!({ "theme": "light" }));

    let (_, body) = send_json(&h.app, "POST", "/api/theme/toggle").await;
    assert_eq!(body, json!({ "theme": "dark" }));
}
