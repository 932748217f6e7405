//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use hookgate::auth::FlowRegistry;
use hookgate::condition::Evaluator;
use hookgate::config::rules::Template;
use hookgate::config::{ConfigStore, GatewayConfig};
use hookgate::dispatch::Dispatcher;
use hookgate::http::{AppState, HttpServer};
use hookgate::lifecycle::Shutdown;
use hookgate::render::Renderer;
use hookgate::resolver::PathResolver;

pub type Captured = Arc<Mutex<Vec<Value>>>;

/// Start a local sink that records every JSON body POSTed to `/sink`.
pub async fn start_capture_sink() -> (SocketAddr, Captured) {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));

    async fn capture(State(captured): State<Captured>, Json(body): Json<Value>) -> axum::http::StatusCode {
        captured.lock().await.push(body);
        axum::http::StatusCode::OK
    }

    let app = Router::new()
        .route("/sink", post(capture))
        .with_state(captured.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, captured)
}

/// A gateway running on an ephemeral port with an in-memory rule-set.
pub struct TestGateway {
    pub base_url: String,
    pub shutdown: Shutdown,
}

#[allow(dead_code)]
pub async fn start_gateway(
    templates: Vec<Template>,
    bodies: HashMap<String, String>,
) -> TestGateway {
    let evaluator = Evaluator::with_defaults(PathResolver::new());
    let workers = GatewayConfig::default().dispatch.workers;
    start_gateway_with(templates, bodies, evaluator, workers).await
}

/// Like `start_gateway` but with a caller-supplied evaluator and worker count.
#[allow(dead_code)]
pub async fn start_gateway_with(
    templates: Vec<Template>,
    bodies: HashMap<String, String>,
    evaluator: Evaluator,
    workers: usize,
) -> TestGateway {
    let mut config = GatewayConfig::default();
    config.dispatch.workers = workers;
    let store = Arc::new(ConfigStore::new(
        templates,
        bodies,
        FlowRegistry::with_defaults(),
    ));
    let evaluator = Arc::new(evaluator);
    let renderer = Arc::new(Renderer::new());
    let shutdown = Shutdown::new();

    let dispatcher = Arc::new(Dispatcher::new(
        &config.dispatch,
        Duration::from_secs(2),
        store.clone(),
        evaluator,
        renderer,
        &shutdown,
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(&config, AppState { store, dispatcher });
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestGateway {
        base_url: format!("http://{addr}"),
        shutdown,
    }
}

/// Parse templates from rule-set JSON, the way the loader would.
#[allow(dead_code)]
pub fn rules(raw: &str) -> Vec<Template> {
    serde_json::from_str(raw).unwrap()
}

/// Poll until the sink holds at least `count` captures or the timeout expires.
#[allow(dead_code)]
pub async fn wait_for_captures(captured: &Captured, count: usize, timeout: Duration) -> Vec<Value> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        {
            let got = captured.lock().await;
            if got.len() >= count {
                return got.clone();
            }
        }
        if tokio::time::Instant::now() >= deadline {
            return captured.lock().await.clone();
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}
