//! HTTP server setup and the webhook handler.
//!
//! # Responsibilities
//! - Create the Axum router and wire up middleware (tracing, timeout)
//! - Merge query-string parameters into the inbound headers
//! - Reject empty or non-object JSON bodies with 400
//! - Filter templates through the auth registry and enqueue dispatch jobs
//! - Answer 200 as soon as templates are selected, before any dispatch runs

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    routing::post,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{ConfigStore, GatewayConfig};
use crate::dispatch::{Dispatcher, RequestContext};
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConfigStore>,
    pub dispatcher: Arc<Dispatcher>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &GatewayConfig, state: AppState) -> Self {
        let router = Router::new()
            .route("/webhooks/{receiver}", post(webhook_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http());
        Self { router }
    }

    /// Run the server until the shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Inbound webhook handler.
async fn webhook_handler(
    State(state): State<AppState>,
    Path(receiver): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    mut headers: HeaderMap,
    payload: Bytes,
) -> StatusCode {
    // Query-string parameters participate in every header lookup (auth
    // secrets, endpoint keys, condition operands) exactly like real headers.
    for (key, value) in &params {
        let Ok(name) = HeaderName::from_bytes(key.as_bytes()) else {
            continue;
        };
        let Ok(value) = HeaderValue::from_str(value) else {
            continue;
        };
        headers.insert(name, value);
    }

    if payload.is_empty() {
        metrics::record_request(&receiver, 400);
        return StatusCode::BAD_REQUEST;
    }

    let templates = state
        .store
        .authorized_templates(&receiver, &headers, &payload);
    if templates.is_empty() {
        tracing::debug!(receiver = %receiver, "no authorized templates");
        metrics::record_request(&receiver, 200);
        return StatusCode::OK;
    }

    let body: serde_json::Map<String, serde_json::Value> = match serde_json::from_slice(&payload) {
        Ok(map) => map,
        Err(e) => {
            tracing::debug!(receiver = %receiver, error = %e, "invalid JSON body");
            metrics::record_request(&receiver, 400);
            return StatusCode::BAD_REQUEST;
        }
    };

    tracing::debug!(
        receiver = %receiver,
        templates = templates.len(),
        "dispatching webhook"
    );

    let ctx = Arc::new(RequestContext {
        headers,
        body: serde_json::Value::Object(body),
    });
    for template in templates {
        state.dispatcher.enqueue_template(template, ctx.clone());
    }

    metrics::record_request(&receiver, 200);
    StatusCode::OK
}
