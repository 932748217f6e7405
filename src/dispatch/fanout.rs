//! Bounded worker-pool fan-out of matched hooks.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderMap;
use serde_json::Value;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::condition::Evaluator;
use crate::config::rules::{Hook, Template};
use crate::config::schema::DispatchConfig;
use crate::config::ConfigStore;
use crate::dispatch::router;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::render::Renderer;

/// Per-request state shared read-only by every job the request fans out into.
pub struct RequestContext {
    pub headers: HeaderMap,
    pub body: Value,
}

/// One unit of dispatch work. Template jobs expand into hook jobs; both flow
/// through the same bounded queue.
enum Job {
    Template {
        template: Template,
        ctx: Arc<RequestContext>,
    },
    Hook {
        hook: Hook,
        ctx: Arc<RequestContext>,
    },
}

/// Fan-out dispatcher: a bounded job queue consumed by a fixed worker pool.
///
/// Overflow drops the job with a warning; the inbound response is never
/// delayed by dispatch backpressure.
pub struct Dispatcher {
    tx: mpsc::Sender<Job>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl Dispatcher {
    pub fn new(
        config: &DispatchConfig,
        delivery_timeout: Duration,
        store: Arc<ConfigStore>,
        evaluator: Arc<Evaluator>,
        renderer: Arc<Renderer>,
        shutdown: &Shutdown,
    ) -> Self {
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));

        let worker = Arc::new(Worker {
            store,
            evaluator,
            renderer,
            client: reqwest::Client::new(),
            delivery_timeout,
            tx: tx.clone(),
        });

        let workers = (0..config.workers.max(1))
            .map(|id| {
                let rx = rx.clone();
                let worker = worker.clone();
                let shutdown = shutdown.subscribe();
                tokio::spawn(run_worker(id, rx, worker, shutdown))
            })
            .collect();

        Self {
            tx,
            workers: Mutex::new(workers),
        }
    }

    /// Enqueue one template for dispatch against a request.
    pub fn enqueue_template(&self, template: Template, ctx: Arc<RequestContext>) {
        submit(&self.tx, Job::Template { template, ctx });
    }

    /// Wait up to `grace` for the workers to drain and stop; workers still
    /// running at the deadline are aborted.
    pub async fn shutdown(&self, grace: Duration) {
        let handles = {
            let mut workers = self.workers.lock().await;
            std::mem::take(&mut *workers)
        };

        let deadline = Instant::now() + grace;
        for mut handle in handles {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if tokio::time::timeout(remaining, &mut handle).await.is_err() {
                tracing::warn!("dispatch worker did not drain in time, aborting");
                handle.abort();
            }
        }
    }
}

/// Enqueue without waiting; a full or closed queue drops the job.
fn submit(tx: &mpsc::Sender<Job>, job: Job) {
    if let Err(err) = tx.try_send(job) {
        metrics::record_dispatch_dropped();
        match err {
            TrySendError::Full(_) => tracing::warn!("dispatch queue full, dropping job"),
            TrySendError::Closed(_) => tracing::warn!("dispatch queue closed, dropping job"),
        }
    }
}

type SharedReceiver = Arc<Mutex<mpsc::Receiver<Job>>>;

async fn run_worker(
    worker: usize,
    rx: SharedReceiver,
    ctx: Arc<Worker>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        let job = {
            let mut rx = rx.lock().await;
            tokio::select! {
                job = rx.recv() => job,
                _ = shutdown.recv() => None,
            }
        };
        let Some(job) = job else { break };
        run_job(&ctx, job).await;
    }

    // Drain jobs that were already queued when the shutdown signal landed.
    loop {
        let drained = rx.lock().await.try_recv();
        match drained {
            Ok(job) => run_job(&ctx, job).await,
            Err(_) => break,
        }
    }

    tracing::debug!(worker, "dispatch worker stopped");
}

/// Run one job in its own task so that a panicking operator, flow or helper
/// takes down the job, never the worker.
async fn run_job(ctx: &Arc<Worker>, job: Job) {
    let worker = ctx.clone();
    if let Err(e) = tokio::spawn(async move { worker.process(job).await }).await {
        tracing::error!(error = %e, "dispatch job failed");
    }
}

/// Shared dependencies of the dispatch workers.
struct Worker {
    store: Arc<ConfigStore>,
    evaluator: Arc<Evaluator>,
    renderer: Arc<Renderer>,
    client: reqwest::Client,
    delivery_timeout: Duration,
    tx: mpsc::Sender<Job>,
}

impl Worker {
    async fn process(&self, job: Job) {
        match job {
            Job::Template { template, ctx } => self.handle_template(template, ctx).await,
            Job::Hook { hook, ctx } => self.trigger_hook(hook, ctx).await,
        }
    }

    /// Route one template: extract the event type, gate each matching event on
    /// its conditions, and re-enqueue every passing hook as its own job.
    /// Failures never leave this template.
    async fn handle_template(&self, template: Template, ctx: Arc<RequestContext>) {
        let event_type = match router::extract_event_type(&template, &ctx.headers, &ctx.body) {
            Ok(event_type) => event_type,
            Err(e) => {
                tracing::warn!(
                    receiver = %template.receiver,
                    error = %e,
                    "event type extraction failed"
                );
                return;
            }
        };

        let events = router::select_events(&template, &event_type);
        if events.is_empty() {
            tracing::debug!(
                receiver = %template.receiver,
                event_type = %event_type,
                "no matching events"
            );
            return;
        }

        for event in events {
            match self
                .evaluator
                .evaluate_all(&event.conditions, &ctx.headers, &ctx.body)
            {
                Ok(true) => {
                    for hook in &event.hooks {
                        submit(
                            &self.tx,
                            Job::Hook {
                                hook: hook.clone(),
                                ctx: ctx.clone(),
                            },
                        );
                    }
                }
                Ok(false) => {
                    tracing::debug!(event = %event.event, "conditions not met, skipping event");
                }
                Err(e) => {
                    tracing::warn!(
                        event = %event.event,
                        error = %e,
                        "condition evaluation error, skipping event"
                    );
                }
            }
        }
    }

    /// Fire one hook: render the payload, read the destination URL from the
    /// inbound headers, POST. Every failure is logged and dropped.
    async fn trigger_hook(&self, hook: Hook, ctx: Arc<RequestContext>) {
        let template_body = self.store.template_body(&hook.body);

        let payload = match self.renderer.render_to_map(template_body, &ctx.body) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(hook = %hook.name, error = %e, "render failed");
                metrics::record_hook_failed(&hook.name);
                return;
            }
        };

        let url = ctx
            .headers
            .get(hook.endpoint_key.as_str())
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if url.is_empty() {
            tracing::warn!(
                hook = %hook.name,
                endpoint_key = %hook.endpoint_key,
                "destination URL not found in headers"
            );
            metrics::record_hook_failed(&hook.name);
            return;
        }

        tracing::info!(hook = %hook.name, "triggering hook");
        metrics::record_hook_triggered(&hook.name);

        let sent = self
            .client
            .post(url)
            .timeout(self.delivery_timeout)
            .json(&payload)
            .send()
            .await;

        match sent {
            Ok(response) => {
                tracing::debug!(hook = %hook.name, status = %response.status(), "hook delivered");
            }
            Err(e) => {
                tracing::warn!(hook = %hook.name, error = %e, "hook delivery failed");
                metrics::record_hook_failed(&hook.name);
            }
        }
    }
}
