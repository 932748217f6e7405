//! hookgate binary: load configuration, start the dispatcher and the server.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hookgate::auth::FlowRegistry;
use hookgate::condition::Evaluator;
use hookgate::config::{loader, ConfigStore};
use hookgate::dispatch::Dispatcher;
use hookgate::http::{AppState, HttpServer};
use hookgate::lifecycle::{listen_for_signals, Shutdown};
use hookgate::observability::{logging, metrics};
use hookgate::render::Renderer;
use hookgate::resolver::PathResolver;

#[derive(Parser)]
#[command(name = "hookgate", about = "Configuration-driven webhook gateway")]
struct Args {
    /// Path to the gateway TOML configuration file.
    #[arg(long, env = "HOOKGATE_CONFIG", default_value = "hookgate.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = loader::load_config(&args.config)?;

    tracing_subscriber::registry()
        .with(logging::env_filter(&config.observability.log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rules = loader::load_rules(Path::new(&config.rules.rules_path))?;
    let bodies = loader::load_template_bodies(Path::new(&config.rules.templates_dir))?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        templates = rules.len(),
        body_templates = bodies.len(),
        workers = config.dispatch.workers,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = Arc::new(ConfigStore::new(rules, bodies, FlowRegistry::with_defaults()));
    let evaluator = Arc::new(Evaluator::with_defaults(PathResolver::new()));
    let renderer = Arc::new(Renderer::new());

    let shutdown = Shutdown::new();
    listen_for_signals(&shutdown);

    let dispatcher = Arc::new(Dispatcher::new(
        &config.dispatch,
        Duration::from_secs(config.timeouts.delivery_secs),
        store.clone(),
        evaluator,
        renderer,
        &shutdown,
    ));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let state = AppState {
        store,
        dispatcher: dispatcher.clone(),
    };
    let server = HttpServer::new(&config, state);
    server.run(listener, shutdown.subscribe()).await?;

    // Give in-flight dispatch jobs a chance to drain before exiting.
    dispatcher
        .shutdown(Duration::from_secs(config.dispatch.shutdown_grace_secs))
        .await;

    tracing::info!("Shutdown complete");
    Ok(())
}
