//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → structured log events (tracing, initialized in main)
//!     → metrics.rs (counters on requests, hooks, queue drops)
//!
//! Consumers:
//!     → log aggregation (stdout)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging with field syntax throughout; no log aggregation here
//! - Metric updates are cheap counter increments, safe on the dispatch path
//! - The exporter is optional and off by default

pub mod logging;
pub mod metrics;
