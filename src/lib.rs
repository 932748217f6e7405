//! hookgate: a configuration-driven webhook gateway.
//!
//! Receives inbound webhook calls, authorizes them per configured receiver,
//! classifies each call into a named event, evaluates declarative conditions
//! against the call's headers and JSON body, and forwards rendered payloads
//! to destinations named by inbound headers.

// Core engine
pub mod condition;
pub mod dispatch;
pub mod resolver;

// Collaborators
pub mod auth;
pub mod config;
pub mod http;
pub mod render;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::{ConfigStore, GatewayConfig};
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
