//! HTTP surface of the gateway.
//!
//! # Data Flow
//! ```text
//! POST /webhooks/{receiver}
//!     → server.rs (Axum setup, middleware, webhook handler)
//!     → query params merged into headers
//!     → ConfigStore filters templates (receiver + auth)
//!     → dispatcher enqueues one job per template
//!     → 200 written immediately; dispatch outcome never reaches the caller
//! ```

pub mod server;

pub use server::{AppState, HttpServer};
