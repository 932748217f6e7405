//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → build store/evaluator/renderer → start workers → serve
//!
//! Shutdown (shutdown.rs):
//!     SIGINT/SIGTERM → broadcast → server stops accepting →
//!     dispatch workers drain within the grace period → exit
//! ```
//!
//! # Design Decisions
//! - One broadcast channel fans the signal out to the server and every worker
//! - Workers drain already-queued jobs before exiting; the grace period caps
//!   how long the process waits for them

pub mod shutdown;

pub use shutdown::{listen_for_signals, Shutdown};
