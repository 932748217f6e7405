//! Event routing and hook fan-out subsystem.
//!
//! # Data Flow
//! ```text
//! Authorized templates (from the webhook handler)
//!     → dispatch queue (bounded mpsc, drop-with-warning on overflow)
//!     → worker pool (fixed size)
//!         → router.rs: extract event type, select matching events
//!         → condition evaluator gates each event
//!         → passing hooks re-enqueued as independent jobs
//!         → fanout.rs: render payload, resolve endpoint header, POST
//! ```
//!
//! # Design Decisions
//! - The inbound 200 is written before any dispatch work happens; a full
//!   queue drops jobs rather than delaying the response
//! - Every job is independent: a failing hook never affects sibling hooks,
//!   events or templates
//! - No delivery retries, no ordering guarantees across hooks
//! - Shutdown closes the worker loop and drains already-queued jobs within a
//!   grace period

pub mod fanout;
pub mod router;

pub use fanout::{Dispatcher, RequestContext};
pub use router::{extract_event_type, select_events, EventTypeError};
