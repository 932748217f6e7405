//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! gateway file (TOML)         → loader.rs → GatewayConfig (schema.rs)
//! rule-set file (JSON)        → loader.rs → Vec<Template> (rules.rs)
//! template-body directory     → loader.rs → name → template string
//!     → ConfigStore (store.rs): receiver matching + auth filtering +
//!       body lookup, immutable, shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All gateway fields have defaults to allow minimal configs
//! - The rule-set is deliberately not validated at load time: unknown flows,
//!   locations and operators surface per request, matching the runtime
//!   semantics of the condition language

pub mod loader;
pub mod rules;
pub mod schema;
pub mod store;

pub use loader::ConfigError;
pub use rules::{AuthSpec, Event, Hook, Template};
pub use schema::GatewayConfig;
pub use store::ConfigStore;
