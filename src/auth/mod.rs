//! Authorization flow registry.
//!
//! # Data Flow
//! ```text
//! Inbound request (headers + raw payload)
//!     → ConfigStore selects templates by receiver
//!     → each template's AuthSpec names a flow
//!     → flows.rs verifies (shared secret, basic auth, HMAC signature)
//!     → unauthorized templates are filtered out, logged, never surfaced
//! ```
//!
//! # Design Decisions
//! - Flows are a runtime registry (string → verifier) so deployments can add
//!   provider-specific schemes without touching the dispatch path
//! - An unknown flow name is unauthorized, not an error
//! - Signature comparisons are constant time

pub mod flows;

use std::collections::HashMap;

use axum::http::HeaderMap;

use crate::config::rules::AuthSpec;

/// Verifies one authorization scheme against the inbound request.
pub type FlowFn = Box<dyn Fn(&AuthSpec, &HeaderMap, &[u8]) -> bool + Send + Sync>;

/// Registry of named authorization flows.
pub struct FlowRegistry {
    flows: HashMap<String, FlowFn>,
}

impl FlowRegistry {
    /// An empty registry; every flow is unauthorized until registered.
    pub fn new() -> Self {
        Self {
            flows: HashMap::new(),
        }
    }

    /// The default flow set: `none`, `plain secret`, `basic auth`, `github`,
    /// `gitlab`.
    pub fn with_defaults() -> Self {
        Self::new()
            .register("none", Box::new(|a, h, p| flows::none(a, h, p)))
            .register("plain secret", Box::new(|a, h, p| flows::plain_secret(a, h, p)))
            .register("basic auth", Box::new(|a, h, p| flows::basic_auth(a, h, p)))
            .register("github", Box::new(|a, h, p| flows::github(a, h, p)))
            .register("gitlab", Box::new(|a, h, p| flows::gitlab(a, h, p)))
    }

    /// Register a flow. Re-registering a name replaces the verifier.
    pub fn register(mut self, name: impl Into<String>, flow: FlowFn) -> Self {
        self.flows.insert(name.into(), flow);
        self
    }

    /// Apply the flow named by `auth`. Unknown flows are unauthorized.
    pub fn authorize(&self, auth: &AuthSpec, headers: &HeaderMap, payload: &[u8]) -> bool {
        match self.flows.get(&auth.flow) {
            Some(flow) => flow(auth, headers, payload),
            None => false,
        }
    }
}

impl Default for FlowRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(flow: &str) -> AuthSpec {
        AuthSpec {
            flow: flow.to_string(),
            header_secret_key: String::new(),
            secret: String::new(),
        }
    }

    #[test]
    fn unknown_flow_is_unauthorized() {
        let registry = FlowRegistry::with_defaults();
        assert!(!registry.authorize(&spec("carrier pigeon"), &HeaderMap::new(), b""));
    }

    #[test]
    fn none_flow_always_authorizes() {
        let registry = FlowRegistry::with_defaults();
        assert!(registry.authorize(&spec("none"), &HeaderMap::new(), b""));
    }

    #[test]
    fn registration_replaces_existing_flow() {
        let registry = FlowRegistry::with_defaults().register("none", Box::new(|_, _, _| false));
        assert!(!registry.authorize(&spec("none"), &HeaderMap::new(), b""));
    }
}
