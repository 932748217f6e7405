//! Immutable runtime view over the loaded configuration.

use std::collections::HashMap;

use axum::http::HeaderMap;

use crate::auth::FlowRegistry;
use crate::config::rules::Template;

/// Empty-object fallback for unknown body-template references.
const EMPTY_TEMPLATE: &str = "{}";

/// Rule-sets, body templates and the auth registry, populated once at startup
/// and shared read-only (behind an `Arc`) for the life of the process.
pub struct ConfigStore {
    templates: Vec<Template>,
    bodies: HashMap<String, String>,
    auth: FlowRegistry,
}

impl ConfigStore {
    pub fn new(
        templates: Vec<Template>,
        bodies: HashMap<String, String>,
        auth: FlowRegistry,
    ) -> Self {
        Self {
            templates,
            bodies,
            auth,
        }
    }

    /// Every template registered for `receiver` whose auth flow authorizes the
    /// request, in configuration order. Authorization failures are logged and
    /// filtered out, never surfaced.
    pub fn authorized_templates(
        &self,
        receiver: &str,
        headers: &HeaderMap,
        payload: &[u8],
    ) -> Vec<Template> {
        self.templates
            .iter()
            .filter(|t| t.receiver == receiver)
            .filter(|t| {
                let authorized = self.auth.authorize(&t.auth, headers, payload);
                if !authorized {
                    tracing::warn!(
                        receiver = %receiver,
                        flow = %t.auth.flow,
                        "authorization failed"
                    );
                }
                authorized
            })
            .cloned()
            .collect()
    }

    /// The body template behind `reference`, or an empty-object template when
    /// the reference is unknown.
    pub fn template_body(&self, reference: &str) -> &str {
        self.bodies
            .get(reference)
            .map(String::as_str)
            .unwrap_or(EMPTY_TEMPLATE)
    }
}
