//! Rule-set data model.
//!
//! A rule-set is a JSON array of templates. Each template binds a receiver to
//! an authorization flow, says where the event type lives on the request, and
//! lists the events it reacts to. Each event gates a list of hooks behind its
//! conditions.

use serde::Deserialize;

/// One rule-set entry: everything the gateway knows about a receiver.
#[derive(Debug, Clone, Deserialize)]
pub struct Template {
    /// Receiver name matched against the request path.
    pub receiver: String,

    /// Authorization flow guarding this template.
    pub auth: AuthSpec,

    /// Where the event type lives: `header` or `body`.
    pub event_type_in: String,

    /// Header name or top-level body key holding the event type.
    pub event_type_key: String,

    #[serde(default)]
    pub events: Vec<Event>,
}

/// A named event with its conditions and the hooks it fires.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    /// Event type this entry reacts to.
    pub event: String,

    /// Conditions ANDed together; empty means always fire.
    #[serde(default)]
    pub conditions: Vec<String>,

    #[serde(default)]
    pub hooks: Vec<Hook>,
}

/// One outbound delivery: a body template posted to a URL read from the
/// inbound headers.
#[derive(Debug, Clone, Deserialize)]
pub struct Hook {
    pub name: String,

    /// Inbound header carrying the destination URL.
    pub endpoint_key: String,

    /// Body-template reference, resolved against the template directory.
    #[serde(default)]
    pub body: String,
}

/// Authorization parameters for a template.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSpec {
    /// Flow name looked up in the flow registry.
    pub flow: String,

    /// Inbound header carrying the secret or signature, where the flow needs
    /// one.
    #[serde(default)]
    pub header_secret_key: String,

    #[serde(default)]
    pub secret: String,
}
