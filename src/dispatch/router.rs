//! Event type extraction and event selection.

use axum::http::HeaderMap;
use serde_json::Value;
use thiserror::Error;

use crate::config::rules::{Event, Template};

/// Errors produced while extracting the event type from a request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventTypeError {
    #[error("event key '{0}' not found in headers")]
    NotInHeaders(String),

    #[error("event key '{0}' not found in body")]
    NotInBody(String),

    #[error("event key '{0}' is not a string in body")]
    NotAString(String),

    #[error("unknown event type location: '{0}'")]
    UnknownLocation(String),
}

/// Extract the event type from wherever the template says it lives: a header
/// value or a top-level string field of the body.
pub fn extract_event_type(
    template: &Template,
    headers: &HeaderMap,
    body: &Value,
) -> Result<String, EventTypeError> {
    match template.event_type_in.as_str() {
        "header" => {
            let event_type = headers
                .get(template.event_type_key.as_str())
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            if event_type.is_empty() {
                return Err(EventTypeError::NotInHeaders(template.event_type_key.clone()));
            }
            Ok(event_type.to_string())
        }
        "body" => {
            let raw = body
                .get(&template.event_type_key)
                .ok_or_else(|| EventTypeError::NotInBody(template.event_type_key.clone()))?;
            raw.as_str()
                .map(str::to_string)
                .ok_or_else(|| EventTypeError::NotAString(template.event_type_key.clone()))
        }
        other => Err(EventTypeError::UnknownLocation(other.to_string())),
    }
}

/// Every event whose name equals the extracted type, in configuration order.
/// Rule-sets may declare several events under the same name; all of them are
/// returned, not just the first.
pub fn select_events<'t>(template: &'t Template, event_type: &str) -> Vec<&'t Event> {
    template
        .events
        .iter()
        .filter(|e| e.event == event_type)
        .collect()
}
